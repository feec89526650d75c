//! Optional post-encode verification (§4.5.8): re-open the output and
//! compare a subset of tags against the source, Unicode-normalised and
//! whitespace-trimmed, plus cover-art presence.

use std::path::Path;

use pacmodel::TagTable;
use unicode_normalization::UnicodeNormalization;

use crate::error::IndexError;
use crate::fingerprint_io::read_fingerprint;

/// One discrepancy found between the source's tags/art and the output's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

/// Compares `source_tags` against the tags actually embedded in
/// `output_path`, plus whether cover art is present in each. Returns the
/// list of mismatches (empty means verification passed).
pub fn verify_tags(
    output_path: &Path,
    source_tags: &TagTable,
    source_has_cover: bool,
) -> Result<Vec<Mismatch>, IndexError> {
    let output_tags = pacflac::read_tags(output_path).map_err(|source| IndexError::TagParse {
        path: output_path.display().to_string(),
        source,
    })?;

    let mut mismatches = Vec::new();
    compare_field("title", &source_tags.title, &output_tags.title, &mut mismatches);
    compare_field("artist", &source_tags.artist, &output_tags.artist, &mut mismatches);
    compare_field("album", &source_tags.album, &output_tags.album, &mut mismatches);

    let output_has_cover = pacflac::extract_front_cover(output_path)
        .ok()
        .flatten()
        .is_some();
    if source_has_cover != output_has_cover {
        mismatches.push(Mismatch {
            field: "cover_art_presence",
            expected: source_has_cover.to_string(),
            actual: output_has_cover.to_string(),
        });
    }

    Ok(mismatches)
}

/// Also verifies the embedded fingerprint matches the expected content
/// hash/policy (§8 invariant 3), separate from the tag comparison above
/// so a caller can distinguish "stamped wrong" from "tags drifted".
pub fn verify_fingerprint_matches(
    output_path: &Path,
    expected_src_md5: &str,
    expected_encoder: &str,
    expected_quality: &str,
) -> Result<bool, IndexError> {
    let fp = read_fingerprint(output_path)?;
    Ok(fp
        .map(|fp| fp.src_md5 == expected_src_md5 && fp.matches_policy(expected_encoder, expected_quality))
        .unwrap_or(false))
}

fn compare_field(
    field: &'static str,
    expected: &Option<String>,
    actual: &Option<String>,
    out: &mut Vec<Mismatch>,
) {
    if normalise(expected.as_deref()) != normalise(actual.as_deref()) {
        out.push(Mismatch {
            field,
            expected: expected.clone().unwrap_or_default(),
            actual: actual.clone().unwrap_or_default(),
        });
    }
}

fn normalise(value: Option<&str>) -> String {
    value
        .unwrap_or("")
        .trim()
        .nfc()
        .collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalise_trims_whitespace() {
        assert_eq!(normalise(Some("  Track  ")), "Track");
        assert_eq!(normalise(None), "");
    }

    #[test]
    fn compare_field_ignores_whitespace_only_diffs() {
        let mut out = Vec::new();
        compare_field(
            "title",
            &Some("Track".into()),
            &Some("  Track ".into()),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn compare_field_reports_real_mismatch() {
        let mut out = Vec::new();
        compare_field("title", &Some("Track".into()), &Some("Other".into()), &mut out);
        assert_eq!(out.len(), 1);
    }
}
