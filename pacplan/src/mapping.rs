//! Destination path mapping (§4.4.1 step 1): source `rel_path` -> sanitised
//! candidate destination `rel_path` with the codec's extension.

use pacmodel::Codec;

use crate::sanitise::sanitise_rel_path;

/// Computes the sanitised candidate destination path for `source_rel`
/// under `codec`, before collision resolution.
pub fn candidate_rel(source_rel: &str, codec: Codec) -> String {
    let stem = match source_rel.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => source_rel,
    };
    let with_extension = format!("{stem}.{}", codec.extension());
    sanitise_rel_path(&with_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_extension_for_codec() {
        assert_eq!(candidate_rel("A/1.flac", Codec::Aac), "A/1.m4a");
        assert_eq!(candidate_rel("A/1.flac", Codec::Opus), "A/1.opus");
    }

    #[test]
    fn sanitises_after_extension_swap() {
        assert_eq!(candidate_rel("A/B: C.flac", Codec::Aac), "A/B_ C.m4a");
    }
}
