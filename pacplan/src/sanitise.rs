//! Path-segment sanitisation (§4.4.1 step 2). Applied independently to
//! every path segment of a candidate destination path, never to the
//! path as a whole (so a legitimate `/` directory separator is never
//! touched by the reserved-character pass).

use unicode_normalization::UnicodeNormalization;

const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Sanitises one path segment: NFC-normalises, replaces reserved
/// characters and ASCII control bytes with `_`, trims trailing spaces
/// and dots (the Windows/exFAT hazard), and replaces an empty result
/// with `_`.
pub fn sanitise_segment(segment: &str) -> String {
    let normalised: String = segment.nfc().collect();

    let replaced: String = normalised
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim_end_matches([' ', '.']);

    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitises every segment of a forward-slash separated relative path,
/// leaving the separators themselves untouched.
pub fn sanitise_rel_path(rel_path: &str) -> String {
    rel_path
        .split('/')
        .map(sanitise_segment)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_reserved_characters() {
        assert_eq!(sanitise_segment("a/b:c*d?e\"f<g>h|i"), "a_b_c_d_e_f_g_h_i");
    }

    #[test]
    fn trims_trailing_space_and_dots() {
        assert_eq!(sanitise_segment("My Song..  "), "My Song");
    }

    #[test]
    fn empty_segment_becomes_underscore() {
        assert_eq!(sanitise_segment(""), "_");
        assert_eq!(sanitise_segment("   ."), "_");
    }

    #[test]
    fn control_bytes_are_replaced() {
        assert_eq!(sanitise_segment("a\u{0007}b"), "a_b");
    }

    #[test]
    fn sanitise_rel_path_preserves_separators() {
        assert_eq!(sanitise_rel_path("A/B: C/song?.flac"), "A/B_ C/song_.flac");
    }

    #[test]
    fn nfc_normalises_decomposed_unicode() {
        // "é" as e + combining acute vs precomposed é should normalise equal.
        let decomposed = "e\u{0301}cole";
        let precomposed = "\u{00e9}cole";
        assert_eq!(sanitise_segment(decomposed), sanitise_segment(precomposed));
    }
}
