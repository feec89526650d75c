//! Implements the Retag action (§4.5.6): stamp the PAC fingerprint onto
//! an existing output without re-encoding, optionally refreshing the
//! standard tag set from the current source (legacy adoption).

use std::path::Path;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::probe::Probe;
use pacmodel::{Fingerprint, TagTable};

use crate::atomic::{commit, part_path, remove_part};
use crate::error::TagWriteError;
use crate::fingerprint_io::write_fingerprint;
use crate::tagwrite::set_standard_fields;

/// Rewrites `path`'s embedded fingerprint in place, through a `.part`
/// copy + atomic rename so a crash never leaves a half-written tag block
/// at the final path (§8 invariant 9 applies to Retag as much as
/// Convert).
///
/// When `refresh_tags` is set (adoption of a legacy file), the standard
/// tag set is also overwritten from `source_tags`.
pub fn retag(
    path: &Path,
    fingerprint: &Fingerprint,
    refresh_tags: Option<&TagTable>,
) -> Result<(), TagWriteError> {
    let mut tagged_file = Probe::open(path)
        .map_err(|source| TagWriteError::Tag {
            path: path.display().to_string(),
            source,
        })?
        .read()
        .map_err(|source| TagWriteError::Tag {
            path: path.display().to_string(),
            source,
        })?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(lofty::tag::Tag::new(tag_type));
    }
    let tag = tagged_file.tag_mut(tag_type).expect("just inserted");

    if let Some(source_tags) = refresh_tags {
        set_standard_fields(tag, source_tags);
    }
    write_fingerprint(tag, path, fingerprint)?;

    let part = part_path(path);
    std::fs::copy(path, &part).map_err(|source| TagWriteError::Io {
        path: part.display().to_string(),
        source,
    })?;

    let save_result = tagged_file.save_to_path(&part, WriteOptions::default());
    if let Err(source) = save_result {
        remove_part(&part);
        return Err(TagWriteError::Tag {
            path: path.display().to_string(),
            source,
        });
    }

    commit(&part, path).map_err(|source| {
        remove_part(&part);
        TagWriteError::Io {
            path: path.display().to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retag_missing_file_is_an_error() {
        let fp = Fingerprint {
            src_md5: "a".repeat(32),
            encoder: "libfdk_aac".into(),
            quality: "5".into(),
            version: "1.0.0".into(),
            source_rel: "A/1.flac".into(),
        };
        assert!(retag(Path::new("/nonexistent/out.m4a"), &fp, None).is_err());
    }
}
