//! Reads and writes the five PAC fingerprint fields (§4.5.4, §6 wire
//! format) through lofty's generic tag API, the same `prelude::*` +
//! `ItemKey` surface `pmoflac::metadata` uses for the fixed tag set.
//!
//! MP4 freeform atoms are addressed the way the spec itself writes them
//! conceptually (`----:org.pac:src_md5`); Opus/Vorbis comments use the
//! literal `PAC_*` keys. Both are represented as [`ItemKey::Unknown`]
//! strings so the read/write path is identical across containers.

use std::path::Path;

use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem};
use pacmodel::Fingerprint;

use crate::error::{IndexError, TagWriteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Mp4,
    Opus,
}

fn container_for(path: &Path) -> Option<Container> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("m4a") => Some(Container::Mp4),
        Some(ext) if ext.eq_ignore_ascii_case("opus") => Some(Container::Opus),
        _ => None,
    }
}

fn item_key(container: Container, field: &str) -> ItemKey {
    match container {
        Container::Mp4 => ItemKey::Unknown(format!("----:{}:{field}", Fingerprint::MP4_MEAN)),
        Container::Opus => ItemKey::Unknown(Fingerprint::vorbis_key(field)),
    }
}

/// Reads the embedded [`Fingerprint`] from `path`. Returns `Ok(None)` when
/// any of the five fields are missing — such an output is legacy, not an
/// error.
pub fn read_fingerprint(path: &Path) -> Result<Option<Fingerprint>, IndexError> {
    let Some(container) = container_for(path) else {
        return Ok(None);
    };

    let tagged_file = Probe::open(path)
        .map_err(|source| IndexError::TagParse {
            path: path.display().to_string(),
            source,
        })?
        .read()
        .map_err(|source| IndexError::TagParse {
            path: path.display().to_string(),
            source,
        })?;

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return Ok(None);
    };

    let mut values = Vec::with_capacity(Fingerprint::FIELDS.len());
    for field in Fingerprint::FIELDS {
        match tag.get_string(&item_key(container, field)) {
            Some(v) => values.push(v.to_string()),
            None => return Ok(None),
        }
    }

    Ok(Some(Fingerprint {
        src_md5: values[0].clone(),
        encoder: values[1].clone(),
        quality: values[2].clone(),
        version: values[3].clone(),
        source_rel: values[4].clone(),
    }))
}

/// Writes the five PAC fields into `tag`, overwriting any prior values.
/// Does not open or save the file; callers embed this into a broader
/// tag-write transaction (§4.5.4, §4.5.6).
pub fn write_fingerprint(tag: &mut Tag, container_path: &Path, fingerprint: &Fingerprint) -> Result<(), TagWriteError> {
    let container = container_for(container_path).ok_or_else(|| TagWriteError::UnsupportedContainer {
        path: container_path.display().to_string(),
    })?;

    let values = [
        &fingerprint.src_md5,
        &fingerprint.encoder,
        &fingerprint.quality,
        &fingerprint.version,
        &fingerprint.source_rel,
    ];

    for (field, value) in Fingerprint::FIELDS.iter().zip(values) {
        let key = item_key(container, field);
        tag.retain(|item| item.key() != &key);
        tag.push(TagItem::new(key, ItemValue::Text(value.clone())));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_detection() {
        assert_eq!(container_for(Path::new("a/b.m4a")), Some(Container::Mp4));
        assert_eq!(container_for(Path::new("a/b.opus")), Some(Container::Opus));
        assert_eq!(container_for(Path::new("a/b.flac")), None);
    }

    #[test]
    fn item_key_matches_spec_notation() {
        match item_key(Container::Mp4, "src_md5") {
            ItemKey::Unknown(s) => assert_eq!(s, "----:org.pac:src_md5"),
            _ => panic!("expected Unknown key"),
        }
        match item_key(Container::Opus, "src_md5") {
            ItemKey::Unknown(s) => assert_eq!(s, "PAC_SRC_MD5"),
            _ => panic!("expected Unknown key"),
        }
    }
}
