//! Cover art extraction from the source FLAC (§4.5.3).

use std::path::Path;

use lofty::picture::PictureType;
use lofty::prelude::*;
use lofty::probe::Probe;

/// A cover image pulled from a source file's PICTURE blocks, not yet
/// resized or re-encoded for the destination container.
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Locates the first `front cover` picture, falling back to the first
/// picture of any type. Returns `None` when the file carries no artwork.
pub fn extract_front_cover(path: &Path) -> Result<Option<CoverArt>, lofty::error::LoftyError> {
    let tagged_file = Probe::open(path)?.read()?;
    let tag = match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        Some(tag) => tag,
        None => return Ok(None),
    };

    let pictures = tag.pictures();
    let picture = pictures
        .iter()
        .find(|pic| pic.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first());

    Ok(picture.map(|pic| CoverArt {
        data: pic.data().to_vec(),
        mime_type: pic
            .mime_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "image/jpeg".to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        assert!(extract_front_cover(Path::new("/nonexistent/song.flac")).is_err());
    }
}
