//! Reads the source FLAC's Vorbis comments into the container-agnostic
//! [`pacmodel::TagTable`] the executor later translates into the
//! destination container's native tag model (§4.5.2).
//!
//! Grounded on `pmoflac::metadata`'s use of `lofty::probe::Probe` and the
//! generic `Tag` accessor methods.

use std::path::Path;

use lofty::prelude::*;
use lofty::probe::Probe;
use pacmodel::TagTable;

/// Extracts the fixed tag set from `path`'s primary (or first available)
/// tag. Missing fields are left `None`, matching the source's absence
/// rather than inventing a value.
pub fn read_tags(path: &Path) -> Result<TagTable, lofty::error::LoftyError> {
    let tagged_file = Probe::open(path)?.read()?;
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    let Some(tag) = tag else {
        return Ok(TagTable::default());
    };

    Ok(TagTable {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        album_artist: tag
            .get_string(&ItemKey::AlbumArtist)
            .map(|s| s.to_string()),
        track_number: tag.track(),
        track_total: tag.track_total(),
        disc_number: tag.disk(),
        disc_total: tag.disk_total(),
        year: tag.year(),
        genre: tag.genre().map(|s| s.to_string()),
        compilation: tag
            .get_string(&ItemKey::FlagCompilation)
            .map(|v| v == "1")
            .unwrap_or(false),
        comment: tag.comment().map(|s| s.to_string()),
        musicbrainz_track_id: tag
            .get_string(&ItemKey::MusicBrainzTrackId)
            .map(|s| s.to_string()),
        musicbrainz_album_id: tag
            .get_string(&ItemKey::MusicBrainzReleaseId)
            .map(|s| s.to_string()),
        musicbrainz_artist_id: tag
            .get_string(&ItemKey::MusicBrainzArtistId)
            .map(|s| s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let err = read_tags(Path::new("/nonexistent/song.flac"));
        assert!(err.is_err());
    }
}
