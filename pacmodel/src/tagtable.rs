use serde::{Deserialize, Serialize};

/// Fixed-field, container-agnostic tag set. Translation between the
/// source's Vorbis comments and a destination container's native tag
/// model is a total function over these fields (§9 "Replacement of
/// source idioms": no dynamic/duck-typed tag objects).
///
/// Fields absent in the source are `None` and stay absent in the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTable {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub track_number: Option<u32>,
    pub track_total: Option<u32>,
    pub disc_number: Option<u32>,
    pub disc_total: Option<u32>,
    /// Four-digit year parsed from a leading digit run in the source date
    /// field.
    pub year: Option<u32>,
    pub genre: Option<String>,
    pub compilation: bool,
    pub comment: Option<String>,
    pub musicbrainz_track_id: Option<String>,
    pub musicbrainz_album_id: Option<String>,
    pub musicbrainz_artist_id: Option<String>,
}
