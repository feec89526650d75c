//! Translates the container-agnostic [`TagTable`] into a destination
//! container's native [`Tag`], embeds cover art, and stamps the PAC
//! fingerprint (§4.5.2, §4.5.3, §4.5.4).

use std::io::Cursor;

use image::imageops::FilterType;
use image::ImageFormat;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::tag::{ItemKey, Tag, TagType};
use pacflac::CoverArt;
use pacmodel::{Fingerprint, TagTable};

use crate::error::TagWriteError;
use crate::fingerprint_io::write_fingerprint;

/// Builds a fresh [`Tag`] of `tag_type` from the fixed field set, the
/// fingerprint, and (optionally) cover art. Fields absent in `tags` stay
/// absent in the built tag — translation is a total function over the
/// fixed set, never inventing values (§9).
pub fn build_tag(
    path: &std::path::Path,
    tag_type: TagType,
    tags: &TagTable,
    fingerprint: &Fingerprint,
    cover: Option<CoverArt>,
    cover_max_side: Option<u32>,
) -> Result<Tag, TagWriteError> {
    let mut tag = Tag::new(tag_type);
    set_standard_fields(&mut tag, tags);

    if let Some(cover) = cover {
        embed_cover(&mut tag, cover, cover_max_side)?;
    }

    write_fingerprint(&mut tag, path, fingerprint)?;

    Ok(tag)
}

/// Writes the fixed field set onto `tag`, skipping anything absent in
/// `tags` rather than clearing it — used both for a freshly built tag
/// (Convert) and to refresh an existing tag in place (adoption Retag).
pub fn set_standard_fields(tag: &mut Tag, tags: &TagTable) {
    set_opt(tag, ItemKey::TrackTitle, &tags.title);
    set_opt(tag, ItemKey::TrackArtist, &tags.artist);
    set_opt(tag, ItemKey::AlbumTitle, &tags.album);
    set_opt(tag, ItemKey::AlbumArtist, &tags.album_artist);
    set_opt_num(tag, ItemKey::TrackNumber, tags.track_number);
    set_opt_num(tag, ItemKey::TrackTotal, tags.track_total);
    set_opt_num(tag, ItemKey::DiscNumber, tags.disc_number);
    set_opt_num(tag, ItemKey::DiscTotal, tags.disc_total);
    set_opt_num(tag, ItemKey::Year, tags.year);
    set_opt(tag, ItemKey::Genre, &tags.genre);
    set_opt(tag, ItemKey::Comment, &tags.comment);
    set_opt(
        tag,
        ItemKey::MusicBrainzTrackId,
        &tags.musicbrainz_track_id,
    );
    set_opt(
        tag,
        ItemKey::MusicBrainzReleaseId,
        &tags.musicbrainz_album_id,
    );
    set_opt(
        tag,
        ItemKey::MusicBrainzArtistId,
        &tags.musicbrainz_artist_id,
    );
    if tags.compilation {
        tag.insert_text(ItemKey::FlagCompilation, "1".to_string());
    }
}

fn set_opt(tag: &mut Tag, key: ItemKey, value: &Option<String>) {
    if let Some(v) = value {
        tag.insert_text(key, v.clone());
    }
}

fn set_opt_num(tag: &mut Tag, key: ItemKey, value: Option<u32>) {
    if let Some(v) = value {
        tag.insert_text(key, v.to_string());
    }
}

/// Embeds `cover`, resizing it down to `cover_max_side` (longest side)
/// when set and the image exceeds it. Re-encodes as JPEG quality 90,
/// matching §4.5.3. A resize failure is not fatal to the caller — it is
/// surfaced as an `Err` here and the executor treats cover art failures
/// as warnings unless strict verification is enabled.
fn embed_cover(
    tag: &mut Tag,
    cover: CoverArt,
    cover_max_side: Option<u32>,
) -> Result<(), TagWriteError> {
    let (data, mime) = match cover_max_side {
        Some(max_side) => match resize_if_needed(&cover.data, max_side) {
            Ok(Some(resized)) => (resized, "image/jpeg".to_string()),
            Ok(None) => (cover.data, cover.mime_type),
            Err(_) => (cover.data, cover.mime_type),
        },
        None => (cover.data, cover.mime_type),
    };

    let mime_type = match mime.as_str() {
        "image/png" => MimeType::Png,
        _ => MimeType::Jpeg,
    };

    let picture = Picture::new_unchecked(PictureType::CoverFront, Some(mime_type), None, data);
    tag.push_picture(picture);
    Ok(())
}

/// Returns `Ok(Some(jpeg_bytes))` when the image's longest side exceeds
/// `max_side` and was resized; `Ok(None)` when no resize was necessary.
fn resize_if_needed(data: &[u8], max_side: u32) -> Result<Option<Vec<u8>>, image::ImageError> {
    let img = image::load_from_memory(data)?;
    let (w, h) = (img.width(), img.height());
    if w.max(h) <= max_side {
        return Ok(None);
    }

    let resized = img.resize(max_side, max_side, FilterType::Lanczos3);
    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(Some(out.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tag_omits_absent_fields() {
        let tags = TagTable {
            title: Some("Track".into()),
            ..Default::default()
        };
        let fp = Fingerprint {
            src_md5: "a".repeat(32),
            encoder: "libfdk_aac".into(),
            quality: "5".into(),
            version: "1.0.0".into(),
            source_rel: "A/1.flac".into(),
        };
        let tag = build_tag(
            std::path::Path::new("A/1.m4a"),
            TagType::Mp4Ilst,
            &tags,
            &fp,
            None,
            None,
        )
        .unwrap();

        assert_eq!(tag.title().as_deref(), Some("Track"));
        assert!(tag.artist().is_none());
    }
}
