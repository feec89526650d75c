//! Source-side half of the reconciliation engine: a deterministic tree
//! walker, FLAC STREAMINFO probing, and source tag/cover-art extraction.
//!
//! Mirrors the teacher's `pmoflac` in spirit (claxon/lofty-backed FLAC
//! introspection) but is synchronous, since the scanner is pure CPU/IO
//! bound stat-and-header work with no decode pipeline to stream (§4.2
//! never reads audio frames).

mod coverart;
mod error;
mod scan;
mod source_tags;
mod streaminfo;
mod walk;

pub use coverart::{extract_front_cover, CoverArt};
pub use error::ScanError;
pub use scan::scan;
pub use source_tags::read_tags;
pub use streaminfo::read_audio_md5;
pub use walk::{to_forward_slash, walk_sorted};
