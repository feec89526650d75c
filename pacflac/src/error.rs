use std::io;

/// Errors surfaced while walking the source tree or probing a FLAC header.
///
/// Per §7, `ScanIoError` is a per-file condition: callers of
/// [`crate::scan::scan`] never see this type propagate out of the scan —
/// it is folded into [`pacmodel::SourceEntry::scan_error`]. It is public
/// so tests and `pactags`' sibling walker can share the same shape.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    #[error("I/O error reading {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("FLAC STREAMINFO block missing or truncated in {path}")]
    MissingStreamInfo { path: String },
    #[error("could not decode FLAC header in {path}: {source}")]
    Decode { path: String, source: claxon::Error },
}
