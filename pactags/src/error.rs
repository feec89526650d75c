use std::io;

/// Errors surfaced while indexing the destination tree or while reading a
/// single output's embedded fingerprint. Per §7 `IndexParseError`, a
/// failure here never aborts the index build — it downgrades the file to
/// legacy (see [`crate::index::IndexEntry::index_error`] via
/// [`pacmodel::OutputEntry::index_error`]).
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    #[error("I/O error reading {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("could not parse tags in {path}: {source}")]
    TagParse {
        path: String,
        source: lofty::error::LoftyError,
    },
}

/// Errors surfaced while writing tags, fingerprint, or cover art to a
/// destination output (§7 `TagWriteFailed`).
#[derive(thiserror::Error, Debug)]
pub enum TagWriteError {
    #[error("I/O error writing {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("could not write tags to {path}: {source}")]
    Tag {
        path: String,
        source: lofty::error::LoftyError,
    },
    #[error("unsupported container for {path}")]
    UnsupportedContainer { path: String },
}
