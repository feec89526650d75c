//! Destination-side half of the reconciliation engine: the destination
//! index (§4.3), fingerprint embedding (§4.5.4), tag/cover-art
//! translation (§4.5.2, §4.5.3), and the atomic-commit primitives the
//! executor and the in-place Rename/Retag paths share.

pub mod atomic;
mod error;
mod fingerprint_io;
mod index;
mod rename;
mod retag;
mod tagwrite;
mod verify;

pub use error::{IndexError, TagWriteError};
pub use fingerprint_io::{read_fingerprint, write_fingerprint};
pub use index::DestinationIndex;
pub use rename::rename;
pub use retag::retag;
pub use tagwrite::{build_tag, set_standard_fields};
pub use verify::{verify_fingerprint_matches, verify_tags, Mismatch};
