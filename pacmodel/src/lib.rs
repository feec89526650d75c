//! Shared value types for the derivative audio library reconciliation engine.
//!
//! `pacmodel` holds no I/O of its own: it is the vocabulary the scanner,
//! indexer, planner and executor crates agree on. Every type here is plain
//! data, cheap to clone, and `serde`-friendly so a caller can log or persist
//! a [`RunSummary`] however it likes without this crate knowing about any
//! file format.

mod action;
mod entry;
mod fingerprint;
mod policy;
mod summary;
mod tagtable;

pub use action::{PlanAction, ReasonCode};
pub use entry::{OutputEntry, SourceEntry};
pub use fingerprint::Fingerprint;
pub use policy::{Codec, EncoderId, Policy};
pub use summary::{ActionKind, FileEvent, RunSummary, Status};
pub use tagtable::TagTable;
