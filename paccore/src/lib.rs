//! The derivative audio library's facade crate: wires the scanner
//! (`pacflac`), destination indexer and tag I/O (`pactags`), the
//! planner (`pacplan`), and the executor (`pacexec`) into the single
//! `run` entry point described by §2 of the system design.

mod error;
mod run;
mod verify;

pub use error::PacError;
pub use run::{run, run_with_control};

pub use pacexec::RunControl;
pub use pacmodel::{Codec, EncoderId, Policy, RunSummary};
