//! Encoder preflight, the conversion pipelines, per-action execution,
//! and the bounded worker scheduler (§4.1, §4.5, §5).

mod convert;
mod error;
mod execute;
mod preflight;
mod scheduler;

pub use error::ExecError;
pub use execute::{execute_one, ExecContext};
pub use preflight::{probe, select, Backend, BackendSet, PipelineKind};
pub use scheduler::{run_plan, RunControl};
