use std::io;

/// Errors surfaced by encoder preflight and the conversion pipelines
/// (§7 `NoEncoder`, `EncodeFailed`).
#[derive(thiserror::Error, Debug)]
pub enum ExecError {
    #[error("no encoder backend available for {codec:?}")]
    NoBackendAvailable { codec: pacmodel::Codec },

    #[error("failed to spawn {tool}: {source}")]
    Spawn { tool: String, source: io::Error },

    #[error("{tool} exited with {status}: {stderr}")]
    EncodeFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("tag/fingerprint write failed: {0}")]
    TagWrite(#[from] pactags::TagWriteError),

    #[error("commit of {path} failed: {source}")]
    CommitFailed { path: String, source: io::Error },

    #[error("cancelled before commit")]
    Cancelled,
}
