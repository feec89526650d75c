/// Top-level error a run can fail with before a [`pacmodel::RunSummary`]
/// exists — anything after this point is a per-file failure recorded
/// inside the summary instead (§6, §7).
#[derive(thiserror::Error, Debug)]
pub enum PacError {
    #[error("encoder preflight failed: {0}")]
    Preflight(#[from] pacexec::ExecError),

    #[error("failed to scan source tree: {0}")]
    Scan(#[source] std::io::Error),

    #[error("failed to index destination tree: {0}")]
    Index(#[source] std::io::Error),
}
