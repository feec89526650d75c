use serde::{Deserialize, Serialize};

use crate::action::ReasonCode;

/// Discriminant mirroring [`crate::PlanAction`]'s variants, used in
/// reporting where the full action payload isn't needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Convert,
    Rename,
    Retag,
    Skip,
    Prune,
}

/// Terminal status of one executed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    /// Per-file failure; see `reason` on the owning [`FileEvent`] for the
    /// error kind.
    Failed,
    /// Observed cancellation before the commit step.
    Cancelled,
}

/// One record per planned action, after execution. The caller formats
/// these into log lines or JSON; this crate only produces the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEvent {
    pub action: ActionKind,
    pub reason: Option<ReasonCode>,
    pub source_rel: Option<String>,
    pub dest_rel: String,
    pub status: Status,
    pub elapsed_ms: u64,
    /// Human-readable detail, populated on `Status::Failed`.
    pub detail: Option<String>,
}

/// Aggregate counters and timing for a completed run, returned by
/// `paccore::run`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub converted: usize,
    pub skipped: usize,
    pub renamed: usize,
    pub retagged: usize,
    pub pruned: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub total_elapsed_ms: u64,
    /// Normalised identifier of the backend frozen for this run.
    pub backend: String,
    pub events: Vec<FileEvent>,
}

impl RunSummary {
    pub fn record(&mut self, event: FileEvent) {
        match (event.action, event.status) {
            (_, Status::Cancelled) => self.cancelled += 1,
            (_, Status::Failed) => self.failed += 1,
            (ActionKind::Convert, Status::Success) => self.converted += 1,
            (ActionKind::Rename, Status::Success) => self.renamed += 1,
            (ActionKind::Retag, Status::Success) => self.retagged += 1,
            (ActionKind::Skip, Status::Success) => self.skipped += 1,
            (ActionKind::Prune, Status::Success) => self.pruned += 1,
        }
        self.events.push(event);
    }

    /// Exit-status contract (§6): 0 on full success, a distinct non-zero
    /// code when any file action failed. Preflight failures never reach
    /// this point — they are propagated as `Err` out of `run()` before a
    /// `RunSummary` exists.
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}
