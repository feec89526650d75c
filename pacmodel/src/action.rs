use serde::{Deserialize, Serialize};

use crate::entry::SourceEntry;

/// Why the planner chose the action it did. Carried on every [`PlanAction`]
/// for reporting and, on a `Skip`, for `Scenario`-style assertions in
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasonCode {
    /// Fresh destination path, no prior output at all.
    NoPriorOutput,
    /// Same content, same encoder settings, same path: nothing to do.
    UpToDate,
    /// Same content, same encoder settings, path drifted.
    PathDrift,
    /// Encoder identity or quality setting changed since the output was
    /// written.
    PolicyChanged,
    /// A legacy (unfingerprinted) output exists at the target path and
    /// adoption is enabled.
    LegacyAdopt,
    /// A legacy output exists at the target path and adoption is disabled.
    LegacyOverwrite,
    /// A fingerprinted output exists at the target path but belongs to
    /// different content (two sources swapped paths).
    ContentSwapped,
    /// Weak identity (no audio-MD5) and the source's size/mtime changed
    /// since the fingerprint was written; correctness cannot be assumed.
    WeakIdentityChanged,
    /// `policy.force_reencode` was set.
    Forced,
    /// The fingerprint's encoder/version/source_rel drifted even though the
    /// bytes remain acceptable; refresh the stamp only.
    StampRefresh,
    /// Destination file has no corresponding source in this scan.
    Orphan,
}

/// One action the executor must realise. Each variant carries the minimum
/// data the executor needs to perform it without consulting the planner
/// again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanAction {
    /// Encode `src` to `dst_rel`.
    Convert {
        src: SourceEntry,
        dst_rel: String,
        reason: ReasonCode,
    },
    /// The bytes at `from_rel` already are an acceptable encoding of `src`;
    /// move them to `to_rel` without re-encoding.
    Rename {
        from_rel: String,
        to_rel: String,
        src: SourceEntry,
        reason: ReasonCode,
    },
    /// The bytes at `dst_rel` are acceptable but the fingerprint is
    /// missing or stale; rewrite tags without re-encoding.
    Retag {
        dst_rel: String,
        src: SourceEntry,
        reason: ReasonCode,
    },
    /// Up to date; emitted for reporting only, the executor is a no-op.
    Skip { dst_rel: String, reason: ReasonCode },
    /// Destination has no corresponding source; delete if policy permits.
    Prune { dst_rel: String },
}

impl PlanAction {
    /// The destination-relative path this action targets (for `Rename`,
    /// the new path).
    pub fn dst_rel(&self) -> &str {
        match self {
            PlanAction::Convert { dst_rel, .. } => dst_rel,
            PlanAction::Rename { to_rel, .. } => to_rel,
            PlanAction::Retag { dst_rel, .. } => dst_rel,
            PlanAction::Skip { dst_rel, .. } => dst_rel,
            PlanAction::Prune { dst_rel } => dst_rel,
        }
    }

    pub fn kind(&self) -> crate::summary::ActionKind {
        match self {
            PlanAction::Convert { .. } => crate::summary::ActionKind::Convert,
            PlanAction::Rename { .. } => crate::summary::ActionKind::Rename,
            PlanAction::Retag { .. } => crate::summary::ActionKind::Retag,
            PlanAction::Skip { .. } => crate::summary::ActionKind::Skip,
            PlanAction::Prune { .. } => crate::summary::ActionKind::Prune,
        }
    }
}
