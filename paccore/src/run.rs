//! The facade entry point (§2): `scan -> index -> plan -> execute`, with
//! encoder preflight run once up front so the policy's `encoder_id` is
//! frozen before planning ever sees it.

use std::path::Path;

use pacmodel::{Policy, RunSummary};
use pacexec::{ExecContext, RunControl};

use crate::error::PacError;
use crate::verify::verify_run;

/// Runs one full reconciliation pass. `policy.encoder_id` may be left
/// empty to auto-select the best available backend for `policy.codec`;
/// otherwise it names the encoder the caller requires, and preflight
/// fails with [`PacError::Preflight`] if it isn't available.
pub fn run(src_root: &Path, dst_root: &Path, policy: &Policy) -> Result<RunSummary, PacError> {
    run_with_control(src_root, dst_root, policy, &RunControl::default())
}

/// As [`run`], but takes a caller-owned [`RunControl`] so a long-running
/// caller (a GUI, a CLI signal handler) can cancel or pause a run already
/// in flight.
pub fn run_with_control(
    src_root: &Path,
    dst_root: &Path,
    policy: &Policy,
    control: &RunControl,
) -> Result<RunSummary, PacError> {
    let backends = pacexec::probe(policy.probe_qaac);
    let requested = (!policy.encoder_id.as_str().is_empty()).then(|| policy.encoder_id.as_str());
    let backend = pacexec::select(&backends, policy.codec, requested)?;

    let mut policy = policy.clone();
    policy.encoder_id = backend.id.clone();

    let sources = pacflac::scan(src_root).map_err(PacError::Scan)?;
    let dest = pactags::DestinationIndex::build(dst_root).map_err(PacError::Index)?;

    tracing::info!(sources = sources.len(), outputs = dest.by_rel.len(), "scan and index complete");

    let plan = pacplan::plan(&sources, &dest, &policy);
    tracing::info!(actions = plan.len(), "plan complete");

    let ctx = ExecContext {
        src_root,
        dst_root,
        backend: &backend,
        policy: &policy,
    };

    let mut summary = pacexec::run_plan(plan, &ctx, policy.worker_count_effective(), control);

    if policy.verify {
        verify_run(&mut summary, src_root, dst_root, &policy);
    }

    tracing::info!(
        converted = summary.converted,
        renamed = summary.renamed,
        retagged = summary.retagged,
        skipped = summary.skipped,
        pruned = summary.pruned,
        failed = summary.failed,
        "run complete"
    );

    Ok(summary)
}
