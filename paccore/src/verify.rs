//! Optional post-run verification pass (§4.5.8): re-opens every
//! successfully converted or retagged output and compares its tags and
//! fingerprint against the source. A mismatch is a warning unless
//! `policy.strict_verify` is set, in which case it demotes the event to
//! `Status::Failed` and the run's exit code reflects it.

use std::path::Path;

use pacmodel::{ActionKind, Policy, RunSummary, Status};

/// Mutates `summary` in place, re-verifying every successful `Convert`
/// and `Retag` event.
pub fn verify_run(summary: &mut RunSummary, src_root: &Path, dst_root: &Path, policy: &Policy) {
    for event in &mut summary.events {
        if event.status != Status::Success {
            continue;
        }
        if !matches!(event.action, ActionKind::Convert | ActionKind::Retag) {
            continue;
        }
        let Some(source_rel) = &event.source_rel else { continue };

        let source_abs = src_root.join(source_rel);
        let output_abs = dst_root.join(&event.dest_rel);

        let mismatches = match verify_one(&source_abs, &output_abs, policy) {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(dest_rel = %event.dest_rel, error = %err, "verification itself failed to run");
                continue;
            }
        };

        if mismatches.is_empty() {
            continue;
        }

        tracing::warn!(dest_rel = %event.dest_rel, mismatches = ?mismatches, "post-encode verification found mismatches");
        if policy.strict_verify {
            event.status = Status::Failed;
            event.detail = Some(format!("verification mismatches: {mismatches:?}"));
        }
    }

    recount(summary);
}

fn verify_one(source_abs: &Path, output_abs: &Path, policy: &Policy) -> Result<Vec<pactags::Mismatch>, pactags::IndexError> {
    let source_tags = pacflac::read_tags(source_abs).map_err(|source| pactags::IndexError::TagParse {
        path: source_abs.display().to_string(),
        source,
    })?;
    let source_has_cover = pacflac::extract_front_cover(source_abs).ok().flatten().is_some();

    let mut mismatches = pactags::verify_tags(output_abs, &source_tags, source_has_cover)?;

    let fingerprint_ok = pactags::read_fingerprint(output_abs)?
        .map(|fp| fp.matches_policy(policy.encoder_id.as_str(), &policy.quality))
        .unwrap_or(false);
    if !fingerprint_ok {
        mismatches.push(pactags::Mismatch {
            field: "fingerprint_policy",
            expected: format!("{}@{}", policy.encoder_id.as_str(), policy.quality),
            actual: "mismatched".to_string(),
        });
    }

    Ok(mismatches)
}

/// Recomputes the aggregate counters from `summary.events` after
/// in-place status demotions.
fn recount(summary: &mut RunSummary) {
    let backend = summary.backend.clone();
    let events = std::mem::take(&mut summary.events);
    *summary = RunSummary {
        backend,
        ..Default::default()
    };
    for event in events {
        summary.total_elapsed_ms += event.elapsed_ms;
        summary.record(event);
    }
}
