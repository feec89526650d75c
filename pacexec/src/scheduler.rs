//! The bounded worker pool (§5): a fixed number of OS threads pull
//! actions off a `crossbeam-channel` of capacity `2*N`, so at most
//! `2*N` actions are ever in flight or queued at once, bounding memory
//! and open-file-descriptor use regardless of plan size.
//!
//! Deliberately thread-per-worker rather than async: every action here
//! either blocks on a subprocess or blocks on file I/O, and the fixed,
//! small worker count makes a plain OS thread pool the simpler and more
//! predictable fit (generalises `pactags::index`'s `std::thread::scope`
//! pattern from a one-shot parallel read to a long-lived pool).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

use pacmodel::{FileEvent, PlanAction, RunSummary, Status};

use crate::execute::{execute_one, ExecContext};

/// Cooperative controls a caller can flip mid-run. Checked by every
/// worker between actions, never mid-subprocess (§5: cancellation takes
/// effect at task boundaries, not by killing an in-flight encode).
#[derive(Default)]
pub struct RunControl {
    cancel: AtomicBool,
    paused: Mutex<bool>,
    resume: Condvar,
}

impl RunControl {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        self.resume.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        *self.paused.lock().expect("run control mutex poisoned") = true;
    }

    pub fn resume(&self) {
        *self.paused.lock().expect("run control mutex poisoned") = false;
        self.resume.notify_all();
    }

    fn wait_while_paused(&self) {
        let mut paused = self.paused.lock().expect("run control mutex poisoned");
        while *paused && !self.is_cancelled() {
            paused = self.resume.wait(paused).expect("run control mutex poisoned");
        }
    }
}

/// Runs every `action` in `plan` across `worker_count` threads, blocking
/// until the whole plan has been processed or cancellation drains the
/// queue. Retrying is scoped to the commit/rename step itself (§5
/// "Retries": only the final rename gets one retry on a transient error),
/// handled inside `pactags::atomic::commit`; this scheduler never re-runs
/// a whole action, so an encoder's non-zero exit is never retried.
pub fn run_plan(plan: Vec<PlanAction>, ctx: &ExecContext, worker_count: usize, control: &RunControl) -> RunSummary {
    let worker_count = worker_count.max(1);
    let capacity = worker_count.saturating_mul(2).max(1);
    let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, PlanAction)>(capacity);
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, FileEvent)>();

    let total = plan.len();

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (idx, action) in job_rx {
                    control.wait_while_paused();
                    if control.is_cancelled() {
                        let event = cancelled_event(&action);
                        let _ = result_tx.send((idx, event));
                        continue;
                    }

                    let event = execute_one(&action, ctx);
                    let _ = result_tx.send((idx, event));
                }
            });
        }

        scope.spawn(move || {
            for (idx, action) in plan.into_iter().enumerate() {
                if job_tx.send((idx, action)).is_err() {
                    break;
                }
            }
            drop(job_tx);
        });

        drop(result_tx);

        let mut slots: Vec<Option<FileEvent>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);
        for (idx, event) in result_rx {
            slots[idx] = Some(event);
        }

        let mut summary = RunSummary {
            backend: ctx.backend.id.as_str().to_string(),
            ..Default::default()
        };
        for event in slots.into_iter().flatten() {
            summary.total_elapsed_ms += event.elapsed_ms;
            summary.record(event);
        }

        if control.is_cancelled() {
            sweep_stray_parts(ctx.dst_root);
        }

        summary
    })
}

/// After cancellation, a worker may have already written a `.part` file
/// for the action it was mid-way through when it observed the cancel
/// flag, with no later step left to remove it. This walks `dst_root` for
/// any leftover `.part` entries and removes them (§5).
fn sweep_stray_parts(dst_root: &std::path::Path) {
    let strays = match pacflac::walk_sorted(dst_root, &["part"]) {
        Ok(found) => found,
        Err(err) => {
            tracing::warn!(error = %err, "failed to sweep for stray .part files after cancellation");
            return;
        }
    };
    for (path, _rel) in strays {
        pactags::atomic::remove_part(&path);
    }
}

fn cancelled_event(action: &PlanAction) -> FileEvent {
    FileEvent {
        action: action.kind(),
        reason: None,
        source_rel: None,
        dest_rel: action.dst_rel().to_string(),
        status: Status::Cancelled,
        elapsed_ms: 0,
        detail: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preflight::{Backend, PipelineKind};
    use pacmodel::{Codec, EncoderId, Policy};

    fn policy() -> Policy {
        Policy {
            codec: Codec::Aac,
            encoder_id: EncoderId("libfdk_aac".into()),
            quality: "5".into(),
            version: "1.0.0".into(),
            worker_count: 2,
            adopt: true,
            prune: false,
            force_reencode: false,
            retag_stale_stamp: true,
            pcm_codec: "s24le".into(),
            cover_max_side: None,
            verify: false,
            strict_verify: false,
            probe_qaac: false,
        }
    }

    #[test]
    fn empty_plan_yields_empty_summary() {
        let backend = Backend {
            id: EncoderId("libfdk_aac".into()),
            codec: Codec::Aac,
            ffmpeg_path: "ffmpeg".into(),
            pipeline: PipelineKind::Direct,
            external_tool: None,
        };
        let pol = policy();
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let ctx = ExecContext {
            src_root: src.path(),
            dst_root: dst.path(),
            backend: &backend,
            policy: &pol,
        };
        let control = RunControl::default();

        let summary = run_plan(Vec::new(), &ctx, 2, &control);
        assert_eq!(summary.events.len(), 0);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn pre_cancelled_run_marks_every_action_cancelled() {
        let backend = Backend {
            id: EncoderId("libfdk_aac".into()),
            codec: Codec::Aac,
            ffmpeg_path: "ffmpeg".into(),
            pipeline: PipelineKind::Direct,
            external_tool: None,
        };
        let pol = policy();
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let ctx = ExecContext {
            src_root: src.path(),
            dst_root: dst.path(),
            backend: &backend,
            policy: &pol,
        };
        let control = RunControl::default();
        control.cancel();

        let plan = vec![PlanAction::Prune { dst_rel: "A/1.m4a".into() }];
        let summary = run_plan(plan, &ctx, 1, &control);
        assert_eq!(summary.cancelled, 1);
    }
}
