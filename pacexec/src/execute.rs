//! Executes one [`PlanAction`] against the filesystem (§4.5): the
//! per-action counterpart to `pacplan`'s pure decision logic. Every
//! function here does real I/O and subprocess work and is meant to run
//! inside a scheduler worker.

use std::path::Path;
use std::time::Instant;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::TagType;
use pacmodel::{ActionKind, Codec, FileEvent, Fingerprint, Policy, PlanAction, ReasonCode, Status};
use pactags::atomic::{commit, part_path, remove_part};

use crate::convert::encode;
use crate::error::ExecError;
use crate::preflight::Backend;

/// Immutable context shared by every worker for the duration of a run.
pub struct ExecContext<'a> {
    pub src_root: &'a Path,
    pub dst_root: &'a Path,
    pub backend: &'a Backend,
    pub policy: &'a Policy,
}

/// Runs `action` to completion (or failure) and returns its [`FileEvent`].
/// Never panics on a per-file failure — everything below `Convert`'s
/// subprocess spawn is caught and reported through `Status::Failed`.
pub fn execute_one(action: &PlanAction, ctx: &ExecContext) -> FileEvent {
    let start = Instant::now();
    let (kind, reason, source_rel, dest_rel) = describe(action);

    let result = match action {
        PlanAction::Convert { src, dst_rel, .. } => run_convert(src, dst_rel, ctx),
        PlanAction::Rename { from_rel, to_rel, src, .. } => run_rename(from_rel, to_rel, src, ctx),
        PlanAction::Retag { dst_rel, src, reason } => run_retag(dst_rel, src, *reason, ctx),
        PlanAction::Skip { .. } => Ok(()),
        PlanAction::Prune { dst_rel } => run_prune(dst_rel, ctx),
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(()) => FileEvent {
            action: kind,
            reason,
            source_rel,
            dest_rel,
            status: Status::Success,
            elapsed_ms,
            detail: None,
        },
        Err(err) => {
            tracing::warn!(dest_rel = %dest_rel, error = %err, "action failed");
            FileEvent {
                action: kind,
                reason,
                source_rel,
                dest_rel,
                status: Status::Failed,
                elapsed_ms,
                detail: Some(err.to_string()),
            }
        }
    }
}

fn describe(action: &PlanAction) -> (ActionKind, Option<ReasonCode>, Option<String>, String) {
    let kind = action.kind();
    let dest_rel = action.dst_rel().to_string();
    match action {
        PlanAction::Convert { src, reason, .. } => (kind, Some(*reason), Some(src.rel_path.clone()), dest_rel),
        PlanAction::Rename { src, reason, .. } => (kind, Some(*reason), Some(src.rel_path.clone()), dest_rel),
        PlanAction::Retag { src, reason, .. } => (kind, Some(*reason), Some(src.rel_path.clone()), dest_rel),
        PlanAction::Skip { reason, .. } => (kind, Some(*reason), None, dest_rel),
        PlanAction::Prune { .. } => (kind, None, None, dest_rel),
    }
}

fn run_convert(src: &pacmodel::SourceEntry, dst_rel: &str, ctx: &ExecContext) -> Result<(), ExecError> {
    let source_abs = ctx.src_root.join(&src.rel_path);
    let dest_abs = ctx.dst_root.join(dst_rel);
    if let Some(parent) = dest_abs.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let part = part_path(&dest_abs);

    encode(&source_abs, &part, ctx.backend, ctx.policy)?;

    let tags = pacflac::read_tags(&source_abs).map_err(|source| pactags::TagWriteError::Tag {
        path: source_abs.display().to_string(),
        source,
    })?;
    let cover = pacflac::extract_front_cover(&source_abs).ok().flatten();

    let fingerprint = Fingerprint {
        src_md5: src.audio_md5_hex().unwrap_or_default(),
        encoder: ctx.backend.id.as_str().to_string(),
        quality: ctx.policy.quality.clone(),
        version: ctx.policy.version.clone(),
        source_rel: src.rel_path.clone(),
    };

    let result = stamp_and_commit(&part, &dest_abs, tag_type_for(ctx.policy.codec), &tags, &fingerprint, cover, ctx.policy.cover_max_side);
    if result.is_err() {
        remove_part(&part);
    }
    result.map_err(ExecError::from)
}

fn run_rename(from_rel: &str, to_rel: &str, src: &pacmodel::SourceEntry, ctx: &ExecContext) -> Result<(), ExecError> {
    let from_abs = ctx.dst_root.join(from_rel);
    let to_abs = ctx.dst_root.join(to_rel);

    let fingerprint = pactags::read_fingerprint(&from_abs)
        .ok()
        .flatten()
        .ok_or_else(|| ExecError::CommitFailed {
            path: from_abs.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "rename source has no fingerprint"),
        })?;

    pactags::rename(&from_abs, &to_abs, &fingerprint, &src.rel_path)?;
    Ok(())
}

fn run_retag(dst_rel: &str, src: &pacmodel::SourceEntry, reason: ReasonCode, ctx: &ExecContext) -> Result<(), ExecError> {
    let dst_abs = ctx.dst_root.join(dst_rel);
    let source_abs = ctx.src_root.join(&src.rel_path);

    match reason {
        ReasonCode::LegacyAdopt => {
            let tags = pacflac::read_tags(&source_abs).map_err(|source| pactags::TagWriteError::Tag {
                path: source_abs.display().to_string(),
                source,
            })?;
            let fingerprint = Fingerprint {
                src_md5: src.audio_md5_hex().unwrap_or_default(),
                encoder: ctx.backend.id.as_str().to_string(),
                quality: ctx.policy.quality.clone(),
                version: ctx.policy.version.clone(),
                source_rel: src.rel_path.clone(),
            };
            pactags::retag(&dst_abs, &fingerprint, Some(&tags))?;
        }
        ReasonCode::StampRefresh => {
            let mut fingerprint = pactags::read_fingerprint(&dst_abs)
                .ok()
                .flatten()
                .ok_or_else(|| ExecError::CommitFailed {
                    path: dst_abs.display().to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "stamp refresh target has no fingerprint"),
                })?;
            fingerprint.version = ctx.policy.version.clone();
            fingerprint.source_rel = src.rel_path.clone();
            pactags::retag(&dst_abs, &fingerprint, None)?;
        }
        other => {
            return Err(ExecError::CommitFailed {
                path: dst_abs.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("unexpected Retag reason {other:?}")),
            });
        }
    }
    Ok(())
}

fn run_prune(dst_rel: &str, ctx: &ExecContext) -> Result<(), ExecError> {
    let dst_abs = ctx.dst_root.join(dst_rel);
    match std::fs::remove_file(&dst_abs) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ExecError::CommitFailed {
            path: dst_abs.display().to_string(),
            source: err,
        }),
    }
}

/// Opens the just-encoded `.part` file, attaches the built tag, saves in
/// place, then commits it to `final_path` (§4.5.4, §8 invariant 9).
fn stamp_and_commit(
    part: &Path,
    final_path: &Path,
    tag_type: TagType,
    tags: &pacmodel::TagTable,
    fingerprint: &Fingerprint,
    cover: Option<pacflac::CoverArt>,
    cover_max_side: Option<u32>,
) -> Result<(), pactags::TagWriteError> {
    let built = pactags::build_tag(final_path, tag_type, tags, fingerprint, cover, cover_max_side)?;

    let mut tagged_file = Probe::open(part)
        .map_err(|source| pactags::TagWriteError::Tag {
            path: part.display().to_string(),
            source,
        })?
        .read()
        .map_err(|source| pactags::TagWriteError::Tag {
            path: part.display().to_string(),
            source,
        })?;

    tagged_file.insert_tag(built);
    tagged_file
        .save_to_path(part, WriteOptions::default())
        .map_err(|source| pactags::TagWriteError::Tag {
            path: part.display().to_string(),
            source,
        })?;

    commit(part, final_path).map_err(|source| pactags::TagWriteError::Io {
        path: final_path.display().to_string(),
        source,
    })
}

fn tag_type_for(codec: Codec) -> TagType {
    match codec {
        Codec::Aac => TagType::Mp4Ilst,
        Codec::Opus => TagType::VorbisComments,
    }
}
