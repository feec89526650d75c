//! The per-source decision algorithm (§4.4.2) — the heart of the
//! planner. Pure function of one source, its mapped destination path,
//! the destination index, and the run policy.

use pacmodel::{Fingerprint, PlanAction, Policy, ReasonCode, SourceEntry};
use pactags::DestinationIndex;

/// Decides the action for `source`, whose sanitised+resolved destination
/// path is `d_target`.
pub fn decide(source: &SourceEntry, d_target: &str, dest: &DestinationIndex, policy: &Policy) -> PlanAction {
    if policy.force_reencode {
        return convert(source, d_target, ReasonCode::Forced);
    }

    if let Some(src_md5_hex) = source.audio_md5_hex() {
        if let Some(candidates) = dest.by_md5.get(&src_md5_hex) {
            if !candidates.is_empty() {
                return decide_content_match(source, d_target, dest, policy, candidates, &src_md5_hex);
            }
        }
    }

    match dest.by_rel.get(d_target) {
        None => convert(source, d_target, ReasonCode::NoPriorOutput),
        Some(existing) => match &existing.fingerprint {
            None => {
                if policy.adopt {
                    PlanAction::Retag {
                        dst_rel: d_target.to_string(),
                        src: source.clone(),
                        reason: ReasonCode::LegacyAdopt,
                    }
                } else {
                    convert(source, d_target, ReasonCode::LegacyOverwrite)
                }
            }
            Some(_fp) if source.audio_md5.is_none() => {
                // Weak identity: we cannot confirm the existing bytes are
                // still an encoding of the current source content. §4.4.2
                // bullet 3: "if either changed ... we cannot know — prefer
                // Convert."
                convert(source, d_target, ReasonCode::WeakIdentityChanged)
            }
            Some(_fp) => {
                // The by_md5 index should already have matched this case
                // when source.audio_md5 is present and equal to fp.src_md5;
                // reaching here at all would indicate an index
                // inconsistency. Treat defensively as a content swap so we
                // never silently Skip on an unverified assumption.
                convert(source, d_target, ReasonCode::ContentSwapped)
            }
        },
    }
}

fn decide_content_match(
    source: &SourceEntry,
    d_target: &str,
    dest: &DestinationIndex,
    policy: &Policy,
    candidates: &[String],
    _src_md5_hex: &str,
) -> PlanAction {
    let chosen_rel = candidates
        .iter()
        .find(|rel| rel.as_str() == d_target)
        .cloned()
        .unwrap_or_else(|| candidates[0].clone());

    let output = dest
        .by_rel
        .get(&chosen_rel)
        .expect("by_md5 entries always have a matching by_rel entry");
    let fp = output
        .fingerprint
        .as_ref()
        .expect("by_md5 only indexes fingerprinted outputs");

    if !fp.matches_policy(policy.encoder_id.as_str(), &policy.quality) {
        return convert(source, d_target, ReasonCode::PolicyChanged);
    }

    if output.rel_path == d_target {
        if policy.retag_stale_stamp && stamp_is_stale(fp, policy, source) {
            return PlanAction::Retag {
                dst_rel: d_target.to_string(),
                src: source.clone(),
                reason: ReasonCode::StampRefresh,
            };
        }
        PlanAction::Skip {
            dst_rel: d_target.to_string(),
            reason: ReasonCode::UpToDate,
        }
    } else {
        PlanAction::Rename {
            from_rel: output.rel_path.clone(),
            to_rel: d_target.to_string(),
            src: source.clone(),
            reason: ReasonCode::PathDrift,
        }
    }
}

/// Step 5: an otherwise up-to-date output whose fingerprint disagrees on
/// encoder/version/source_rel (the bytes remain acceptable — `encoder`
/// already matched above) should still be stamp-refreshed. Only
/// `version`/`source_rel` drift reaches here, since `encoder`/`quality`
/// mismatches upgrade to Convert before this is ever called.
fn stamp_is_stale(fp: &Fingerprint, policy: &Policy, source: &SourceEntry) -> bool {
    fp.version != policy.version || fp.source_rel != source.rel_path
}

fn convert(source: &SourceEntry, d_target: &str, reason: ReasonCode) -> PlanAction {
    PlanAction::Convert {
        src: source.clone(),
        dst_rel: d_target.to_string(),
        reason,
    }
}
