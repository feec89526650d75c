//! Top-level planner orchestration (§4.4): produces a deterministic
//! [`PlanAction`] list from a source scan, a destination index, and a
//! run policy.

use pacmodel::{PlanAction, Policy, ReasonCode, SourceEntry};
use pactags::DestinationIndex;

use crate::collision::CollisionResolver;
use crate::decide::decide;
use crate::mapping::candidate_rel;
use crate::orphan::append_orphans;

/// Builds the full plan for `sources` against `dest` under `policy`.
///
/// `sources` need not be pre-sorted; this function sorts by `rel_path`
/// itself so that plan order — and therefore collision-suffix
/// assignment — is a pure function of content, never of scan order
/// (§8 invariant 2, determinism).
pub fn plan(sources: &[SourceEntry], dest: &DestinationIndex, policy: &Policy) -> Vec<PlanAction> {
    let mut ordered: Vec<&SourceEntry> = sources.iter().collect();
    ordered.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

    let mut resolver = CollisionResolver::new(dest.by_rel.keys().cloned());
    let mut actions = Vec::with_capacity(ordered.len());

    for source in ordered {
        let mapped = candidate_rel(&source.rel_path, policy.codec);
        let action = decide(source, &mapped, dest, policy);
        let action = resolve_collision(action, &mut resolver);
        actions.push(action);
    }

    append_orphans(&mut actions, dest, policy.prune);
    actions
}

/// Runs an already-decided action's destination path through collision
/// resolution and claims it. `Convert { NoPriorOutput }` is the only
/// case that can legitimately collide with another path chosen in this
/// same plan, or with an existing destination path that only differs by
/// case — every other reason code was decided against a path that
/// already names an existing (or, for `Rename`, a deliberately vacated)
/// destination entry.
fn resolve_collision(action: PlanAction, resolver: &mut CollisionResolver) -> PlanAction {
    match action {
        PlanAction::Convert { src, dst_rel, reason: ReasonCode::NoPriorOutput } => {
            let resolved = resolver.resolve(&dst_rel);
            PlanAction::Convert {
                src,
                dst_rel: resolved,
                reason: ReasonCode::NoPriorOutput,
            }
        }
        PlanAction::Rename { from_rel, to_rel, src, reason } => {
            let resolved = resolver.resolve(&to_rel);
            PlanAction::Rename {
                from_rel,
                to_rel: resolved,
                src,
                reason,
            }
        }
        other => {
            resolver.reserve(other.dst_rel());
            other
        }
    }
}
