//! Orphan detection (§4.4.3): destination files with no corresponding
//! source in this scan.

use std::collections::HashSet;

use pacmodel::{PlanAction, ReasonCode};
use pactags::DestinationIndex;

/// Appends a `Prune` (or report-only `Skip`) action for every destination
/// entry not referenced by `actions`.
///
/// `used` is the set of destination-relative paths the plan already
/// accounts for: every action's own target, plus a `Rename`'s source
/// path (the file is moving, not orphaned).
pub fn append_orphans(actions: &mut Vec<PlanAction>, dest: &DestinationIndex, prune: bool) {
    let used = used_paths(actions);

    let mut orphaned: Vec<&String> = dest.by_rel.keys().filter(|rel| !used.contains(rel.as_str())).collect();
    orphaned.sort();

    for rel in orphaned {
        if prune {
            actions.push(PlanAction::Prune { dst_rel: rel.clone() });
        } else {
            actions.push(PlanAction::Skip {
                dst_rel: rel.clone(),
                reason: ReasonCode::Orphan,
            });
        }
    }
}

fn used_paths(actions: &[PlanAction]) -> HashSet<String> {
    let mut used = HashSet::new();
    for action in actions {
        used.insert(action.dst_rel().to_string());
        if let PlanAction::Rename { from_rel, .. } = action {
            used.insert(from_rel.clone());
        }
    }
    used
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacmodel::{Fingerprint, OutputEntry, SourceEntry};

    fn output(rel: &str) -> OutputEntry {
        OutputEntry {
            rel_path: rel.into(),
            size: 1,
            mtime_ns: 0,
            fingerprint: None,
            index_error: false,
        }
    }

    fn source(rel: &str) -> SourceEntry {
        SourceEntry {
            rel_path: rel.into(),
            size: 1,
            mtime_ns: 0,
            audio_md5: Some([1u8; 16]),
            scan_error: false,
        }
    }

    #[test]
    fn untouched_destination_becomes_prune_when_policy_allows() {
        let mut dest = DestinationIndex::default();
        dest.by_rel.insert("A/gone.m4a".into(), output("A/gone.m4a"));

        let mut actions = Vec::new();
        append_orphans(&mut actions, &dest, true);

        assert_eq!(actions.len(), 1);
        assert!(matches!(&actions[0], PlanAction::Prune { dst_rel } if dst_rel == "A/gone.m4a"));
    }

    #[test]
    fn untouched_destination_becomes_report_only_skip_when_prune_disabled() {
        let mut dest = DestinationIndex::default();
        dest.by_rel.insert("A/gone.m4a".into(), output("A/gone.m4a"));

        let mut actions = Vec::new();
        append_orphans(&mut actions, &dest, false);

        assert!(matches!(&actions[0], PlanAction::Skip { reason: ReasonCode::Orphan, .. }));
    }

    #[test]
    fn destination_referenced_by_convert_is_not_orphaned() {
        let mut dest = DestinationIndex::default();
        dest.by_rel.insert("A/1.m4a".into(), output("A/1.m4a"));

        let mut actions = vec![PlanAction::Convert {
            src: source("A/1.flac"),
            dst_rel: "A/1.m4a".into(),
            reason: pacmodel::ReasonCode::PolicyChanged,
        }];
        append_orphans(&mut actions, &dest, true);

        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn rename_source_path_is_not_orphaned() {
        let mut dest = DestinationIndex::default();
        dest.by_rel.insert("A/old.m4a".into(), output("A/old.m4a"));
        let fp = Fingerprint {
            src_md5: "a".repeat(32),
            encoder: "libfdk_aac".into(),
            quality: "5".into(),
            version: "1.0.0".into(),
            source_rel: "A/old.flac".into(),
        };
        dest.by_rel.get_mut("A/old.m4a").unwrap().fingerprint = Some(fp);

        let mut actions = vec![PlanAction::Rename {
            from_rel: "A/old.m4a".into(),
            to_rel: "A/new.m4a".into(),
            src: source("A/new.flac"),
            reason: pacmodel::ReasonCode::PathDrift,
        }];
        append_orphans(&mut actions, &dest, true);

        assert_eq!(actions.len(), 1);
    }
}
