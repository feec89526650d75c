//! Collision resolution (§4.4.1 step 3): ensures no two actions in a
//! single plan target the same final destination path, and that paths
//! stay unique even on case-insensitive destination filesystems.

use std::collections::HashSet;

/// Tracks which case-folded destination paths are already spoken for
/// while the plan is under construction.
pub struct CollisionResolver {
    /// Case-folded paths already present in the destination tree that
    /// this plan does not intend to reuse or supersede.
    taken_existing: HashSet<String>,
    /// Case-folded paths already assigned to prior actions in this plan.
    taken_planned: HashSet<String>,
}

impl CollisionResolver {
    pub fn new(existing_paths: impl IntoIterator<Item = String>) -> Self {
        Self {
            taken_existing: existing_paths.into_iter().map(|p| fold(&p)).collect(),
            taken_planned: HashSet::new(),
        }
    }

    /// Marks `rel_path` as claimed without going through collision
    /// resolution (used for Skip/Rename targets whose destination is
    /// fixed by construction, not by the path-mapping step).
    pub fn reserve(&mut self, rel_path: &str) {
        self.taken_planned.insert(fold(rel_path));
    }

    /// Resolves `candidate` against both sets, appending ` (2)`, ` (3)`,
    /// … to the filename stem until the case-folded form is unique.
    /// Claims the result for subsequent calls.
    pub fn resolve(&mut self, candidate: &str) -> String {
        let mut attempt = candidate.to_string();
        let mut n = 2;
        while self.taken_existing.contains(&fold(&attempt)) || self.taken_planned.contains(&fold(&attempt)) {
            attempt = suffixed(candidate, n);
            n += 1;
        }
        self.taken_planned.insert(fold(&attempt));
        attempt
    }
}

fn fold(path: &str) -> String {
    path.to_lowercase()
}

/// Inserts ` (n)` before the extension of the final path segment.
fn suffixed(candidate: &str, n: usize) -> String {
    let (dir, file) = match candidate.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, candidate),
    };

    let stem_and_ext = match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{file} ({n})"),
    };

    match dir {
        Some(dir) => format!("{dir}/{stem_and_ext}"),
        None => stem_and_ext,
    }
}
