//! Implements the Rename action (§4.5.5): move bytes in place, updating
//! the embedded `source_rel` field when it has drifted.
//!
//! Crash-safety argument (§9 open question, resolved): the fingerprint's
//! `source_rel` is rewritten *before* the filesystem rename, through the
//! same `.part` + atomic-rename protocol as Retag. If the process dies
//! between the tag rewrite and the rename, `from_rel` still exists
//! (unchanged) and `to_rel` does not exist at all — a second run simply
//! replans a `Rename` (or, if content also changed, a `Convert`). The
//! alternative (rename first, then retag) has a worse failure window: a
//! crash after the filesystem rename but before the tag rewrite leaves a
//! file at `to_rel` whose fingerprint still claims `from_rel`, which is
//! indistinguishable from a legitimate second file at `from_rel` that a
//! concurrent process created — exactly the ambiguity §8 invariant 9
//! rules out.

use std::path::Path;

use pacmodel::Fingerprint;

use crate::atomic::commit;
use crate::error::TagWriteError;
use crate::retag::retag;

/// Moves `from_abs` to `to_abs`, first rewriting the fingerprint's
/// `source_rel` in place if it no longer matches `new_source_rel`.
pub fn rename(
    from_abs: &Path,
    to_abs: &Path,
    current_fingerprint: &Fingerprint,
    new_source_rel: &str,
) -> Result<(), TagWriteError> {
    if current_fingerprint.source_rel != new_source_rel {
        let mut updated = current_fingerprint.clone();
        updated.source_rel = new_source_rel.to_string();
        retag(from_abs, &updated, None)?;
    }

    if let Some(parent) = to_abs.parent() {
        std::fs::create_dir_all(parent).map_err(|source| TagWriteError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    commit(from_abs, to_abs).map_err(|source| TagWriteError::Io {
        path: to_abs.display().to_string(),
        source,
    })
}
