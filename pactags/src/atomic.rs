//! The write-to-sidecar-then-rename protocol used by every path that can
//! leave a destination file partially written: Convert's encoder output,
//! and Retag when the tag library can't guarantee in-place atomicity
//! (§4.5.1, §4.5.6, §8 invariant 9).

use std::io;
use std::path::Path;
use std::time::Duration;

const RETRY_DELAY: Duration = Duration::from_millis(50);

/// Renames `part_path` to `final_path`, same filesystem, exactly one
/// retry on a transient error (§5 "Retries"). `.part` is the caller's to
/// remove on any other failure — this function never deletes it.
pub fn commit(part_path: &Path, final_path: &Path) -> io::Result<()> {
    match std::fs::rename(part_path, final_path) {
        Ok(()) => Ok(()),
        Err(err) if is_transient(&err) => {
            std::thread::sleep(RETRY_DELAY);
            std::fs::rename(part_path, final_path)
        }
        Err(err) => Err(err),
    }
}

/// Best-effort removal of a dangling `.part` file; never panics, used on
/// every error/cancellation exit path and in the post-cancellation sweep
/// (§5).
pub fn remove_part(part_path: &Path) {
    if let Err(err) = std::fs::remove_file(part_path) {
        if err.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %part_path.display(), error = %err, "failed to remove dangling .part file");
        }
    }
}

/// The `.part` sidecar path for a given final destination path.
pub fn part_path(final_path: &Path) -> std::path::PathBuf {
    let mut os = final_path.as_os_str().to_owned();
    os.push(".part");
    std::path::PathBuf::from(os)
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(16) /* EBUSY */ | Some(11) /* EAGAIN */
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn commit_renames_part_to_final() {
        let dir = tempfile::tempdir().unwrap();
        let part = dir.path().join("out.m4a.part");
        let final_path = dir.path().join("out.m4a");
        fs::write(&part, b"data").unwrap();

        commit(&part, &final_path).unwrap();

        assert!(!part.exists());
        assert_eq!(fs::read(&final_path).unwrap(), b"data");
    }

    #[test]
    fn part_path_appends_suffix() {
        let p = part_path(Path::new("/a/b/song.m4a"));
        assert_eq!(p, Path::new("/a/b/song.m4a.part"));
    }

    #[test]
    fn remove_part_on_missing_file_does_not_panic() {
        remove_part(Path::new("/nonexistent/out.m4a.part"));
    }
}
