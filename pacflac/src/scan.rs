use std::path::Path;

use pacmodel::SourceEntry;

use crate::walk::walk_sorted;

const SOURCE_EXTENSIONS: &[&str] = &["flac"];

/// Walks `src_root` and produces one [`SourceEntry`] per discovered
/// `.flac` file, in deterministic sorted order.
///
/// A per-file I/O or decode error never aborts the scan (§4.2, §7
/// `ScanIoError`): the entry is still emitted, with `audio_md5 = None`
/// and `scan_error = true`, so the planner falls back to weak identity.
#[tracing::instrument(skip_all, fields(root = %src_root.display()))]
pub fn scan(src_root: &Path) -> std::io::Result<Vec<SourceEntry>> {
    let files = walk_sorted(src_root, SOURCE_EXTENSIONS)?;
    let mut entries = Vec::with_capacity(files.len());

    for (abs_path, rel_path) in files {
        entries.push(scan_one(&abs_path, rel_path));
    }

    tracing::info!(count = entries.len(), "source scan complete");
    Ok(entries)
}

fn scan_one(abs_path: &Path, rel_path: String) -> SourceEntry {
    let stat = std::fs::metadata(abs_path);

    let (size, mtime_ns, stat_failed) = match &stat {
        Ok(meta) => {
            let mtime_ns = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_nanos() as i128)
                .unwrap_or(0);
            (meta.len(), mtime_ns, false)
        }
        Err(err) => {
            tracing::warn!(path = %abs_path.display(), error = %err, "failed to stat source file");
            (0, 0, true)
        }
    };

    let (audio_md5, probe_failed) = match crate::streaminfo::read_audio_md5(abs_path) {
        Ok(md5) => (md5, false),
        Err(err) => {
            tracing::warn!(path = %abs_path.display(), error = %err, "failed to read STREAMINFO");
            (None, true)
        }
    };

    SourceEntry {
        rel_path,
        size,
        mtime_ns,
        audio_md5,
        scan_error: stat_failed || probe_failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_empty_tree_yields_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        let entries = scan(dir.path()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn scan_nonexistent_root_yields_no_entries() {
        let entries = scan(Path::new("/definitely/not/here")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn scan_non_flac_header_marks_scan_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.flac");
        fs::write(&path, b"not a real flac file").unwrap();

        let entries = scan(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].scan_error);
        assert_eq!(entries[0].audio_md5, None);
    }
}
