use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pacmodel::OutputEntry;
use pacflac::walk_sorted;

use crate::fingerprint_io::read_fingerprint;

const DEST_EXTENSIONS: &[&str] = &["m4a", "opus"];

/// The destination index: every existing output under the destination
/// root, keyed two ways (§4.3).
#[derive(Debug, Default)]
pub struct DestinationIndex {
    /// `rel_path -> OutputEntry`, unique.
    pub by_rel: HashMap<String, OutputEntry>,
    /// `src_md5 (hex) -> rel_paths`, ordered lexicographically for
    /// deterministic tie-break (§3 invariants).
    pub by_md5: HashMap<String, Vec<String>>,
}

impl DestinationIndex {
    /// Walks `dst_root` and reads every output's embedded fingerprint.
    ///
    /// Tag reads are embarrassingly parallel (§4.3): dispatched across a
    /// small worker pool, but the sorted input order and a
    /// position-indexed results buffer guarantee the final maps are built
    /// deterministically regardless of completion order.
    #[tracing::instrument(skip_all, fields(root = %dst_root.display()))]
    pub fn build(dst_root: &Path) -> std::io::Result<Self> {
        let files = walk_sorted(dst_root, DEST_EXTENSIONS)?;
        let results = read_all_parallel(files);

        let mut index = DestinationIndex::default();
        for (rel_path, entry) in results {
            if let Some(fp) = &entry.fingerprint {
                index
                    .by_md5
                    .entry(fp.src_md5.clone())
                    .or_default()
                    .push(rel_path.clone());
            }
            index.by_rel.insert(rel_path, entry);
        }

        for paths in index.by_md5.values_mut() {
            paths.sort();
        }

        tracing::info!(count = index.by_rel.len(), "destination index complete");
        Ok(index)
    }
}

fn read_all_parallel(files: Vec<(PathBuf, String)>) -> Vec<(String, OutputEntry)> {
    let worker_count = num_cpus::get().min(8).max(1);
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, PathBuf, String)>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, String, OutputEntry)>();

    for (idx, (abs, rel)) in files.into_iter().enumerate() {
        job_tx.send((idx, abs, rel)).expect("channel open");
    }
    drop(job_tx);

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (idx, abs, rel) in job_rx {
                    let entry = read_one(&abs, &rel);
                    let _ = result_tx.send((idx, rel, entry));
                }
            });
        }
        drop(result_tx);

        let mut slots: Vec<Option<(String, OutputEntry)>> = Vec::new();
        for (idx, rel, entry) in result_rx {
            if slots.len() <= idx {
                slots.resize_with(idx + 1, || None);
            }
            slots[idx] = Some((rel, entry));
        }
        slots.into_iter().flatten().collect()
    })
}

fn read_one(abs_path: &Path, rel_path: &str) -> OutputEntry {
    let stat = std::fs::metadata(abs_path);
    let (size, mtime_ns) = match &stat {
        Ok(meta) => {
            let mtime_ns = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_nanos() as i128)
                .unwrap_or(0);
            (meta.len(), mtime_ns)
        }
        Err(_) => (0, 0),
    };

    let (fingerprint, index_error) = match read_fingerprint(abs_path) {
        Ok(fp) => (fp, false),
        Err(err) => {
            tracing::warn!(path = %abs_path.display(), error = %err, "destination file treated as legacy");
            (None, true)
        }
    };

    OutputEntry {
        rel_path: rel_path.to_string(),
        size,
        mtime_ns,
        fingerprint,
        index_error,
    }
}
