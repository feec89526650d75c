use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Walks `root` depth-first, returning every regular file whose extension
/// (case-insensitive) is in `extensions`, paired with its path relative to
/// `root`. Hidden entries (dot-prefixed names) are skipped, as are any
/// entries not in `extensions`.
///
/// Directory order is deterministic: entries within a directory are
/// sorted by their raw byte representation before recursing, so the walk
/// order does not depend on the host filesystem's native ordering. Both
/// the source scanner and the destination index rely on this for
/// reproducible collision resolution and reporting.
pub fn walk_sorted(root: &Path, extensions: &[&str]) -> io::Result<Vec<(PathBuf, String)>> {
    let mut out = Vec::new();
    if root.is_dir() {
        walk_dir(root, root, extensions, &mut out)?;
    }
    Ok(out)
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    extensions: &[&str],
    out: &mut Vec<(PathBuf, String)>,
) -> io::Result<()> {
    let mut children: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    children.sort_by_key(|entry| entry.file_name());

    for entry in children {
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        if name_str.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk_dir(root, &path, extensions, out)?;
            continue;
        }

        if !file_type.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|wanted| ext.eq_ignore_ascii_case(wanted)))
            .unwrap_or(false);
        if !matches {
            continue;
        }

        let rel = path
            .strip_prefix(root)
            .expect("walked path is under root")
            .to_path_buf();
        let rel_str = to_forward_slash(&rel);
        out.push((path, rel_str));
    }

    Ok(())
}

/// Converts a relative path to a forward-slash separated string,
/// regardless of host platform separators.
pub fn to_forward_slash(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self as stdfs, File};

    #[test]
    fn walks_depth_first_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(dir.path().join("b")).unwrap();
        stdfs::create_dir_all(dir.path().join("a")).unwrap();
        File::create(dir.path().join("b/2.flac")).unwrap();
        File::create(dir.path().join("a/1.flac")).unwrap();
        File::create(dir.path().join("top.flac")).unwrap();
        File::create(dir.path().join(".hidden.flac")).unwrap();
        File::create(dir.path().join("ignore.txt")).unwrap();

        let found = walk_sorted(dir.path(), &["flac"]).unwrap();
        let rels: Vec<_> = found.iter().map(|(_, rel)| rel.clone()).collect();
        assert_eq!(rels, vec!["a/1.flac", "b/2.flac", "top.flac"]);
    }

    #[test]
    fn case_insensitive_extension_match() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("song.FLAC")).unwrap();
        let found = walk_sorted(dir.path(), &["flac"]).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn directory_name_prefix_of_sibling_file_stays_depth_first() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::create_dir_all(dir.path().join("Queen")).unwrap();
        File::create(dir.path().join("Queen/1.flac")).unwrap();
        File::create(dir.path().join("Queen - Singles.flac")).unwrap();

        let found = walk_sorted(dir.path(), &["flac"]).unwrap();
        let rels: Vec<_> = found.iter().map(|(_, rel)| rel.clone()).collect();
        assert_eq!(rels, vec!["Queen/1.flac", "Queen - Singles.flac"]);
    }

    #[test]
    fn empty_root_yields_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        let found = walk_sorted(dir.path(), &["flac"]).unwrap();
        assert!(found.is_empty());
    }
}
