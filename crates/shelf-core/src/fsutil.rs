//! Small filesystem helpers shared by the engines

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Recursively copy a directory tree, creating `dest` as needed
///
/// Follows symlinks on the source side: copying a linked skill materializes
/// real files at the destination.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).with_context(|| format!("Failed to create {:?}", dest))?;

    let entries = fs::read_dir(src).with_context(|| format!("Failed to list {:?}", src))?;
    for entry in entries {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)
                .with_context(|| format!("Failed to copy {:?} to {:?}", src_path, dest_path))?;
        }
    }
    Ok(())
}

/// Remove a filesystem entry of any shape: file, directory tree, or symlink
///
/// A symlink is removed as a link, never followed into its target. Missing
/// entries are not an error.
pub fn remove_entry(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(_) => return Ok(()),
    };

    if meta.file_type().is_symlink() || meta.is_file() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))?;
    } else {
        fs::remove_dir_all(path).with_context(|| format!("Failed to remove {:?}", path))?;
    }
    Ok(())
}

/// Whether two paths resolve to the same filesystem entry
pub fn same_entry(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_copy_dir_recursive_copies_nested_tree() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("inner/b.txt"), "b").unwrap();

        let dest = temp.path().join("dest");
        copy_dir_recursive(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dest.join("inner/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_remove_entry_handles_all_shapes() {
        let temp = tempdir().unwrap();

        let file = temp.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        remove_entry(&file).unwrap();
        assert!(!file.exists());

        let dir = temp.path().join("d");
        fs::create_dir_all(dir.join("nested")).unwrap();
        remove_entry(&dir).unwrap();
        assert!(!dir.exists());

        // Missing entries are fine
        remove_entry(&temp.path().join("gone")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_entry_unlinks_without_touching_target() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("target");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), "keep").unwrap();

        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        remove_entry(&link).unwrap();
        assert!(!link.exists());
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn test_same_entry() {
        let temp = tempdir().unwrap();
        assert!(same_entry(temp.path(), temp.path()));
        assert!(!same_entry(temp.path(), &temp.path().join("other")));
    }
}
