//! Sorted directory traversal helpers

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::DatasetError;

/// Every directory under `root`, `root` included, in sorted walk order
pub fn directories(root: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Every regular file below `root`, in sorted walk order
pub fn files_under(root: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Names of the regular files directly inside `dir`, sorted
pub fn list_files(dir: &Path) -> Result<Vec<String>, DatasetError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))? {
        let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| DatasetError::io(entry.path(), e))?;
        if file_type.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Directories under `root` (inclusive) that directly contain files,
/// paired with those file names
pub fn dirs_with_files(root: &Path) -> Result<Vec<(PathBuf, Vec<String>)>, DatasetError> {
    let mut found = Vec::new();
    for dir in directories(root)? {
        let files = list_files(&dir)?;
        if !files.is_empty() {
            found.push((dir, files));
        }
    }
    Ok(found)
}

/// Directories under `root` (inclusive) with no subdirectories
pub fn leaf_dirs(root: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let mut leaves = Vec::new();
    for dir in directories(root)? {
        if child_dirs(&dir)?.is_empty() {
            leaves.push(dir);
        }
    }
    Ok(leaves)
}

/// Names of the directories directly inside `dir`
pub fn child_dirs(dir: &Path) -> Result<Vec<String>, DatasetError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))? {
        let entry = entry.map_err(|e| DatasetError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| DatasetError::io(entry.path(), e))?;
        if file_type.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_leaf_dirs_and_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("a/sitting/s1/1.jpg"));
        touch(&root.join("a/sitting/s2/2.jpg"));
        touch(&root.join("a/top.txt"));
        fs::create_dir_all(root.join("b/empty")).unwrap();

        let leaves = leaf_dirs(root).unwrap();
        assert_eq!(
            leaves,
            vec![
                root.join("a/sitting/s1"),
                root.join("a/sitting/s2"),
                root.join("b/empty"),
            ]
        );

        let with_files: Vec<_> = dirs_with_files(root)
            .unwrap()
            .into_iter()
            .map(|(dir, _)| dir)
            .collect();
        assert_eq!(
            with_files,
            vec![root.join("a"), root.join("a/sitting/s1"), root.join("a/sitting/s2")]
        );

        assert_eq!(files_under(&root.join("a/sitting")).unwrap().len(), 2);
        assert_eq!(child_dirs(&root.join("a")).unwrap(), vec!["sitting"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            directories(&tmp.path().join("missing")),
            Err(DatasetError::Walk(_))
        ));
    }
}
