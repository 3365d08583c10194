//! Directory scanning for CMakeLists.txt files.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{CmakeError, Result};
use crate::scaffold::CMAKE_LISTS_FILE;

/// Build output directories never hold sources.
const SKIPPED_DIRS: &[&str] = &["build", "InstallArea"];

pub fn is_cmake_lists(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(CMAKE_LISTS_FILE)
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|skip| name.starts_with(skip))
}

/// Every CMakeLists.txt below `root`, sorted by path.
pub fn scan_directory(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_cmake_lists(e.path()))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

/// Expand files and directories into the CMakeLists.txt files they name.
///
/// A file argument is taken as given, whatever its name.
pub fn find_cmake_lists(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(scan_directory(path));
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(CmakeError::Io {
                path: path.clone(),
                message: "No such file or directory".to_string(),
            });
        }
    }
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_directory() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "CMakeLists.txt");
        touch(dir.path(), "ModA/CMakeLists.txt");
        touch(dir.path(), "ModB/CMakeLists.txt");
        touch(dir.path(), "ModB/doc/notes.txt");
        touch(dir.path(), ".git/CMakeLists.txt");
        touch(dir.path(), "build.x86_64/CMakeLists.txt");
        touch(dir.path(), "InstallArea/CMakeLists.txt");

        let found = scan_directory(dir.path());

        assert_eq!(
            found,
            vec![
                dir.path().join("CMakeLists.txt"),
                dir.path().join("ModA/CMakeLists.txt"),
                dir.path().join("ModB/CMakeLists.txt"),
            ]
        );
    }

    #[test]
    fn test_find_cmake_lists_keeps_explicit_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "custom.cmake");

        let found = find_cmake_lists(&[dir.path().join("custom.cmake")]).unwrap();

        assert_eq!(found, vec![dir.path().join("custom.cmake")]);
    }

    #[test]
    fn test_find_cmake_lists_missing_path() {
        let err = find_cmake_lists(&[PathBuf::from("/nonexistent/elements")]).unwrap_err();
        assert!(matches!(err, CmakeError::Io { .. }));
    }
}
