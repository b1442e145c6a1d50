//! Directory layout for downloaded courses.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_path_component;

/// Application configuration directory (credentials cache lives here).
/// Created on first use.
pub fn config_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "hotmart-downloader")
        .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;

    let dir = dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Derive and create a subdirectory for a catalog item (course, module or
/// page) under `parent`. Failure to create the directory is fatal for the
/// whole run, so the error propagates.
pub fn item_dir(parent: &Path, name: &str) -> Result<PathBuf> {
    let dir = parent.join(sanitize_path_component(name)?);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_dir_creates_nested_layout() {
        let root = tempfile::tempdir().unwrap();

        let course = item_dir(root.path(), "My Course").unwrap();
        let module = item_dir(&course, "Module 1: Basics").unwrap();
        let page = item_dir(&module, "Lesson?").unwrap();

        assert!(page.is_dir());
        assert!(page.ends_with("My_Course/Module_1__Basics/Lesson_"));
    }

    #[test]
    fn test_item_dir_rejects_traversal() {
        let root = tempfile::tempdir().unwrap();
        assert!(item_dir(root.path(), "../outside").is_err());
    }
}
