//! Source directory enumeration.
//!
//! Lists the files directly inside a source directory whose extension is in
//! the configured set. Subdirectories are not entered, so the default `New/`
//! target directory under the source is never picked up as input.
//!
//! The result is sorted by path and free of duplicates, which keeps batch
//! output and reports stable between runs.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot read source directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Conditionable images directly inside `dir`, sorted by path.
///
/// `extensions` are compared case-insensitively and may carry a leading dot.
pub fn scan_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotFound(dir.to_path_buf()));
    }
    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .collect();

    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), &wanted) {
            continue;
        }
        images.push(entry.into_path());
    }
    images.sort();
    images.dedup();
    Ok(images)
}

fn has_extension(path: &Path, wanted: &[String]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| wanted.contains(&ext))
}

/// Append `path` unless it is already listed.
pub fn add_image(list: &mut Vec<PathBuf>, path: PathBuf) {
    if !list.contains(&path) {
        list.push(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn filters_by_extension_and_sorts() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.png", "a.jpg", "b.txt", "d.gif", "notes.md"] {
            touch(tmp.path(), name);
        }

        let found = scan_images(tmp.path(), &exts(&["png", "jpg", "gif"])).unwrap();
        assert_eq!(names(&found), vec!["a.jpg", "c.png", "d.gif"]);
    }

    #[test]
    fn extension_match_ignores_case_and_leading_dot() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "SHOT.PNG");
        touch(tmp.path(), "other.Bmp");

        let found = scan_images(tmp.path(), &exts(&[".png", "BMP"])).unwrap();
        assert_eq!(names(&found), vec!["SHOT.PNG", "other.Bmp"]);
    }

    #[test]
    fn subdirectories_are_not_entered() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "top.png");
        let nested = tmp.path().join("New");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "top.png");
        fs::create_dir(tmp.path().join("dir.png")).unwrap();

        let found = scan_images(tmp.path(), &exts(&["png"])).unwrap();
        assert_eq!(found, vec![tmp.path().join("top.png")]);
    }

    #[test]
    fn files_without_extension_are_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "png");
        assert!(scan_images(tmp.path(), &exts(&["png"])).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            scan_images(&tmp.path().join("ghost"), &exts(&["png"])),
            Err(ScanError::NotFound(_))
        ));
    }

    #[test]
    fn add_image_skips_duplicates() {
        let mut list = vec![PathBuf::from("a.png")];
        add_image(&mut list, PathBuf::from("b.png"));
        add_image(&mut list, PathBuf::from("a.png"));
        assert_eq!(list, vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);
    }
}
