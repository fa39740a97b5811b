//! Target path resolution.
//!
//! A conditioned image is written next to its source or into a separate
//! target directory:
//!
//! - `photos/a.png` into `photos/` → `photos/a.new.png` (suffix before the extension)
//! - `photos/a.png` into `photos/New/` → `photos/New/a.png`
//!
//! Directory equality is case-insensitive, so `Photos/` and `photos/` count as
//! the same directory. When a profile picks an explicit output format the
//! extension is replaced by that format's canonical one.

use crate::imaging::TargetFormat;
use std::path::{Component, Path, PathBuf};

/// Whether `source` lives directly inside `dir` (case-insensitive).
pub fn is_same_directory(source: &Path, dir: &Path) -> bool {
    let parent = source.parent().unwrap_or(Path::new(""));
    normalized(parent) == normalized(dir)
}

fn normalized(path: &Path) -> Vec<String> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().to_lowercase())
        .collect()
}

/// Where the conditioned copy of `source` goes, before any format change.
///
/// Returns `None` when `source` has no file name.
pub fn target_path(source: &Path, target_dir: &Path, same_dir_suffix: &str) -> Option<PathBuf> {
    let file_name = source.file_name()?;
    if !is_same_directory(source, target_dir) {
        return Some(target_dir.join(file_name));
    }
    let extension = match source.extension() {
        Some(ext) => format!("{same_dir_suffix}.{}", ext.to_string_lossy()),
        None => same_dir_suffix.to_string(),
    };
    Some(source.with_extension(extension))
}

/// Replace the extension with the canonical one for `format`.
pub fn with_format_extension(path: &Path, format: TargetFormat) -> PathBuf {
    path.with_extension(format.extension())
}

/// Output format for a profile that left the choice open.
pub fn infer_format(source: &Path) -> TargetFormat {
    let extension = source
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    TargetFormat::infer_from_extension(&extension)
}
