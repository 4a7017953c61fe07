use crate::error::{MatterDexError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default document extensions
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Expand files and directories into a sorted list of document files
///
/// Files named explicitly are kept whatever their extension; directories are
/// walked recursively and filtered by `extensions`.
pub fn resolve_files(paths: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let walker = WalkDir::new(path).sort_by_file_name();
            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                    files.push(entry.path().to_owned());
                }
            }
        } else {
            log::warn!("{}: no such file or directory, skipped", path.display());
        }
    }
    files
}

pub fn read_to_string(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(MatterDexError::file_not_found(path));
    }
    fs::read_to_string(path).map_err(MatterDexError::Io)
}
