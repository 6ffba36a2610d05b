use std::path::{Path, PathBuf};

use jm_core::MergerError;
use walkdir::{DirEntry, WalkDir};

use crate::map_cli_source_path;

pub(crate) fn resolve_source_dir(directory: &str) -> Result<PathBuf, MergerError> {
    let path = PathBuf::from(directory);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(MergerError::with_path(
            "CLI_SOURCE_NOT_FOUND",
            format!("directory does not exist: {}", absolute.display()),
            &absolute,
        ));
    }

    if !absolute.is_dir() {
        return Err(MergerError::with_path(
            "CLI_SOURCE_NOT_DIR",
            format!("not a directory: {}", absolute.display()),
            &absolute,
        ));
    }

    Ok(absolute)
}

/// Every regular file below `directory`, hidden entries excluded, in file-name order.
pub(crate) fn discover_files(directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
