//! Source font discovery.

use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

use glob::{MatchOptions, Pattern};
use log::{debug, info, warn};

use crate::{Error, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Find the regular files directly inside `dir` whose extension matches
/// `extension`, ignoring case. Subdirectories are not searched.
///
/// The extension may be given with or without its leading dot. The result
/// is sorted by path, and is empty (not an error) when nothing matches.
pub fn discover_fonts(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound { path: dir.to_path_buf() });
    }

    let extension = extension.trim_start_matches('.');
    let pattern = Pattern::new(&format!("*.{}", Pattern::escape(extension)))?;

    let entries =
        read_dir(dir).map_err(|source| Error::ReadDir { path: dir.to_path_buf(), source })?;

    let mut fonts: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| pattern.matches_with(&name.to_string_lossy(), MATCH_OPTIONS))
        })
        .collect();
    fonts.sort();

    for path in &fonts {
        debug!("Discovered {}", path.display());
    }
    info!("Found {} .{extension} files in {}", fonts.len(), dir.display());
    Ok(fonts)
}
