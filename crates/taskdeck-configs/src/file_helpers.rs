//! Filesystem path helpers used while finalizing configuration.

use std::path::{Path, PathBuf};

/// Resolve a directory path against the current working directory.
///
/// Relative paths stay relative in meaning; they are only made absolute so
/// later log lines and error messages show where files actually go. Trailing
/// separators are dropped.
pub fn normalize_dir_path(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    let trimmed = if trimmed.is_empty() { "." } else { trimmed };
    let candidate = Path::new(trimmed);

    let absolute: PathBuf = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(candidate),
            Err(_) => candidate.to_path_buf(),
        }
    };

    absolute.to_string_lossy().into_owned()
}
