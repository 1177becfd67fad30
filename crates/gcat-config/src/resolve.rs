//! Path resolution for configured file locations.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured path to an absolute path.
///
/// - `~` and `~/…` expand to the home directory
/// - relative paths are joined onto `base`
/// - absolute paths are returned unchanged
///
/// The path does not need to exist.
pub fn resolve_path(path: &str, base: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(base.join(expanded))
    }
}

/// Expands a tilde prefix to the home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }
    Ok(PathBuf::from(path))
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}
