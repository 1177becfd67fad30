//! Configuration file parsing.
//!
//! Parses individual `.gcat.toml` files into `RawConfig` structures whose fields are
//! all optional, so partial files can be merged.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here and ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
    /// Galaxy client settings section.
    pub galaxy: Option<RawGalaxySettings>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    /// Catalog file location.
    pub catalog: Option<String>,
    /// Maximum results printed by `gcat search`.
    pub default_limit: Option<usize>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSearchSettings {
    /// Whether `topic:` values must match labels including case.
    pub case_sensitive_topics: Option<bool>,
}

/// Raw Galaxy client settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawGalaxySettings {
    /// HTTP request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string. `path` is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    let config: RawConfig =
        toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;

    if config.galaxy.as_ref().and_then(|g| g.timeout_secs) == Some(0) {
        return Err(ConfigError::InvalidValue {
            path: path.to_path_buf(),
            key: "galaxy.timeout_secs",
            reason: "must be greater than zero",
        });
    }
    if config.settings.as_ref().and_then(|s| s.catalog.as_deref()) == Some("") {
        return Err(ConfigError::InvalidValue {
            path: path.to_path_buf(),
            key: "settings.catalog",
            reason: "must not be empty",
        });
    }

    Ok(config)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
