//! Configuration system for gcat.
//!
//! gcat reads TOML files named `.gcat.toml`, discovered by walking up the directory
//! tree from the current working directory, then `~/.gcat.toml` with lowest
//! precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawGalaxySettings, RawSearchSettings, RawSettings, parse_config_file,
    parse_config_str,
};
pub use resolve::resolve_path;
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
use toml::ser;

/// Merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Search settings.
    pub search: SearchSettings,
    /// Galaxy client settings.
    pub galaxy: GalaxySettings,
    /// Catalog path resolved against the file that set it, if any file did.
    pub catalog: Option<PathBuf>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
    /// Config files that were merged, highest precedence first.
    pub files: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging `.gcat.toml` files from `cwd`.
    ///
    /// Returns `Config::default()` if no files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&discover_config_files(cwd))
    }

    /// Loads configuration from specific files, highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Returns the catalog file location.
    ///
    /// Uses the configured path if one was set, otherwise the default path under the
    /// config root, or under `cwd` when no config file was found.
    pub fn catalog_path(&self, cwd: &Path) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.catalog {
            return Ok(path.clone());
        }
        let base = self.config_root.as_deref().unwrap_or(cwd);
        resolve_path(&self.settings.catalog, base)
    }

    /// Serializes the effective settings in `.gcat.toml` format.
    pub fn settings_to_toml(&self) -> Result<String, ser::Error> {
        toml::to_string_pretty(&SerializableSettings {
            settings: &self.settings,
            search: &self.search,
            galaxy: &self.galaxy,
        })
    }
}

/// General settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog file location as written in config.
    pub catalog: String,
    /// Maximum results printed by `gcat search`.
    pub default_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: String::from(".gcat/catalog.json"),
            default_limit: 50,
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Whether `topic:` values must match labels including case.
    pub case_sensitive_topics: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            case_sensitive_topics: true,
        }
    }
}

/// Galaxy client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GalaxySettings {
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GalaxySettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// Borrowed view of the settings sections for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// General settings.
    settings: &'a Settings,
    /// Search settings.
    search: &'a SearchSettings,
    /// Galaxy client settings.
    galaxy: &'a GalaxySettings,
}
