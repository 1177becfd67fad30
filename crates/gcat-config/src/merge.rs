//! Configuration merging.
//!
//! Merges parsed `.gcat.toml` files into a single `Config`. Files are supplied in
//! precedence order and the first file defining a scalar wins.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, GalaxySettings, SearchSettings, Settings,
    parse::{RawConfig, RawGalaxySettings, RawSearchSettings, RawSettings},
    resolve::resolve_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files, highest precedence first.
///
/// The `catalog` path is resolved against the directory of the file that defines it,
/// so a global config can point at a shared catalog.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let mut settings = Settings::default();
    let mut search = SearchSettings::default();
    let mut galaxy = GalaxySettings::default();
    let mut catalog = None;

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(ref s) = raw.settings {
            apply_raw_settings(&mut settings, s);
            if let Some(ref path) = s.catalog {
                let base = parsed.path.parent().unwrap_or_else(|| Path::new("."));
                catalog = Some(resolve_path(path, base)?);
            }
        }
        if let Some(ref s) = raw.search {
            apply_raw_search(&mut search, s);
        }
        if let Some(ref g) = raw.galaxy {
            apply_raw_galaxy(&mut galaxy, g);
        }
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    Ok(Config {
        settings,
        search,
        galaxy,
        catalog,
        config_root,
        files: configs.iter().map(|c| c.path.clone()).collect(),
    })
}

/// Applies raw general settings.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(ref v) = raw.catalog {
        result.catalog = v.clone();
    }
    if let Some(v) = raw.default_limit {
        result.default_limit = v;
    }
}

/// Applies raw search settings.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.case_sensitive_topics {
        result.case_sensitive_topics = v;
    }
}

/// Applies raw Galaxy settings.
fn apply_raw_galaxy(result: &mut GalaxySettings, raw: &RawGalaxySettings) {
    if let Some(v) = raw.timeout_secs {
        result.timeout_secs = v;
    }
}
