//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use gcat_catalog::{Catalog, EvaluateOptions};
use gcat_config::Config;

use crate::galaxy::GalaxyClient;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files were found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used by `init`, which must work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Returns the catalog file location.
    pub fn catalog_path(&self) -> Result<PathBuf, ExitCode> {
        self.config.catalog_path(&self.cwd).map_err(|e| {
            eprintln!("error: could not resolve catalog path: {e}");
            ExitCode::FAILURE
        })
    }

    /// Loads the catalog, or an empty one if the file doesn't exist yet.
    pub fn load_catalog(&self) -> Result<Catalog, ExitCode> {
        let path = self.catalog_path()?;
        Catalog::load(&path).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Writes the catalog back to its file.
    pub fn save_catalog(&self, catalog: &Catalog) -> Result<(), ExitCode> {
        let path = self.catalog_path()?;
        catalog.save(&path).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Search options derived from configuration.
    pub fn evaluate_options(&self) -> EvaluateOptions {
        EvaluateOptions {
            case_sensitive_topics: self.config.search.case_sensitive_topics,
        }
    }

    /// Builds a Galaxy client using the configured timeout.
    pub fn galaxy_client(&self) -> Result<GalaxyClient, ExitCode> {
        GalaxyClient::new(Duration::from_secs(self.config.galaxy.timeout_secs)).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
