//! Error types for gcat configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A setting has a value outside its accepted range.
    #[error("invalid value for {key} in {path}: {reason}")]
    InvalidValue {
        /// Config file defining the value.
        path: PathBuf,
        /// Dotted setting name.
        key: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}
