//! Error types for the gcat-catalog crate.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::InstanceId;

/// Errors that can occur when loading, saving, or updating the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read or write the catalog file.
    #[error("I/O error on catalog {path}: {source}")]
    Io {
        /// Path to the catalog file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The catalog file exists but is not a valid catalog.
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        /// Path to the catalog file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize the catalog.
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Referenced an instance that is not registered.
    #[error("unknown instance id: {0}")]
    UnknownInstance(InstanceId),
}
