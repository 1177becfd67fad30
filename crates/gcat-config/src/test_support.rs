//! Test helpers shared across gcat-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// Temporary directory utility for tests.
pub struct TestDir {
    /// Owned temp directory, removed on drop.
    root: TempDir,
}

impl TestDir {
    /// Creates a new temporary directory tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Returns the path to the root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory relative to the root.
    pub fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a `.gcat.toml` into the directory at `rel_path`.
    pub fn create_config(&self, rel_path: &str, content: &str) -> PathBuf {
        let config = self.create_dir(rel_path).join(CONFIG_FILENAME);
        fs::write(&config, content).unwrap();
        config
    }
}
