//! Integration tests for gcat-config: discovery, parsing, and merging from disk.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use gcat_config::{CONFIG_FILENAME, Config, ConfigError, is_global_config};

/// Temporary directory tree for tests.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    fn create_config(&self, rel_dir: &str, content: &str) -> PathBuf {
        let path = self.create_dir(rel_dir).join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn load_root_config_ignores_everything_above() {
    let env = TestEnv::new();
    env.create_config("", "[settings]\ndefault_limit = 1\n");
    env.create_config(
        "project",
        "root = true\n[settings]\ncatalog = \"data/catalog.json\"\n",
    );
    let cwd = env.create_dir("project/src");

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.settings.default_limit, 50);
    assert_eq!(config.files.len(), 1);
    assert_eq!(config.config_root, Some(env.path().join("project")));
    assert_eq!(
        config.catalog_path(&cwd).unwrap(),
        env.path().join("project/data/catalog.json")
    );
}

#[test]
fn load_merges_nested_configs() {
    let env = TestEnv::new();
    env.create_config(
        "",
        "root = true\n[settings]\ndefault_limit = 10\n[galaxy]\ntimeout_secs = 5\n",
    );
    env.create_config("team", "[settings]\ndefault_limit = 20\n");
    let cwd = env.create_dir("team/work");

    let config = Config::load(&cwd).unwrap();
    let local: Vec<_> = config.files.iter().filter(|p| !is_global_config(p)).collect();
    assert_eq!(local.len(), 2);
    assert_eq!(config.settings.default_limit, 20);
    assert_eq!(config.galaxy.timeout_secs, 5);
    assert_eq!(
        config.catalog_path(&cwd).unwrap(),
        env.path().join("team/.gcat/catalog.json")
    );
}

#[test]
fn load_reports_malformed_file() {
    let env = TestEnv::new();
    let path = env.create_config("", "root = true\n[settings\n");

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}
