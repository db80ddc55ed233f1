//! Shared helpers for integration tests

#![allow(dead_code)]

use bootconf::infrastructure::config::OPTION_ENV_KEYS;
use bootconf::OptionOverrides;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Variables that would overlay the keys used in these tests
pub const OVERLAY_KEYS: [&str; 9] = [
    "PORT", "NAME", "RATIO", "DEBUG", "ORIGIN", "DB_HOST", "DB_PORT", "FEATURES", "REGION",
];

/// Run `f` with every variable a bootstrap reads unset
pub fn isolated<R>(f: impl FnOnce() -> R) -> R {
    let keys: Vec<&str> = OPTION_ENV_KEYS
        .iter()
        .chain(OVERLAY_KEYS.iter())
        .copied()
        .collect();
    temp_env::with_vars_unset(keys, f)
}

/// Scratch directory holding one config file
pub fn config_dir(file_name: &str, content: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_file(dir.path(), file_name, content);
    dir
}

pub fn write_file(dir: &Path, file_name: &str, content: &str) {
    fs::write(dir.join(file_name), content).expect("Failed to write test file");
}

/// Overrides that search only `dir` and read `.env` from it
pub fn overrides_for(dir: &TempDir) -> OptionOverrides {
    OptionOverrides::new()
        .with_search_dirs([dir.path()])
        .with_env_file(dir.path().join(".env"))
}
