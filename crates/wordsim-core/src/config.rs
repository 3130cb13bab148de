use crate::error::Error;
use config::{Config, ConfigError, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub root_paths: Vec<String>,
    /// Literal file-name suffix; empty accepts every file.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default = "default_threads")]
    pub directory_threads: usize,
    #[serde(default = "default_threads")]
    pub file_threads: usize,
    #[serde(default = "default_threads")]
    pub analysis_threads: usize,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_suffix() -> String {
    ".txt".to_string()
}

fn default_threads() -> usize {
    1
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_paths: Vec::new(),
            suffix: default_suffix(),
            directory_threads: default_threads(),
            file_threads: default_threads(),
            analysis_threads: default_threads(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Every pool needs at least one worker.
    pub fn validate(&self) -> Result<(), Error> {
        let pools = [
            ("directory", self.directory_threads),
            ("file", self.file_threads),
            ("analysis", self.analysis_threads),
        ];
        for (pool, threads) in pools {
            if threads == 0 {
                return Err(Error::InvalidThreadCount { pool });
            }
        }
        Ok(())
    }
}

/// Read `Config.toml` from the working directory if there is one. Missing
/// keys fall back to their defaults.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Drop roots that repeat or sit inside another root, keeping first-seen
/// order. Containment is decided on canonical paths, so `a/../b` is not inside
/// `a`; a root that cannot be canonicalized is compared as written.
pub fn non_overlapping_paths(paths: Vec<String>) -> Vec<String> {
    let mut result: Vec<(PathBuf, String)> = Vec::new();

    for path in paths {
        let key = fs::canonicalize(&path).unwrap_or_else(|_| PathBuf::from(&path));
        if result.iter().any(|(kept, _)| key.starts_with(kept)) {
            continue;
        }
        result.retain(|(kept, _)| !kept.starts_with(&key));
        result.push((key, path));
    }

    result.into_iter().map(|(_, path)| path).collect()
}
