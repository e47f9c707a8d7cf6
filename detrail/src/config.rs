use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::{CONFIG_FILENAME, PYPROJECT_FILENAME};

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for detrail.
    pub detrail: DetrailConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for detrail.
pub struct DetrailConfig {
    /// Whether to rewrite test files found during traversal.
    pub include_tests: Option<bool>,
    /// List of folders to exclude.
    pub exclude_folders: Option<Vec<String>>,
    /// List of folders to force-include.
    pub include_folders: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
struct PyProject {
    tool: ToolConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct ToolConfig {
    detrail: DetrailConfig,
}

impl Config {
    /// Loads configuration from default locations (`.detrail.toml` or
    /// `pyproject.toml` in the current directory or above).
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            // 1. Try CONFIG_FILENAME
            let detrail_toml = current.join(CONFIG_FILENAME);
            if detrail_toml.exists() {
                if let Ok(content) = fs::read_to_string(&detrail_toml) {
                    if let Ok(mut config) = toml::from_str::<Config>(&content) {
                        config.config_file_path = Some(detrail_toml);
                        return config;
                    }
                }
            }

            // 2. Try PYPROJECT_FILENAME
            let pyproject_toml = current.join(PYPROJECT_FILENAME);
            if pyproject_toml.exists() {
                if let Ok(content) = fs::read_to_string(&pyproject_toml) {
                    if let Ok(pyproject) = toml::from_str::<PyProject>(&content) {
                        return Config {
                            detrail: pyproject.tool.detrail,
                            config_file_path: Some(pyproject_toml),
                        };
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }
}
