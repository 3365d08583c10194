//! Scaffolding configuration (`elements.yaml`).
//!
//! The file is optional and lives in the module directory. Environment
//! variables override it: `ELEMENTS_AUX_PATH` entries are searched before
//! the configured `aux_path`, and `USER` supplies the author when none is set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CmakeError, Result};

pub const CONFIG_FILENAME: &str = "elements.yaml";
pub const AUX_PATH_VAR: &str = "ELEMENTS_AUX_PATH";
pub const USER_VAR: &str = "USER";

/// Scaffolding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories searched for `ElementsKernel/templates/<file>`.
    pub aux_path: Vec<PathBuf>,

    /// Author written into generated files.
    pub author: Option<String>,

    /// Copy CMakeLists.txt to CMakeLists.txt~ before rewriting it.
    #[serde(default = "default_backup")]
    pub backup: bool,

    /// `TYPE` of generated unit tests.
    #[serde(default = "default_test_framework")]
    pub test_framework: String,
}

fn default_backup() -> bool {
    true
}

fn default_test_framework() -> String {
    "Boost".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aux_path: vec![],
            author: None,
            backup: default_backup(),
            test_framework: default_test_framework(),
        }
    }
}

impl Config {
    /// Load config from an elements.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CmakeError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse config from YAML string. An empty file is the default config.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| CmakeError::Config {
            message: format!("Invalid {}: {}", CONFIG_FILENAME, e),
            help: Some("Check elements.yaml syntax".to_string()),
        })
    }

    /// Config for a module directory: its elements.yaml if present, with the
    /// process environment applied.
    pub fn discover(module_dir: &Path) -> Result<Self> {
        let path = module_dir.join(CONFIG_FILENAME);
        let mut config = if path.is_file() {
            Self::load(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()));
        Ok(config)
    }

    /// Apply environment overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(aux) = lookup(AUX_PATH_VAR) {
            let mut dirs: Vec<PathBuf> = std::env::split_paths(&aux)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            dirs.append(&mut self.aux_path);
            self.aux_path = dirs;
        }
        if self.author.is_none() {
            self.author = lookup(USER_VAR).filter(|u| !u.is_empty());
        }
    }

    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }
}
