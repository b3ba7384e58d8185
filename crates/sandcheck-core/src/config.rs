use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Installer configuration, loaded from a TOML file. Every field has a
/// default so a missing config file is never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InstallerConfig {
    /// Program invoked as the delegated installer.
    #[serde(default = "default_npm_program")]
    pub npm_program: String,
    /// Kill the delegated installer after this many seconds. Absent means
    /// wait indefinitely.
    #[serde(default)]
    pub install_timeout_secs: Option<u64>,
    /// Default sandbox root when the caller does not pass one.
    #[serde(default)]
    pub sandbox_root: Option<PathBuf>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            npm_program: default_npm_program(),
            install_timeout_secs: None,
            sandbox_root: None,
        }
    }
}

impl InstallerConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(input).context("failed to parse sandcheck config")?;
        if config.npm_program.trim().is_empty() {
            return Err(anyhow!("npm_program must not be empty"));
        }
        if config.install_timeout_secs == Some(0) {
            return Err(anyhow!("install_timeout_secs must be at least 1"));
        }
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid config: {}", path.display()))
    }
}

fn default_npm_program() -> String {
    "npm".to_string()
}
