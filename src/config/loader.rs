//! Loader configuration structure

use crate::utils::error::{ResloadError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for extracting and loading bundled libraries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoaderConfig {
    /// Name prefix for the per-call temporary directory
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,
    /// Parent directory for temporary directories (None = OS temp dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,
    /// Remove extracted libraries when the process exits normally
    #[serde(default = "default_true")]
    pub cleanup_on_exit: bool,
    /// When the dynamic loader resolves undefined symbols
    #[serde(default)]
    pub binding: Binding,
    /// Whether loaded symbols are available to libraries loaded later
    #[serde(default)]
    pub visibility: Visibility,
}

/// Symbol binding mode passed to the dynamic loader
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    /// Resolve everything at load time (`RTLD_NOW`)
    #[default]
    Now,
    /// Resolve functions on first call (`RTLD_LAZY`)
    Lazy,
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Now => write!(f, "now"),
            Binding::Lazy => write!(f, "lazy"),
        }
    }
}

/// Symbol visibility passed to the dynamic loader
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// `RTLD_LOCAL`
    #[default]
    Local,
    /// `RTLD_GLOBAL`
    Global,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Local => write!(f, "local"),
            Visibility::Global => write!(f, "global"),
        }
    }
}

fn default_temp_prefix() -> String {
    "resload".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::sample()
    }
}

impl LoaderConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LoaderConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Sample configuration with every default spelled out
    pub fn sample() -> Self {
        Self {
            temp_prefix: default_temp_prefix(),
            temp_root: None,
            cleanup_on_exit: true,
            binding: Binding::Now,
            visibility: Visibility::Local,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.temp_prefix.is_empty() {
            return Err(ResloadError::ValidationError(
                "temp_prefix cannot be empty".to_string(),
            ));
        }
        if self.temp_prefix.contains('/') {
            return Err(ResloadError::ValidationError(format!(
                "temp_prefix cannot contain '/': {}",
                self.temp_prefix
            )));
        }

        if let Some(ref root) = self.temp_root {
            if !root.exists() {
                return Err(ResloadError::ConfigError(format!(
                    "temp_root does not exist: {}",
                    root.display()
                )));
            }
            if !root.is_dir() {
                return Err(ResloadError::ConfigError(format!(
                    "temp_root is not a directory: {}",
                    root.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: LoaderConfig = toml::from_str("").unwrap();
        assert_eq!(config, LoaderConfig::sample());
        assert!(config.cleanup_on_exit);
        assert_eq!(config.binding, Binding::Now);
        assert_eq!(config.visibility, Visibility::Local);
    }

    #[test]
    fn parses_lowercase_modes() {
        let config: LoaderConfig = toml::from_str(
            "temp_prefix = \"native\"\nbinding = \"lazy\"\nvisibility = \"global\"\ncleanup_on_exit = false\n",
        )
        .unwrap();
        assert_eq!(config.temp_prefix, "native");
        assert_eq!(config.binding, Binding::Lazy);
        assert_eq!(config.visibility, Visibility::Global);
        assert!(!config.cleanup_on_exit);
    }

    #[test]
    fn sample_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resload.toml");
        std::fs::write(&path, toml::to_string_pretty(&LoaderConfig::sample()).unwrap()).unwrap();
        assert_eq!(LoaderConfig::from_file(&path).unwrap(), LoaderConfig::sample());
    }

    #[test]
    fn rejects_bad_prefix() {
        let mut config = LoaderConfig::sample();
        config.temp_prefix = String::new();
        assert!(config.validate().is_err());
        config.temp_prefix = "a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_missing_temp_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LoaderConfig::sample();
        config.temp_root = Some(dir.path().join("missing"));
        assert!(matches!(config.validate(), Err(ResloadError::ConfigError(_))));
        config.temp_root = Some(dir.path().to_path_buf());
        assert!(config.validate().is_ok());
    }
}
