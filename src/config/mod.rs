//! Configuration module for propsheet-rs
//!
//! This module handles model configuration:
//! - Display settings (labels, separators, number formatting)
//! - Extra type tags registered as aliases of existing tags
//!
//! Aliases are validated when the factory is built, so a bad tag in the
//! configuration fails at startup instead of at the first property creation.
//!
//! # Config Location
//!
//! The default configuration file lives in the platform config directory:
//! - **Linux**: `~/.config/dev.hxyulin.propsheet-rs/propsheet.toml`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.propsheet-rs/propsheet.toml`
//! - **Windows**: `%APPDATA%\dev.hxyulin.propsheet-rs\propsheet.toml`
//!
//! # Example
//!
//! ```ignore
//! use propsheet_rs::config::ModelConfig;
//!
//! let config = ModelConfig::from_toml_str(r#"
//!     [display]
//!     true_label = "Yes"
//!     false_label = "No"
//!
//!     [type_aliases]
//!     percentage = "float"
//! "#)?;
//! let mut tree = config.build_tree()?;
//! let ratio = tree.create("percentage", "ratio");
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{PropsheetError, Result, ResultExt};
use crate::model::{PropertyError, PropertyFactory, PropertyTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.hxyulin.propsheet-rs";

/// Config filename
pub const CONFIG_FILE: &str = "propsheet.toml";

// ==================== Config Directory ====================

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Ensure the configuration directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().ok_or_else(|| {
        PropsheetError::Config("Could not determine config directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            PropsheetError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Model Config ====================

/// Configuration of a property model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Display text settings
    pub display: DisplaySettings,

    /// Extra type tags, each naming the tag it stands for
    pub type_aliases: BTreeMap<String, String>,
}

impl ModelConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str::<Self>(text).context("Failed to parse model config")
    }

    /// Serialize the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize model config")
    }

    /// Load a configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content)
    }

    /// Load the default configuration file, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load model config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the configuration to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PropsheetError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {:?}", path))
    }

    /// Save to the default location, returning the path written
    pub fn save_default(&self) -> Result<PathBuf> {
        let path = ensure_config_dir()?.join(CONFIG_FILE);
        self.save(&path)?;
        Ok(path)
    }

    /// Build a factory with the built-in types plus every configured alias.
    ///
    /// Aliases may point at other aliases regardless of their order in the
    /// file; an alias whose target never resolves is an error.
    pub fn build_factory(&self) -> Result<PropertyFactory> {
        let mut factory = PropertyFactory::new();
        let mut pending: Vec<(&String, &String)> = self.type_aliases.iter().collect();

        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|(alias, target)| {
                if factory.contains(target) {
                    factory
                        .register_alias(alias.as_str(), target.as_str())
                        .is_err()
                } else {
                    true
                }
            });
            if pending.len() == before {
                let (alias, target) = pending[0];
                let err = PropsheetError::from(PropertyError::DanglingAlias {
                    alias: alias.clone(),
                    target: target.clone(),
                });
                return Err(err.with_context("Invalid type alias in model config"));
            }
        }

        factory.validate()?;
        Ok(factory)
    }

    /// Build an empty tree using this configuration
    pub fn build_tree(&self) -> Result<PropertyTree> {
        let factory = self.build_factory()?;
        Ok(PropertyTree::with_factory(factory).with_settings(self.display.clone()))
    }
}
