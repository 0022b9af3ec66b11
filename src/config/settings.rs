//! TOML-based configuration for query generation.
//!
//! Example configuration:
//! ```toml
//! [generator]
//! inner_alias = "preaggregated"
//! pretty = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::dialect::helpers::is_plain_identifier;
use crate::sql::token::Layout;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Query generator configuration.
    pub generator: GeneratorSettings,
}

/// Query generator configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Alias of the pre-aggregating subquery in the outer query.
    pub inner_alias: String,

    /// Emit one clause per line (`true`) or the whole query on one line.
    pub pretty: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            inner_alias: "preaggregated".to_string(),
            pretty: true,
        }
    }
}

impl GeneratorSettings {
    pub fn layout(&self) -> Layout {
        if self.pretty {
            Layout::Pretty
        } else {
            Layout::Compact
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that would produce malformed queries.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let alias = &self.generator.inner_alias;
        if !is_plain_identifier(alias) {
            return Err(SettingsError::InvalidConfig(format!(
                "generator.inner_alias must be a plain identifier, got '{}'",
                alias
            )));
        }
        Ok(())
    }
}
