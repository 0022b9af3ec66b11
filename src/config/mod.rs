//! Configuration module.
//!
//! Handles generator settings loaded from TOML.

mod settings;

pub use settings::{GeneratorSettings, Settings, SettingsError};
