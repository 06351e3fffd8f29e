use super::types::*;
use crate::error_handling::types::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime parameters for the tap.
///
/// Every field has a default reproducing the behavior of the tool when no
/// configuration file is present, so a host can load the tap with zero
/// setup. A TOML file overrides individual sections:
///
/// ```toml
/// output_root = "C:\\taps"
///
/// [interest]
/// port_token = "COM"
/// device_prefix = '\\.\'
///
/// [modules]
/// tokens = ["tech2", "rs232", "serial"]
/// distinguished = "tech2.dll"
/// ```
///
/// # Fields Overview
///
/// - `interest`: which opened paths are tracked (see [`InterestConfig`])
/// - `modules`: which library loads are narrated and which module seeds
///   the caller-resolution fallback (see [`ModuleConfig`])
/// - `output_root`: directory under which `logs/` and `captured_data/`
///   are created; falls back to the system temp directory when the
///   preferred location cannot be created
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub interest: InterestConfig,
    pub modules: ModuleConfig,
    pub output_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interest: InterestConfig::default(),
            modules: ModuleConfig::default(),
            output_root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Config, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.interest.port_token.trim().is_empty() {
            return Err(ConfigError::EmptyPortToken(String::from(
                "interest.port_token must not be empty",
            )));
        }
        if self.modules.tokens.is_empty() {
            return Err(ConfigError::EmptyModuleTokens(String::from(
                "modules.tokens must list at least one token",
            )));
        }
        if let Some(bad) = self.modules.tokens.iter().find(|t| t.trim().is_empty()) {
            return Err(ConfigError::BadToken(format!(
                "empty module token: {:?}",
                bad
            )));
        }
        if self.modules.distinguished.trim().is_empty() {
            return Err(ConfigError::EmptyDistinguishedModule(String::from(
                "modules.distinguished must not be empty",
            )));
        }
        Ok(())
    }
}
