//! # xpress-config
//!
//! Layered configuration loading for XPress using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`XPRESS_*` prefix, `__` as separator)
//! 2. Project-level `.xpress/config.toml`
//! 3. User-level `~/.config/xpress/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `XPRESS_VALIDATION__DRAFT` -> `validation.draft`,
//! `XPRESS_GENERAL__LOG_FILTER` -> `general.log_filter`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use xpress_config::XpressConfig;
//!
//! let config = XpressConfig::load_with_dotenv().expect("config");
//! let options = config.validation.schema_options();
//! ```

mod error;
mod general;
mod validation;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use validation::ValidationConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct XpressConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl XpressConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".xpress/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("XPRESS_").split("__"))
    }

    /// Reject values that deserialize but cannot be used.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.general.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "general.log_filter".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xpress").join("config.toml"))
    }
}
