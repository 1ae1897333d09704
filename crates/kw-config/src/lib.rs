//! Layered configuration loading for the chunking pipeline, using figment.
//!
//! Configuration sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. User-level `~/.config/kiriwake/config.toml`
//! 3. Project-level `./.kiriwake/config.toml`
//! 4. Environment variables (`KW_*`, nested fields via `KW_SECTION__FIELD`)

pub mod error;
pub mod runtime;

use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub use error::ConfigError;
pub use runtime::RuntimeConfig;

pub use kw_core::{BuilderConfig, DocumentStructureConfig};
pub use kw_detect::DetectorConfig;
pub use kw_embed::EmbedConfig;
pub use kw_llm::{FailoverConfig, LlmConfig};

const ENV_PREFIX: &str = "KW_";

/// The full process configuration, aggregating every stage's section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub document_structure: DocumentStructureConfig,

    #[serde(default)]
    pub builder: BuilderConfig,

    #[serde(default)]
    pub embed: EmbedConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub failover: FailoverConfig,

    #[serde(default)]
    pub detect: DetectorConfig,
}

impl RunConfig {
    /// Load configuration from defaults, user/project TOML files, and the
    /// process environment (`KW_*`, nested fields via `KW_SECTION__FIELD`),
    /// validating the merged result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a TOML file is malformed or a
    /// field fails to deserialize, or [`ConfigError::InvalidValue`] if the
    /// merged configuration violates a cross-field invariant.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(user_path) = user_config_path()
            && user_path.exists()
        {
            figment = figment.merge(Toml::file(user_path));
        }

        let project_path = project_config_path();
        if project_path.exists() {
            figment = figment.merge(Toml::file(project_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-section invariants that can only be checked once every layer
    /// has merged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.builder
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "builder".to_string(),
                reason,
            })?;
        self.detect
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "detect".to_string(),
                reason,
            })?;
        Ok(())
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kiriwake").join("config.toml"))
}

fn project_config_path() -> PathBuf {
    PathBuf::from(".kiriwake").join("config.toml")
}
