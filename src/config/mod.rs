//! Configuration management for solrq
//!
//! Loads the assembler settings (rendering policy and boost table) from TOML,
//! applies profile and environment overrides, and validates the result.

use crate::assembler::{QueryAssembler, RenderPolicy};
use crate::error::{Result, SolrqError};
use crate::query::{Boost, BoostTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod validator;

pub use validator::ConfigValidator;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    #[serde(default)]
    pub render: RenderConfig,
    /// Weighted full-text boosts, in `qf` order
    #[serde(default = "default_boosts", rename = "boost")]
    pub boosts: Vec<Boost>,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn default_boosts() -> Vec<Boost> {
    BoostTable::default().iter().cloned().collect()
}

/// Rendering configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Fail the build on an unclassifiable value instead of dropping the field
    #[serde(default)]
    pub strict: bool,
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(rename = "boost", skip_serializing_if = "Option::is_none")]
    pub boosts: Option<Vec<Boost>>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SolrqError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SolrqError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| SolrqError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| SolrqError::ProfileNotFound {
                name: profile.to_string(),
            })?;

        if let Some(strict) = overrides.strict {
            self.render.strict = strict;
        }
        if let Some(boosts) = overrides.boosts {
            self.boosts = boosts;
        }

        tracing::debug!("Applied profile {}", profile);
        ConfigValidator::validate(self)
    }

    /// Apply environment variable overrides
    /// Environment variables in format: SOLRQ_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("SOLRQ_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "RENDER__STRICT" => {
                self.render.strict = value.parse().map_err(|_| SolrqError::InvalidConfigValue {
                    path: path.to_string(),
                    message: format!("Cannot parse '{}' as boolean", value),
                })?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    pub fn render_policy(&self) -> RenderPolicy {
        if self.render.strict {
            RenderPolicy::Strict
        } else {
            RenderPolicy::Lenient
        }
    }

    /// Build a query assembler from this configuration
    pub fn assembler(&self) -> QueryAssembler {
        let boosts = Arc::new(BoostTable::new(self.boosts.clone()));
        QueryAssembler::new(boosts).with_policy(self.render_policy())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SolrqError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("solrq").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            render: RenderConfig::default(),
            boosts: default_boosts(),
            profiles: HashMap::new(),
        }
    }
}
