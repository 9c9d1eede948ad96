use crate::value::ValueError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for solrq
#[derive(Error, Debug)]
pub enum SolrqError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Unknown configuration profile
    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    /// Parameter names must be non-empty
    #[error("Invalid field name: {0:?}")]
    InvalidField(String),

    /// A parameter value could not be classified (strict rendering only)
    #[error("Invalid value for field '{field}': {source}")]
    InvalidValue { field: String, source: ValueError },

    /// Sort specification errors
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// Parameter input was not a JSON object
    #[error("Parameters must be a JSON object, got {0}")]
    InvalidParameters(String),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for solrq operations
pub type Result<T> = std::result::Result<T, SolrqError>;
