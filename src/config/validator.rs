use crate::assembler::TEXT_FULL_KEY;
use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{Result, SolrqError, ValidationError};
use std::collections::HashSet;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_boosts(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolrqError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_boosts(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.boosts.is_empty() {
            errors.push(ValidationError::new(
                "boost",
                "At least one boost field is required",
            ));
        }

        let mut seen = HashSet::new();
        for (i, boost) in config.boosts.iter().enumerate() {
            let path = format!("boost[{}]", i);

            if boost.field.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("{}.field", path),
                    "Field name cannot be empty",
                ));
            } else if boost.field.chars().any(char::is_whitespace) {
                errors.push(ValidationError::new(
                    format!("{}.field", path),
                    format!("Field name cannot contain whitespace: '{}'", boost.field),
                ));
            }

            // text_full is a request key, never a schema field
            if boost.field == TEXT_FULL_KEY {
                errors.push(ValidationError::new(
                    format!("{}.field", path),
                    format!("'{}' is reserved", TEXT_FULL_KEY),
                ));
            }

            if !seen.insert(boost.field.as_str()) {
                errors.push(ValidationError::new(
                    format!("{}.field", path),
                    format!("Duplicate boost field: '{}'", boost.field),
                ));
            }

            if !boost.weight.is_finite() || boost.weight <= 0.0 {
                errors.push(ValidationError::new(
                    format!("{}.weight", path),
                    format!("Weight must be a positive number, got {}", boost.weight),
                ));
            }
        }
    }
}
