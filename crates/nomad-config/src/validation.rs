// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as the quota fitting inside the window and well-formed country codes.

use std::collections::HashSet;

use nomad_core::CountryCode;

use crate::diagnostic::ConfigError;
use crate::model::NomadConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &NomadConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.compliance.quota_days == 0 {
        errors.push(ConfigError::Validation {
            message: "compliance.quota_days must be at least 1".to_string(),
        });
    }

    if config.compliance.window_days == 0 {
        errors.push(ConfigError::Validation {
            message: "compliance.window_days must be at least 1".to_string(),
        });
    }

    if config.compliance.quota_days > config.compliance.window_days {
        errors.push(ConfigError::Validation {
            message: format!(
                "compliance.quota_days ({}) must not exceed compliance.window_days ({})",
                config.compliance.quota_days, config.compliance.window_days
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let level = config.traveler.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "traveler.log_level `{}` is not one of {}",
                config.traveler.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let mut seen_codes = HashSet::new();
    for (i, entry) in config.countries.iter().enumerate() {
        match CountryCode::parse(&entry.code) {
            Ok(code) => {
                if !seen_codes.insert(code.clone()) {
                    errors.push(ConfigError::Validation {
                        message: format!("duplicate country code `{code}` in [[countries]] array"),
                    });
                }
            }
            Err(_) => errors.push(ConfigError::Validation {
                message: format!(
                    "countries[{i}].code `{}` is not a two-letter country code",
                    entry.code
                ),
            }),
        }

        if entry.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("countries[{i}].name must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CountryEntry;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = NomadConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = NomadConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn quota_larger_than_window_fails_validation() {
        let mut config = NomadConfig::default();
        config.compliance.quota_days = 200;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "must not exceed"));
    }

    #[test]
    fn zero_window_reports_every_problem() {
        let mut config = NomadConfig::default();
        config.compliance.window_days = 0;
        config.compliance.quota_days = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "quota_days must be at least 1"));
        assert!(has_message(&errors, "window_days must be at least 1"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = NomadConfig::default();
        config.traveler.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "log_level"));
    }

    #[test]
    fn malformed_and_duplicate_countries_fail_validation() {
        let mut config = NomadConfig::default();
        config.countries = vec![
            CountryEntry {
                code: "gb".to_string(),
                name: "United Kingdom".to_string(),
                schengen: false,
            },
            CountryEntry {
                code: "GB".to_string(),
                name: "Britain".to_string(),
                schengen: false,
            },
            CountryEntry {
                code: "GBR".to_string(),
                name: " ".to_string(),
                schengen: false,
            },
        ];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicate country code `GB`"));
        assert!(has_message(&errors, "countries[2].code"));
        assert!(has_message(&errors, "countries[2].name"));
    }
}
