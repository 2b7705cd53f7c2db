// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Nomad configuration system.

use nomad_config::diagnostic::ConfigError;
use nomad_config::model::NomadConfig;
use nomad_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_nomad_config() {
    let toml = r#"
[traveler]
name = "ana"
log_level = "debug"

[compliance]
quota_days = 60
window_days = 120

[storage]
database_path = "/tmp/nomad-test.db"
wal_mode = false

[[countries]]
code = "GB"
name = "United Kingdom"

[[countries]]
code = "XK"
name = "Kosovo"
schengen = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.traveler.name, "ana");
    assert_eq!(config.traveler.log_level, "debug");
    assert_eq!(config.compliance.quota_days, 60);
    assert_eq!(config.compliance.window_days, 120);
    assert_eq!(config.storage.database_path, "/tmp/nomad-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.countries.len(), 2);
    assert_eq!(config.countries[1].code, "XK");

    let rule = config.compliance.rule();
    assert_eq!(rule.quota_days, 60);
    assert_eq!(rule.window_days, 120);
}

/// An empty document yields the 90-in-180 defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.compliance.quota_days, 90);
    assert_eq!(config.compliance.window_days, 180);
    assert_eq!(config.traveler.log_level, "warn");
    assert!(config.storage.wal_mode);
    assert!(config.countries.is_empty());
}

/// Unknown field in [compliance] produces an error naming the bad key.
#[test]
fn unknown_field_in_compliance_produces_error() {
    let toml = r#"
[compliance]
quota_dyas = 90
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("quota_dyas"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// The diagnostic path suggests the nearest valid key.
#[test]
fn unknown_field_diagnostic_suggests_correction() {
    let toml = r#"
[compliance]
quota_dyas = 90
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("quota_days"));
}

/// A wrong value type is reported as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[compliance]
window_days = "half a year"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "expected a type error, got: {errors:?}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[sync]
enabled = true
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Semantic validation runs after a successful parse.
#[test]
fn semantic_validation_runs_after_parse() {
    let toml = r#"
[compliance]
quota_days = 200
window_days = 180
"#;

    let errors = load_and_validate_str(toml).expect_err("quota > window must fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("quota_days"))
    ));
}

/// Country entries require a name.
#[test]
fn country_entry_requires_name() {
    let toml = r#"
[[countries]]
code = "GB"
"#;

    let result = toml::from_str::<NomadConfig>(toml);
    assert!(result.is_err());
}

/// Default config round-trips through JSON for debugging output.
#[test]
fn default_config_serializes() {
    let json = serde_json::to_string(&NomadConfig::default()).unwrap();
    assert!(json.contains("\"quota_days\":90"));
}

/// Rendering the effective config produces TOML that loads back.
#[test]
fn effective_config_renders_as_loadable_toml() {
    let mut config = NomadConfig::default();
    config.compliance.quota_days = 45;
    let rendered = config.to_toml_string().unwrap();
    let reloaded = load_and_validate_str(&rendered).expect("rendered config should load");
    assert_eq!(reloaded.compliance.quota_days, 45);
}
