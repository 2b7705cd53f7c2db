// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./nomad.toml` > `~/.config/nomad/nomad.toml` > `/etc/nomad/nomad.toml`
//! with environment variable overrides via `NOMAD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::NomadConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/nomad/nomad.toml";

/// Local configuration file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "nomad.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/nomad/nomad.toml` (system-wide)
/// 3. `~/.config/nomad/nomad.toml` (user XDG config)
/// 4. `./nomad.toml` (local directory)
/// 5. `NOMAD_*` environment variables
pub fn load_config() -> Result<NomadConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<NomadConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NomadConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NomadConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NomadConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(NomadConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/nomad/nomad.toml`, when a config dir exists on this platform.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("nomad").join("nomad.toml"))
}

/// Environment provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `NOMAD_COMPLIANCE_QUOTA_DAYS` must map to
/// `compliance.quota_days`, not `compliance.quota.days`.
fn env_provider() -> Env {
    Env::prefixed("NOMAD_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("traveler_", "traveler.", 1)
            .replacen("compliance_", "compliance.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NOMAD_COMPLIANCE_QUOTA_DAYS", "60");
            jail.set_env("NOMAD_STORAGE_DATABASE_PATH", "/tmp/env.db");
            jail.set_env("NOMAD_TRAVELER_LOG_LEVEL", "debug");
            let config = build_figment().extract::<NomadConfig>()?;
            assert_eq!(config.compliance.quota_days, 60);
            assert_eq!(config.compliance.window_days, 180);
            assert_eq!(config.storage.database_path, "/tmp/env.db");
            assert_eq!(config.traveler.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn local_file_is_merged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[traveler]
name = "ana"

[[countries]]
code = "GB"
name = "United Kingdom"
"#,
            )?;
            let config = build_figment().extract::<NomadConfig>()?;
            assert_eq!(config.traveler.name, "ana");
            assert_eq!(config.countries.len(), 1);
            assert!(!config.countries[0].schengen);
            Ok(())
        });
    }
}
