// SPDX-FileCopyrightText: 2026 Nomad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use nomad_core::ComplianceRule;
use serde::{Deserialize, Serialize};

/// Top-level Nomad configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NomadConfig {
    /// Who the ledger belongs to and how chatty the CLI is.
    #[serde(default)]
    pub traveler: TravelerConfig,

    /// Rolling-window rule parameters.
    #[serde(default)]
    pub compliance: ComplianceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Additions and overrides to the built-in country table.
    #[serde(default)]
    pub countries: Vec<CountryEntry>,
}

impl NomadConfig {
    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Traveler identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TravelerConfig {
    /// Label printed in CLI reports.
    #[serde(default = "default_traveler_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TravelerConfig {
    fn default() -> Self {
        Self {
            name: default_traveler_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_traveler_name() -> String {
    "traveler".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Rolling-window compliance configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComplianceConfig {
    /// Maximum days allowed inside the area within one window.
    #[serde(default = "default_quota_days")]
    pub quota_days: u32,

    /// Length of the lookback window, in days, ending on the reference date.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            quota_days: default_quota_days(),
            window_days: default_window_days(),
        }
    }
}

impl ComplianceConfig {
    pub fn rule(&self) -> ComplianceRule {
        ComplianceRule {
            quota_days: self.quota_days,
            window_days: self.window_days,
        }
    }
}

fn default_quota_days() -> u32 {
    90
}

fn default_window_days() -> u32 {
    180
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("nomad").join("nomad.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("nomad.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// One row of the country table supplied through configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CountryEntry {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Whether days spent here count toward the quota.
    #[serde(default)]
    pub schengen: bool,
}
