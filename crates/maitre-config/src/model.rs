// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Maitre service engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Maitre configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MaitreConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Mission lifecycle settings.
    #[serde(default)]
    pub missions: MissionConfig,

    /// Call-button signal settings.
    #[serde(default)]
    pub signal: SignalConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "maitre".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
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
        .map(|p| p.join("maitre").join("maitre.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("maitre.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Mission lifecycle configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MissionConfig {
    /// When true, finishing an ORDER mission automatically starts a SERVE
    /// mission for the same place.
    #[serde(default)]
    pub track_serve_mission: bool,
}

/// Call-button signal configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignalConfig {
    /// Initial learning-mode state: unknown device codes are auto-registered
    /// instead of merely logged. Runtime-togglable through the injected cell.
    #[serde(default)]
    pub learning_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_safe() {
        let config = MaitreConfig::default();
        assert_eq!(config.service.name, "maitre");
        assert_eq!(config.service.log_level, "info");
        assert!(config.storage.wal_mode);
        assert!(!config.missions.track_serve_mission);
        assert!(!config.signal.learning_mode);
    }

    #[test]
    fn sections_deserialize_from_toml() {
        let toml_str = r#"
[missions]
track_serve_mission = true

[signal]
learning_mode = true
"#;
        let config: MaitreConfig = toml::from_str(toml_str).unwrap();
        assert!(config.missions.track_serve_mission);
        assert!(config.signal.learning_mode);
        // Untouched sections keep their defaults.
        assert_eq!(config.service.name, "maitre");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml_str = r#"
[missions]
track_serve_missions = true
"#;
        assert!(toml::from_str::<MaitreConfig>(toml_str).is_err());
    }
}
