// SPDX-FileCopyrightText: 2026 Maitre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./maitre.toml` > `~/.config/maitre/maitre.toml` > `/etc/maitre/maitre.toml`
//! with environment variable overrides via `MAITRE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MaitreConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/maitre/maitre.toml` (system-wide)
/// 3. `~/.config/maitre/maitre.toml` (user XDG config)
/// 4. `./maitre.toml` (local directory)
/// 5. `MAITRE_*` environment variables
pub fn load_config() -> Result<MaitreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MaitreConfig::default()))
        .merge(Toml::file("/etc/maitre/maitre.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("maitre/maitre.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("maitre.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MaitreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MaitreConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MaitreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MaitreConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MAITRE_MISSIONS_TRACK_SERVE_MISSION` must
/// map to `missions.track_serve_mission`, not `missions.track.serve.mission`.
fn env_provider() -> Env {
    Env::prefixed("MAITRE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: MAITRE_STORAGE_DATABASE_PATH -> "storage_database_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("missions_", "missions.", 1)
            .replacen("signal_", "signal.", 1);
        mapped.into()
    })
}
