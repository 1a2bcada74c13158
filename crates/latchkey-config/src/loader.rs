// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./latchkey.toml` > `~/.config/latchkey/latchkey.toml`
//! > `/etc/latchkey/latchkey.toml` with environment variable overrides via the
//! `LATCHKEY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LatchkeyConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/latchkey/latchkey.toml` (system-wide)
/// 3. `~/.config/latchkey/latchkey.toml` (user XDG config)
/// 4. `./latchkey.toml` (local directory)
/// 5. `LATCHKEY_*` environment variables
pub fn load_config() -> Result<LatchkeyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LatchkeyConfig::default()))
        .merge(Toml::file("/etc/latchkey/latchkey.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("latchkey/latchkey.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("latchkey.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<LatchkeyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LatchkeyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LatchkeyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LatchkeyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `LATCHKEY_VAULT_KDF_ITERATIONS` must map
/// to `vault.kdf_iterations`, not `vault.kdf.iterations`.
fn env_provider() -> Env {
    Env::prefixed("LATCHKEY_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("vault_", "vault.", 1)
            .replacen("capture_", "capture.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
