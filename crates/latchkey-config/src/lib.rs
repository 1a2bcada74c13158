// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Latchkey credential vault.
//!
//! TOML-based configuration with compiled defaults, XDG file hierarchy, and
//! `LATCHKEY_` environment variable overrides.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CaptureConfig, LatchkeyConfig, StorageConfig, VaultConfig};
