// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// Configuration for the connector tooling.
#[derive(Debug, Clone, clap::Args)]
pub struct ConnectorConfig {
    /// Directory holding the registration state file.
    #[arg(long, env = "UPDC_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Path to the JSON registry file listing candidate distributors.
    #[arg(long, env = "UPDC_REGISTRY")]
    pub registry: PathBuf,

    /// Identity of the requesting application, carried on REGISTER messages.
    #[arg(long, default_value = "org.updc.updctl", env = "UPDC_APPLICATION")]
    pub application: String,
}

impl ConnectorConfig {
    /// Path of the registration state file.
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(state_dir).join("connector.json")
    }
}

/// Resolve the default state directory.
///
/// Checks `UPDC_STATE_DIR`, then `$XDG_STATE_HOME/updc`,
/// then `$HOME/.local/state/updc`.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("UPDC_STATE_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("updc");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/updc");
    }
    PathBuf::from(".updc")
}
