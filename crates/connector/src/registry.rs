// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Package registry boundary: who on this device can act as a distributor.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One process registered to handle REGISTER messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Process/package identity of the candidate.
    pub identity: String,
    /// Features the candidate advertises. `None` means the registry could
    /// not introspect features for this candidate — the filter fails open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    /// Whether the candidate is invokable by other applications.
    #[serde(default = "default_true")]
    pub exported: bool,
    /// Whether the candidate is the calling application itself
    /// (self-distribution).
    #[serde(default)]
    pub is_self: bool,
}

fn default_true() -> bool {
    true
}

/// Registry query collaborator. Implemented over the OS package registry by
/// the embedding application; file- and vec-backed implementations live here
/// for tooling and tests.
pub trait Registry {
    /// Enumerate candidates handling the REGISTER action, in registry order.
    fn find_candidates(&self) -> anyhow::Result<Vec<Candidate>>;
}

/// Fixed candidate list.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    candidates: Vec<Candidate>,
}

impl StaticRegistry {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl Registry for StaticRegistry {
    fn find_candidates(&self) -> anyhow::Result<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }
}

/// Candidate list loaded from a JSON file on every query, so edits to the
/// file act like installs/uninstalls. Used by the maintenance binary.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: std::path::PathBuf,
}

impl FileRegistry {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Registry for FileRegistry {
    fn find_candidates(&self) -> anyhow::Result<Vec<Candidate>> {
        load_candidates(&self.path)
    }
}

fn load_candidates(path: &Path) -> anyhow::Result<Vec<Candidate>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading registry {}", path.display()))?;
    let candidates: Vec<Candidate> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing registry {}", path.display()))?;
    Ok(candidates)
}
