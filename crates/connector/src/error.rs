// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Error codes for the connector core.
///
/// Attached to `anyhow` chains as context so callers can recover the code
/// with `err.downcast_ref::<ConnectorError>()`. A stale distributor (saved
/// but gone from discovery) is deliberately absent here — it reads back as
/// "no distributor", never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorError {
    /// Discovery found zero candidate distributors.
    NoDistributorAvailable,
    /// Operation needs a selected distributor and none is persisted.
    NoDistributorSelected,
    /// The instance was never registered, so it has no token.
    TokenAbsent,
    /// Durable store I/O failed.
    StorageFailure,
}

impl ConnectorError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoDistributorAvailable => "NO_DISTRIBUTOR_AVAILABLE",
            Self::NoDistributorSelected => "NO_DISTRIBUTOR_SELECTED",
            Self::TokenAbsent => "TOKEN_ABSENT",
            Self::StorageFailure => "STORAGE_FAILURE",
        }
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for ConnectorError {}
