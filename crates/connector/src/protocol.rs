// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire constants and message model for the distributor protocol.
//!
//! Action and field identifiers follow the published distributor protocol so
//! this connector interoperates with existing distributor implementations.

use serde::{Deserialize, Serialize};

/// Action a distributor handles to receive registrations.
pub const ACTION_REGISTER: &str = "org.unifiedpush.android.distributor.REGISTER";

/// Action a distributor handles to drop a registration.
pub const ACTION_UNREGISTER: &str = "org.unifiedpush.android.distributor.UNREGISTER";

/// Feature a distributor advertises when it can carry binary payloads.
pub const FEATURE_BYTES_MESSAGE: &str =
    "org.unifiedpush.android.distributor.feature.BYTES_MESSAGE";

/// Instance name used when the caller wants a single global channel.
pub const INSTANCE_DEFAULT: &str = "default";

/// Field keys carried on protocol messages.
pub const FIELD_TOKEN: &str = "token";
pub const FIELD_FEATURES: &str = "features";
pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_APPLICATION: &str = "application";

/// Feature set requested when the caller does not pass one.
pub fn default_features() -> Vec<String> {
    vec![FEATURE_BYTES_MESSAGE.to_owned()]
}

/// A protocol message sent to a distributor.
///
/// Delivery is fire-and-forget: the distributor's reply (the endpoint, or an
/// error) arrives later through a separate inbound channel outside this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Message {
    /// Request a registration for one instance token.
    Register {
        token: String,
        features: Vec<String>,
        /// Free-form note for the distributor (e.g. a VAPID key).
        message: String,
        /// Identity of the requesting application.
        application: String,
    },
    /// Drop the registration behind a token.
    Unregister { token: String },
}

impl Message {
    /// The action identifier this message is addressed to.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Register { .. } => ACTION_REGISTER,
            Self::Unregister { .. } => ACTION_UNREGISTER,
        }
    }

    /// The instance token carried by this message.
    pub fn token(&self) -> &str {
        match self {
            Self::Register { token, .. } | Self::Unregister { token } => token,
        }
    }
}
