// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connector core for push distributor registration.
//!
//! An application obtains a push endpoint from whichever distributor process
//! is installed on the device, without knowing which one is present or how it
//! talks. This crate covers the registration protocol engine: distributor
//! discovery, selection persistence, per-instance token issuance, the
//! REGISTER/UNREGISTER message flow, and the acknowledgement state that tracks
//! whether the selected distributor has actually confirmed a registration.
//!
//! The OS-level pieces stay outside: the broadcast transport, the package
//! registry, and the selection dialog are collaborator traits ([`Transport`],
//! [`Registry`], [`SelectionUi`]) implemented by the embedding application.

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod selection;
pub mod store;
pub mod transport;

pub use engine::{RegisterOutcome, RegistrationEngine};
pub use error::ConnectorError;
pub use registry::{Candidate, Registry};
pub use selection::SelectionUi;
pub use store::Store;
pub use transport::Transport;
