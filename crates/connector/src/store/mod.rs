// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable registration state: instance tokens, the selected distributor,
//! and the two acknowledgement flags.
//!
//! The store is the single source of truth — the engine and the selection
//! policy read through it instead of caching. Implementations serialize
//! internally, so callers may share a handle across threads freely.

pub mod file;

pub use file::FileStore;

/// Durable key-value state behind the registration engine.
///
/// Every mutating call commits before returning; a crash between calls never
/// leaves partial state. Absence of a key is a normal `None`, not an error;
/// I/O failures propagate carrying [`crate::ConnectorError::StorageFailure`].
pub trait Store {
    /// Return the token for `instance`, generating and persisting a fresh
    /// one on first use. Atomic per instance: concurrent calls for the same
    /// instance resolve to a single token.
    fn get_or_create_token(&self, instance: &str) -> anyhow::Result<String>;

    /// Non-creating token lookup.
    fn try_get_token(&self, instance: &str) -> anyhow::Result<Option<String>>;

    /// All instances holding a token, in stable (sorted) order.
    fn instances(&self) -> anyhow::Result<Vec<String>>;

    /// Drop one instance. With `also_clear_distributor`, the distributor
    /// selection (and its ack) is cleared when this removal leaves zero
    /// instances — a distributor with no active instances is not retained.
    fn remove_instance(&self, instance: &str, also_clear_distributor: bool)
        -> anyhow::Result<()>;

    /// Drop every instance token.
    fn remove_all_instances(&self) -> anyhow::Result<()>;

    /// Persist the distributor selection. Selecting a *different*
    /// distributor resets the ack flag: acknowledgement is only meaningful
    /// relative to the distributor it came from.
    fn save_distributor(&self, distributor: &str) -> anyhow::Result<()>;

    /// Raw saved distributor, without discovery re-validation.
    fn try_get_distributor(&self) -> anyhow::Result<Option<String>>;

    /// Clear the distributor selection and its ack flag.
    fn remove_distributor(&self) -> anyhow::Result<()>;

    /// Whether the selected distributor has confirmed a registration.
    fn distributor_ack(&self) -> anyhow::Result<bool>;

    fn set_distributor_ack(&self, acked: bool) -> anyhow::Result<()>;

    /// Record that the user has silenced the "no distributor installed"
    /// prompt. Never auto-cleared.
    fn save_no_distributor_ack(&self) -> anyhow::Result<()>;

    fn no_distributor_ack(&self) -> anyhow::Result<bool>;

    fn remove_no_distributor_ack(&self) -> anyhow::Result<()>;
}
