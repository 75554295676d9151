// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registration engine: token issuance, protocol sends, and the
//! acknowledgement state transitions.
//!
//! Per instance the state is `Unregistered → Registered`; for the single
//! device-wide distributor selection it is `Unselected → SelectedUnacked →
//! SelectedAcked`, resetting to unacked whenever the selection changes. An
//! unacknowledged selection stays that way until a new registration attempt
//! or an explicit reset — no timeouts live here.

use crate::discovery;
use crate::error::ConnectorError;
use crate::protocol::Message;
use crate::registry::Registry;
use crate::selection::{self, Resolution, SelectionUi};
use crate::store::Store;
use crate::transport::Transport;

/// Result of a [`RegistrationEngine::register`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A REGISTER message went out; the endpoint arrives asynchronously.
    Registered { distributor: String, token: String },
    /// No distributor is installed. `prompt_suppressed` is true when the
    /// user had already silenced the prompt.
    NoDistributor { prompt_suppressed: bool },
    /// Several distributors exist and no choice was made. Resume by saving
    /// a choice ([`RegistrationEngine::save_distributor`]) and registering
    /// again.
    Dismissed,
}

/// Drives registration against a selected distributor.
///
/// All shared state lives behind the [`Store`] handle; the engine caches
/// nothing. Collaborators are seams: the registry and transport belong to
/// the embedding application.
pub struct RegistrationEngine<S, R, T> {
    store: S,
    registry: R,
    transport: T,
    /// Identity of the requesting application, carried on REGISTER messages.
    application: String,
}

impl<S: Store, R: Registry, T: Transport> RegistrationEngine<S, R, T> {
    pub fn new(store: S, registry: R, transport: T, application: impl Into<String>) -> Self {
        Self { store, registry, transport, application: application.into() }
    }

    /// The underlying state store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register `instance`, resolving a distributor first if needed.
    ///
    /// Fast path: a selected distributor — acknowledged or not — that still
    /// shows up in discovery is reused without prompting. Otherwise the
    /// selection policy runs over fresh discovery results and `ui` may be
    /// consulted. On success a REGISTER message carrying the instance token,
    /// `features`, `message_for_distributor`, and the application identity
    /// goes out fire-and-forget.
    pub fn register(
        &self,
        instance: &str,
        features: &[String],
        message_for_distributor: &str,
        ui: &dyn SelectionUi,
    ) -> anyhow::Result<RegisterOutcome> {
        if let Some(distributor) = self.saved_distributor()? {
            let token = self.send_register(&distributor, instance, features, message_for_distributor)?;
            return Ok(RegisterOutcome::Registered { distributor, token });
        }

        let candidates = discovery::discover(&self.registry, features)?;
        match selection::resolve(&self.store, candidates, ui)? {
            Resolution::AutoSelected(distributor) | Resolution::Chosen(distributor) => {
                self.store.save_distributor(&distributor)?;
                tracing::debug!(%distributor, "saved distributor");
                let token =
                    self.send_register(&distributor, instance, features, message_for_distributor)?;
                Ok(RegisterOutcome::Registered { distributor, token })
            }
            Resolution::NoneAvailable { prompt_suppressed } => {
                Ok(RegisterOutcome::NoDistributor { prompt_suppressed })
            }
            Resolution::Dismissed => Ok(RegisterOutcome::Dismissed),
        }
    }

    /// Register `instance` against the already-saved distributor, without
    /// running discovery-based selection or consulting any UI.
    ///
    /// Errors with [`ConnectorError::NoDistributorSelected`] when no valid
    /// selection exists.
    pub fn register_current(
        &self,
        instance: &str,
        features: &[String],
        message_for_distributor: &str,
    ) -> anyhow::Result<(String, String)> {
        let distributor = self
            .saved_distributor()?
            .ok_or(ConnectorError::NoDistributorSelected)?;
        let token = self.send_register(&distributor, instance, features, message_for_distributor)?;
        Ok((distributor, token))
    }

    fn send_register(
        &self,
        distributor: &str,
        instance: &str,
        features: &[String],
        message_for_distributor: &str,
    ) -> anyhow::Result<String> {
        let token = self.store.get_or_create_token(instance)?;
        let message = Message::Register {
            token: token.clone(),
            features: features.to_vec(),
            message: message_for_distributor.to_owned(),
            application: self.application.clone(),
        };
        self.transport.send(distributor, &message)?;
        Ok(token)
    }

    /// Unregister `instance`. Idempotent: a missing token or a gone
    /// distributor is a benign no-op, never an error.
    ///
    /// Removing the last instance also clears the distributor selection — a
    /// distributor with zero active instances is not worth retaining.
    pub fn unregister(&self, instance: &str) -> anyhow::Result<()> {
        let Some(distributor) = self.saved_distributor()? else {
            // Stale or absent selection: drop whatever state is left.
            self.store.remove_all_instances()?;
            self.store.remove_distributor()?;
            return Ok(());
        };
        let Some(token) = self.store.try_get_token(instance)? else {
            return Ok(());
        };
        if let Err(e) = self.transport.send(&distributor, &Message::Unregister { token }) {
            tracing::warn!(%distributor, instance, err = %e, "unregister send failed");
        }
        self.store.remove_instance(instance, true)?;
        Ok(())
    }

    /// The saved distributor, re-validated against a fresh unfiltered
    /// discovery. A stale value reads as `None` but is not auto-cleared;
    /// explicit cleanup removes it later.
    pub fn saved_distributor(&self) -> anyhow::Result<Option<String>> {
        self.validated_distributor(false)
    }

    /// Like [`Self::saved_distributor`], but only when the distributor has
    /// acknowledged a registration (it has sent an endpoint).
    pub fn acked_distributor(&self) -> anyhow::Result<Option<String>> {
        self.validated_distributor(true)
    }

    fn validated_distributor(&self, require_ack: bool) -> anyhow::Result<Option<String>> {
        if require_ack && !self.store.distributor_ack()? {
            return Ok(None);
        }
        let Some(distributor) = self.store.try_get_distributor()? else {
            return Ok(None);
        };
        let installed = discovery::discover(&self.registry, &[])?;
        if installed.iter().any(|d| d == &distributor) {
            tracing::debug!(%distributor, "found saved distributor");
            Ok(Some(distributor))
        } else {
            tracing::info!(%distributor, "saved distributor no longer installed");
            Ok(None)
        }
    }

    /// Persist a distributor choice. Selecting a different distributor
    /// resets the acknowledgement state.
    pub fn save_distributor(&self, distributor: &str) -> anyhow::Result<()> {
        self.store.save_distributor(distributor)
    }

    /// Record the distributor's positive reply to a registration. Invoked
    /// by the inbound acknowledgement layer; ignored when `distributor` is
    /// not the saved selection.
    pub fn mark_acknowledged(&self, distributor: &str) -> anyhow::Result<()> {
        match self.store.try_get_distributor()? {
            Some(saved) if saved == distributor => self.store.set_distributor_ack(true),
            saved => {
                tracing::warn!(
                    %distributor,
                    saved = saved.as_deref().unwrap_or("<none>"),
                    "ack from a distributor that is not selected, ignoring"
                );
                Ok(())
            }
        }
    }

    /// Token for an already-registered instance.
    ///
    /// Errors with [`ConnectorError::TokenAbsent`] when the instance was
    /// never registered.
    pub fn token(&self, instance: &str) -> anyhow::Result<String> {
        self.store
            .try_get_token(instance)?
            .ok_or_else(|| ConnectorError::TokenAbsent.into())
    }

    /// Clear the distributor selection only when zero instances remain.
    /// Prevents orphaning active registrations.
    pub fn safe_remove_distributor(&self) -> anyhow::Result<()> {
        if self.store.instances()?.is_empty() {
            self.store.remove_distributor()?;
        }
        Ok(())
    }

    /// Reset-style recovery: best-effort UNREGISTER for every instance, then
    /// unconditionally wipe all instances and the distributor selection.
    /// Individual send failures are logged, never aborting the wipe.
    pub fn force_remove_distributor(&self) -> anyhow::Result<()> {
        if let Some(distributor) = self.store.try_get_distributor()? {
            for instance in self.store.instances()? {
                let Some(token) = self.store.try_get_token(&instance)? else {
                    continue;
                };
                if let Err(e) =
                    self.transport.send(&distributor, &Message::Unregister { token })
                {
                    tracing::warn!(
                        %distributor, instance = %instance, err = %e,
                        "unregister send failed during force removal"
                    );
                }
            }
        }
        self.store.remove_all_instances()?;
        self.store.remove_distributor()?;
        Ok(())
    }

    /// Let the "no distributor installed" prompt show again.
    pub fn clear_no_distributor_ack(&self) -> anyhow::Result<()> {
        self.store.remove_no_distributor_ack()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
