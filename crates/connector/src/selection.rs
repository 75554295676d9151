// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Selection policy: given the discovered candidates, decide whether to
//! auto-select, ask the UI collaborator, or report that none exist.
//!
//! The policy decides *whether* a choice is needed; it renders nothing. The
//! multi-candidate case is a suspend point: the UI may answer immediately or
//! return `None`, in which case the caller resumes later by persisting a
//! choice and registering again. The core never blocks.

use crate::store::Store;

/// UI collaborator invoked by the selection policy. Implemented entirely
/// outside the core.
pub trait SelectionUi {
    /// Ask the user to pick one of several distributors. `None` means the
    /// choice was dismissed or will be supplied later.
    fn prompt_choice(&self, candidates: &[String]) -> Option<String>;

    /// Tell the user no distributor is installed. Returns `true` when the
    /// user asks to silence this prompt from now on.
    fn prompt_no_distributor(&self) -> bool;
}

/// Outcome of running the selection policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Zero candidates. `prompt_suppressed` is true when the user had
    /// already silenced the prompt, so the UI was not invoked.
    NoneAvailable { prompt_suppressed: bool },
    /// Exactly one candidate; selected without prompting.
    AutoSelected(String),
    /// The user picked one of several candidates.
    Chosen(String),
    /// Several candidates, but the UI returned no choice.
    Dismissed,
}

/// Run the policy over already-discovered `candidates`.
///
/// Persisting the selected distributor is left to the caller, so both the
/// auto-select and the chosen path go through one writer.
pub fn resolve<S: Store>(
    store: &S,
    candidates: Vec<String>,
    ui: &dyn SelectionUi,
) -> anyhow::Result<Resolution> {
    match candidates.len() {
        0 => {
            if store.no_distributor_ack()? {
                tracing::debug!("user already knows there is no distributor");
                return Ok(Resolution::NoneAvailable { prompt_suppressed: true });
            }
            if ui.prompt_no_distributor() {
                store.save_no_distributor_ack()?;
            }
            Ok(Resolution::NoneAvailable { prompt_suppressed: false })
        }
        1 => {
            let distributor = candidates.into_iter().next().unwrap_or_default();
            tracing::debug!(%distributor, "single candidate, auto-selecting");
            Ok(Resolution::AutoSelected(distributor))
        }
        _ => match ui.prompt_choice(&candidates) {
            Some(distributor) => {
                tracing::debug!(%distributor, "user chose distributor");
                Ok(Resolution::Chosen(distributor))
            }
            None => Ok(Resolution::Dismissed),
        },
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
