// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end registration flows over the full engine stack.

use connector_specs::{candidate, ScriptedUi, TestBed};
use updc::protocol::{self, Message, FEATURE_BYTES_MESSAGE};
use updc::registry::StaticRegistry;
use updc::store::{FileStore, Store};
use updc::transport::MemoryTransport;
use updc::{RegisterOutcome, RegistrationEngine};

#[test]
fn full_lifecycle_single_distributor() -> anyhow::Result<()> {
    let bed = TestBed::with_candidates(vec![candidate("org.example.dist", None)])?;
    let ui = ScriptedUi::default();

    // Auto-selected, token issued, REGISTER sent.
    let outcome =
        bed.engine.register("default", &protocol::default_features(), "hello", &ui)?;
    let RegisterOutcome::Registered { distributor, token } = outcome else {
        anyhow::bail!("expected registration");
    };
    assert_eq!(distributor, "org.example.dist");
    assert_eq!(ui.choice_calls(), 0);

    // Same instance keeps its token on re-registration.
    bed.engine.register("default", &protocol::default_features(), "hello", &ui)?;
    assert_eq!(bed.engine.token("default")?, token);

    // The distributor's reply flips the ack state.
    bed.engine.mark_acknowledged("org.example.dist")?;
    assert_eq!(bed.engine.acked_distributor()?.as_deref(), Some("org.example.dist"));

    // Unregistering the only instance clears the selection.
    bed.engine.unregister("default")?;
    assert_eq!(bed.engine.store().try_get_distributor()?, None);
    assert_eq!(bed.engine.acked_distributor()?, None);

    let actions: Vec<&str> = bed.transport.sent().iter().map(|(_, m)| m.action()).collect();
    assert_eq!(
        actions,
        vec![protocol::ACTION_REGISTER, protocol::ACTION_REGISTER, protocol::ACTION_UNREGISTER]
    );
    Ok(())
}

#[test]
fn feature_requirement_narrows_selection_to_one() -> anyhow::Result<()> {
    let bed = TestBed::with_candidates(vec![
        candidate("org.example.plain", Some(&[])),
        candidate("org.example.bytes", Some(&[FEATURE_BYTES_MESSAGE])),
    ])?;
    let ui = ScriptedUi::default();

    let outcome =
        bed.engine.register("default", &[FEATURE_BYTES_MESSAGE.to_owned()], "", &ui)?;
    assert!(matches!(
        outcome,
        RegisterOutcome::Registered { ref distributor, .. }
            if distributor == "org.example.bytes"
    ));
    // Only one candidate passed the filter, so no choice prompt.
    assert_eq!(ui.choice_calls(), 0);
    Ok(())
}

#[test]
fn dismissed_choice_resumes_via_explicit_save() -> anyhow::Result<()> {
    let bed = TestBed::with_candidates(vec![
        candidate("org.example.a", None),
        candidate("org.example.b", None),
        candidate("org.example.c", None),
    ])?;

    // Choice pending: nothing persisted, nothing sent.
    let pending_ui = ScriptedUi::default();
    assert_eq!(
        bed.engine.register("default", &[], "", &pending_ui)?,
        RegisterOutcome::Dismissed
    );
    assert!(bed.transport.sent().is_empty());

    // The caller resumes once the user picked.
    bed.engine.save_distributor("org.example.c")?;
    let (distributor, _token) = bed.engine.register_current("default", &[], "")?;
    assert_eq!(distributor, "org.example.c");
    assert_eq!(pending_ui.choice_calls(), 1);
    Ok(())
}

#[test]
fn choice_prompt_runs_once_across_instances() -> anyhow::Result<()> {
    let bed = TestBed::with_candidates(vec![
        candidate("org.example.a", None),
        candidate("org.example.b", None),
        candidate("org.example.c", None),
    ])?;
    let ui = ScriptedUi::choosing("org.example.b");

    bed.engine.register("chat", &[], "", &ui)?;
    bed.engine.register("mail", &[], "", &ui)?;
    bed.engine.register("calendar", &[], "", &ui)?;

    assert_eq!(ui.choice_calls(), 1);
    assert_eq!(bed.engine.store().instances()?.len(), 3);
    Ok(())
}

#[test]
fn force_remove_after_two_registrations() -> anyhow::Result<()> {
    let bed = TestBed::with_candidates(vec![candidate("org.example.dist", None)])?;
    let ui = ScriptedUi::default();

    bed.engine.register("a", &[], "", &ui)?;
    bed.engine.register("b", &[], "", &ui)?;

    bed.engine.force_remove_distributor()?;
    assert!(bed.engine.store().instances()?.is_empty());
    assert_eq!(bed.engine.store().try_get_distributor()?, None);

    // Two REGISTERs followed by a best-effort UNREGISTER per instance.
    let unregisters = bed
        .transport
        .sent()
        .iter()
        .filter(|(_, m)| matches!(m, Message::Unregister { .. }))
        .count();
    assert_eq!(unregisters, 2);
    Ok(())
}

#[test]
fn uninstalled_distributor_is_replaced_on_next_register() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = dir.path().join("connector.json");

    // First life: register and ack against the only installed distributor.
    {
        let store = FileStore::open(&state)?;
        let engine = RegistrationEngine::new(
            store,
            StaticRegistry::new(vec![candidate("org.example.old", None)]),
            MemoryTransport::new(),
            "org.example.app",
        );
        engine.register("default", &[], "", &ScriptedUi::default())?;
        engine.mark_acknowledged("org.example.old")?;
    }

    // Second life: the old distributor is gone, a new one is installed.
    let store = FileStore::open(&state)?;
    let engine = RegistrationEngine::new(
        store,
        StaticRegistry::new(vec![candidate("org.example.new", None)]),
        MemoryTransport::new(),
        "org.example.app",
    );

    // Saved and acked reads both treat the stale value as absent.
    assert_eq!(engine.saved_distributor()?, None);
    assert_eq!(engine.acked_distributor()?, None);

    // Re-registration auto-selects the new sole candidate, with a fresh
    // (unacked) selection. The instance token survives the switch.
    let token_before = engine.token("default")?;
    let outcome = engine.register("default", &[], "", &ScriptedUi::default())?;
    assert!(matches!(
        outcome,
        RegisterOutcome::Registered { ref distributor, .. }
            if distributor == "org.example.new"
    ));
    assert!(!engine.store().distributor_ack()?);
    assert_eq!(engine.token("default")?, token_before);
    Ok(())
}

#[test]
fn no_distributor_prompt_silenced_once_acknowledged() -> anyhow::Result<()> {
    let bed = TestBed::with_candidates(Vec::new())?;

    let ui = ScriptedUi::silencing();
    assert_eq!(
        bed.engine.register("default", &[], "", &ui)?,
        RegisterOutcome::NoDistributor { prompt_suppressed: false }
    );
    assert_eq!(ui.no_distributor_calls(), 1);

    // Silenced: the next attempt invokes no UI at all.
    assert_eq!(
        bed.engine.register("default", &[], "", &ui)?,
        RegisterOutcome::NoDistributor { prompt_suppressed: true }
    );
    assert_eq!(ui.no_distributor_calls(), 1);

    // Explicitly cleared, the notice may show again.
    bed.engine.clear_no_distributor_ack()?;
    bed.engine.register("default", &[], "", &ui)?;
    assert_eq!(ui.no_distributor_calls(), 2);
    Ok(())
}
