// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Smoke tests that run the real `updctl` binary against a temp state dir
//! and a JSON registry file.

use std::path::Path;
use std::process::{Command, Output};

use connector_specs::updctl_binary;

fn updctl(state_dir: &Path, registry: &Path, args: &[&str]) -> anyhow::Result<Output> {
    let output = Command::new(updctl_binary())
        .arg("--state-dir")
        .arg(state_dir)
        .arg("--registry")
        .arg(registry)
        .args(args)
        .output()?;
    Ok(output)
}

fn write_registry(path: &Path, identities: &[&str]) -> anyhow::Result<()> {
    let candidates: Vec<serde_json::Value> = identities
        .iter()
        .map(|id| serde_json::json!({ "identity": id, "exported": true }))
        .collect();
    std::fs::write(path, serde_json::to_string_pretty(&candidates)?)?;
    Ok(())
}

#[test]
fn register_status_reset_roundtrip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = dir.path().join("state");
    let registry = dir.path().join("registry.json");
    write_registry(&registry, &["org.example.dist"])?;

    let out = updctl(&state, &registry, &["register", "--instance", "chat"])?;
    anyhow::ensure!(out.status.success(), "register failed: {out:?}");
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("registered chat with org.example.dist"), "stdout: {stdout}");

    let out = updctl(&state, &registry, &["status"])?;
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("org.example.dist"), "stdout: {stdout}");
    assert!(stdout.contains("chat"), "stdout: {stdout}");

    let out = updctl(&state, &registry, &["token", "--instance", "chat"])?;
    anyhow::ensure!(out.status.success(), "token failed: {out:?}");
    assert!(!String::from_utf8(out.stdout)?.trim().is_empty());

    let out = updctl(&state, &registry, &["reset"])?;
    anyhow::ensure!(out.status.success(), "reset failed: {out:?}");
    let out = updctl(&state, &registry, &["status"])?;
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("distributor: <none>"), "stdout: {stdout}");
    Ok(())
}

#[test]
fn register_fails_cleanly_with_empty_registry() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = dir.path().join("state");
    let registry = dir.path().join("registry.json");
    write_registry(&registry, &[])?;

    let out = updctl(&state, &registry, &["register"])?;
    anyhow::ensure!(!out.status.success(), "expected register to fail");
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("no distributor is installed"), "stdout: {stdout}");
    Ok(())
}

#[test]
fn pending_choice_resumes_with_choose() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let state = dir.path().join("state");
    let registry = dir.path().join("registry.json");
    write_registry(&registry, &["org.example.a", "org.example.b"])?;

    // Two candidates: the non-interactive UI reports and defers.
    let out = updctl(&state, &registry, &["register"])?;
    anyhow::ensure!(out.status.success(), "register failed: {out:?}");
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("pick one"), "stdout: {stdout}");

    let out = updctl(&state, &registry, &["choose", "org.example.b"])?;
    anyhow::ensure!(out.status.success(), "choose failed: {out:?}");

    let out = updctl(&state, &registry, &["register"])?;
    anyhow::ensure!(out.status.success(), "register failed: {out:?}");
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("with org.example.b"), "stdout: {stdout}");
    Ok(())
}
