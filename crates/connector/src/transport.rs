// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound message transport boundary.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::protocol::Message;

/// Fire-and-forget delivery to a distributor.
///
/// Best-effort: a send to an uninstalled distributor is not detectable here.
/// The engine relies on discovery re-validation at the next read, not on
/// send-time errors. Implemented over the OS broadcast mechanism by the
/// embedding application.
pub trait Transport {
    fn send(&self, distributor: &str, message: &Message) -> anyhow::Result<()>;
}

/// Transport that writes each message to the log as JSON. Used by the
/// maintenance binary, where no real broadcast mechanism exists.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

impl Transport for LogTransport {
    fn send(&self, distributor: &str, message: &Message) -> anyhow::Result<()> {
        let body = serde_json::to_string(message)?;
        tracing::info!(%distributor, action = message.action(), %body, "send");
        Ok(())
    }
}

/// In-process transport that records every message. Useful for embedding a
/// distributor in the same process and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<(String, Message)>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, in order.
    pub fn sent(&self) -> Vec<(String, Message)> {
        self.sent.lock().clone()
    }
}

impl Transport for MemoryTransport {
    fn send(&self, distributor: &str, message: &Message) -> anyhow::Result<()> {
        self.sent.lock().push((distributor.to_owned(), message.clone()));
        Ok(())
    }
}
