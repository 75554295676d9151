// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-file store with atomic writes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::ConnectorError;
use crate::store::Store;

/// On-disk registration state.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Document {
    /// Instance name → token.
    #[serde(default)]
    instances: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distributor: Option<String>,
    #[serde(default)]
    distributor_ack: bool,
    #[serde(default)]
    no_distributor_ack: bool,
}

/// File-backed [`Store`]. Cheap to clone; clones share state.
///
/// One lock guards each operation end to end, which makes the per-instance
/// read-modify-write of `get_or_create_token` atomic. The lock is held only
/// across a single small-document read/mutate/commit.
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    doc: Mutex<Document>,
}

impl FileStore {
    /// Open the store at `path`, loading existing state if present.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))
                .context(ConnectorError::StorageFailure)?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))
                .context(ConnectorError::StorageFailure)?
        } else {
            Document::default()
        };
        Ok(Self { inner: Arc::new(Inner { path, doc: Mutex::new(doc) }) })
    }

    /// Run one mutation: apply to a scratch copy, commit it to disk, then
    /// publish in memory. A failed commit leaves the previous state visible.
    fn mutate<F: FnOnce(&mut Document)>(&self, f: F) -> anyhow::Result<()> {
        let mut doc = self.inner.doc.lock();
        let mut next = doc.clone();
        f(&mut next);
        persist(&self.inner.path, &next)?;
        *doc = next;
        Ok(())
    }
}

/// Write the document atomically (write tmp + rename).
///
/// Uses a unique temp filename (PID + counter) to avoid corruption when
/// concurrent saves race on the same `.tmp` file — a shorter write can leave
/// trailing bytes from a longer previous write.
fn persist(path: &Path, doc: &Document) -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).context(ConnectorError::StorageFailure)?;
        }
    }

    let json = serde_json::to_string_pretty(doc).context(ConnectorError::StorageFailure)?;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, json).context(ConnectorError::StorageFailure)?;
    std::fs::rename(&tmp_path, path).context(ConnectorError::StorageFailure)?;
    Ok(())
}

impl Store for FileStore {
    fn get_or_create_token(&self, instance: &str) -> anyhow::Result<String> {
        let mut doc = self.inner.doc.lock();
        if let Some(token) = doc.instances.get(instance) {
            return Ok(token.clone());
        }
        let token = uuid::Uuid::new_v4().to_string();
        let mut next = doc.clone();
        next.instances.insert(instance.to_owned(), token.clone());
        persist(&self.inner.path, &next)?;
        *doc = next;
        tracing::debug!(instance, "issued new token");
        Ok(token)
    }

    fn try_get_token(&self, instance: &str) -> anyhow::Result<Option<String>> {
        Ok(self.inner.doc.lock().instances.get(instance).cloned())
    }

    fn instances(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.inner.doc.lock().instances.keys().cloned().collect())
    }

    fn remove_instance(
        &self,
        instance: &str,
        also_clear_distributor: bool,
    ) -> anyhow::Result<()> {
        self.mutate(|doc| {
            doc.instances.remove(instance);
            if also_clear_distributor && doc.instances.is_empty() {
                doc.distributor = None;
                doc.distributor_ack = false;
            }
        })
    }

    fn remove_all_instances(&self) -> anyhow::Result<()> {
        self.mutate(|doc| doc.instances.clear())
    }

    fn save_distributor(&self, distributor: &str) -> anyhow::Result<()> {
        self.mutate(|doc| {
            if doc.distributor.as_deref() != Some(distributor) {
                doc.distributor_ack = false;
            }
            doc.distributor = Some(distributor.to_owned());
        })
    }

    fn try_get_distributor(&self) -> anyhow::Result<Option<String>> {
        Ok(self.inner.doc.lock().distributor.clone())
    }

    fn remove_distributor(&self) -> anyhow::Result<()> {
        self.mutate(|doc| {
            doc.distributor = None;
            doc.distributor_ack = false;
        })
    }

    fn distributor_ack(&self) -> anyhow::Result<bool> {
        Ok(self.inner.doc.lock().distributor_ack)
    }

    fn set_distributor_ack(&self, acked: bool) -> anyhow::Result<()> {
        self.mutate(|doc| doc.distributor_ack = acked)
    }

    fn save_no_distributor_ack(&self) -> anyhow::Result<()> {
        self.mutate(|doc| doc.no_distributor_ack = true)
    }

    fn no_distributor_ack(&self) -> anyhow::Result<bool> {
        Ok(self.inner.doc.lock().no_distributor_ack)
    }

    fn remove_no_distributor_ack(&self) -> anyhow::Result<()> {
        self.mutate(|doc| doc.no_distributor_ack = false)
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
