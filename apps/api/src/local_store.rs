use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

type Entries = BTreeMap<String, Value>;

/// Small JSON key/value file standing in for the browser's local storage.
/// Every write rewrites the whole file; memory only changes once the file has.
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<Entries>,
    /// Serializes writers so concurrent sets cannot drop each other's keys.
    writer: tokio::sync::Mutex<()>,
}

impl LocalStore {
    /// Opens the store at `path`. A missing file starts empty; an unreadable
    /// one is logged and replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Local store {} is corrupt, starting empty: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("reading local store {}", path.display()))
            }
        };
        debug!("Local store {} opened with {} keys", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    /// Entries that do not decode as `T` read as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)?
            .clone();
        serde_json::from_value(value)
            .map_err(|e| warn!("Ignoring unreadable local entry '{key}': {e}"))
            .ok()
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).context("serializing local entry")?;
        let _writer = self.writer.lock().await;

        let mut next = self.snapshot();
        next.insert(key.to_string(), value);
        self.commit(next).await
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        let _writer = self.writer.lock().await;

        let mut next = self.snapshot();
        if next.remove(key).is_none() {
            return Ok(());
        }
        self.commit(next).await
    }

    fn snapshot(&self) -> Entries {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Writes `next` to disk off the async executor, then swaps it in.
    async fn commit(&self, next: Entries) -> Result<()> {
        let raw = serde_json::to_string_pretty(&next)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_replacing(&path, &raw))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking failed writing local store: {e}"))??;

        *self.entries.lock().unwrap_or_else(|e| e.into_inner()) = next;
        Ok(())
    }
}

fn write_replacing(path: &Path, raw: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, raw).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))
}
