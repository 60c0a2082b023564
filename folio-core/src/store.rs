//! File-backed key/value store with write-through semantics.
//!
//! Holds the two pieces of state that must survive restarts, the theme
//! choice and a pending offline submission. A JSON map is read once at
//! startup and rewritten on every change. The in-memory map is behind a
//! mutex since handler tasks on a multi-threaded runtime may share it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{home_relative, FolioError, Result};

/// Key under which the theme choice is persisted.
pub const THEME_KEY: &str = "theme";
/// Key under which a pending offline submission is persisted.
pub const PENDING_SUBMISSION_KEY: &str = "pending_offline_message";

/// Persistent key/value store, one JSON file on disk.
#[derive(Debug)]
pub struct KvStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl KvStore {
    /// Open (or create) the store at the default location, ~/.folio/store.json.
    pub fn open_default() -> Result<Self> {
        Self::open(home_relative(".folio/store.json"))
    }

    /// Open (or create) the store at `path`.
    ///
    /// An unreadable or corrupt file is treated as empty rather than fatal:
    /// losing the theme choice beats refusing to start. The corruption is
    /// logged for diagnostics.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(err) => {
                    warn!(path = ?path, error = %err, "store file corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Read and decode a value, `None` when absent.
    ///
    /// A value that exists but no longer decodes is surfaced as a
    /// [`FolioError::CorruptRecord`] so callers can decide whether to drop it.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let entries = self.entries.lock().expect("store lock poisoned");
        match entries.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| FolioError::corrupt_record(key, err.to_string())),
        }
    }

    /// Write a value and flush to disk before returning.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_value(value)
            .map_err(|err| FolioError::json(format!("store key '{key}'"), err))?;
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), encoded);
        self.flush(&entries)
    }

    /// Remove a key and flush. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        let entries = self.entries.lock().expect("store lock poisoned");
        entries.contains_key(key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|err| FolioError::json("store flush", err))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
