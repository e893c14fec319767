//! Local key/value cache
//!
//! Everything the client persists is a best-effort cache: the backend owns
//! reminders and notes, the profile store owns profiles. Each key holds one
//! JSON document.

use crate::{BraillError, Result};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};

/// Registry of all profiles
pub const KEY_PROFILES: &str = "profiles";
/// Flattened config of the active profile
pub const KEY_CONFIG: &str = "config";
/// Flattened personal info of the active profile
pub const KEY_PERSONAL_INFO: &str = "personalInfo";
/// Shared contact book
pub const KEY_CONTACTS: &str = "contacts";
/// Large font accessibility toggle
pub const KEY_LARGE_FONT: &str = "largeFontEnabled";

/// Raw JSON document storage
pub trait LocalStore: Send + Sync {
    /// Read the raw document stored under `key`, if any
    fn read_raw(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    fn write_raw(&self, key: &str, value: &str) -> Result<()>;
}

/// Typed helpers over a [`LocalStore`]
pub trait LocalStoreExt {
    /// Load and decode a value, `None` when missing or undecodable
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    /// Encode and store a value; failures are logged, never returned
    fn save<T: Serialize>(&self, key: &str, value: &T);
}

impl<S: LocalStore + ?Sized> LocalStoreExt for S {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read_raw(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    error!("[STORE] Discarding undecodable '{}': {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("[STORE] Failed to read '{}': {}", key, e);
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_string_pretty(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("[STORE] Failed to encode '{}': {}", key, e);
                return;
            }
        };
        if let Err(e) = self.write_raw(key, &encoded) {
            error!("[STORE] Failed to persist '{}': {}", key, e);
        }
    }
}

/// One `<key>.json` file per key inside a directory
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("[STORE] Using data directory {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory holding the documents
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalStore for JsonFileStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        // Readers never observe a partially written document
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
            .map_err(|e| BraillError::Storage(format!("{}: {}", path.display(), e)))
    }
}

/// In-process store, cloned handles share the same documents
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.docs.read().contains_key(key)
    }
}

impl LocalStore for MemoryStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.docs.read().get(key).cloned())
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        self.docs.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
