//! Key-value store backends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::StoreError;
use crate::traits::KeyValueStore;

/// Storage key of the quiz library.
pub const LIBRARY_KEY: &str = "quizforge.library";
/// Storage key of the user's settings.
pub const SETTINGS_KEY: &str = "quizforge.settings";

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Json {
                key: key.to_string(),
                source,
            })
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            key: key.to_string(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|source| StoreError::Io { path, source })
    }

    /// Renames `<key>.json` to `<key>.json.bak`, or `.bak.1`, `.bak.2` ...
    /// when earlier backups exist.
    fn backup(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let base = path.with_extension("json.bak");
        let mut target = base.clone();
        let mut n = 1;
        while target.exists() {
            let mut name = base.clone().into_os_string();
            name.push(format!(".{n}"));
            target = PathBuf::from(name);
            n += 1;
        }
        std::fs::rename(&path, &target).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Some(target.display().to_string()))
    }
}

/// In-memory store, mainly for tests.
///
/// Writes can be switched off to exercise persistence-failure handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    reject_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::Relaxed);
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("writes rejected".into()));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        values.insert(key.to_string(), value.clone());
        Ok(())
    }

    /// Moves the value to `<key>.bak`.
    fn backup(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.reject_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("writes rejected".into()));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        let Some(value) = values.remove(key) else {
            return Ok(None);
        };
        let target = format!("{key}.bak");
        values.insert(target.clone(), value);
        Ok(Some(target))
    }
}
