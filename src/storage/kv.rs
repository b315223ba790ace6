use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::foundation::error::{ColorLensError, ColorLensResult};

/// Key-value persistence contract. Both operations are idempotent.
pub trait KeyValueStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> ColorLensResult<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> ColorLensResult<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ColorLensResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> ColorLensResult<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// Every `set` rewrites the whole file through a sibling temp file and a rename, so a crash
/// never leaves a half-written document behind. A missing or empty file reads as empty.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ColorLensResult<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(ColorLensError::storage(format!(
                    "read '{}': {e}",
                    self.path.display()
                )));
            }
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(ColorLensError::storage(format!(
                "'{}' does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> ColorLensResult<()> {
        let bytes = serde_json::to_vec_pretty(map)?;
        let io_err = |op: &str, p: &Path, e: std::io::Error| {
            ColorLensError::storage(format!("{op} '{}': {e}", p.display()))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_err("create directory", parent, e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp).map_err(|e| io_err("create", &tmp, e))?;
        file.write_all(&bytes)
            .map_err(|e| io_err("write", &tmp, e))?;
        file.sync_all().map_err(|e| io_err("sync", &tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| io_err("rename", &tmp, e))?;

        tracing::debug!(path = %self.path.display(), keys = map.len(), "wrote store");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> ColorLensResult<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> ColorLensResult<()> {
        let mut map = self.read_all()?;
        map.insert(key.to_owned(), value);
        self.write_all(&map)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/storage/kv.rs"]
mod tests;
