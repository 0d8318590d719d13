//! Key-value snapshot storage for progression and range charts.
//!
//! Only the durable parts are written: the progression numbers and the chart
//! store. The current scenario and the bankruptcy flag are rebuilt on load.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::training_engine::{
    error::PersistError,
    progression::{ProgressionEngine, ProgressionSnapshot},
    range_chart::{RangeChartSnapshot, RangeChartStore},
};

pub const PROGRESSION_KEY: &str = "poker-lingo-storage";
pub const RANGES_KEY: &str = "poker-lingo-ranges";

/// Opaque string storage keyed by name.
pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Replace the value under `key` in one step; readers never observe a
    /// partial write.
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::Io(path, e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|e| PersistError::Io(self.dir.clone(), e))?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| PersistError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| PersistError::Io(path.clone(), e))
    }
}

/// Write progression and charts.
pub fn save_session(engine: &ProgressionEngine, store: &dyn SnapshotStore) -> Result<(), PersistError> {
    store.save(PROGRESSION_KEY, &serde_json::to_string(&engine.snapshot())?)?;
    store.save(RANGES_KEY, &serde_json::to_string(&engine.charts().snapshot())?)?;
    Ok(())
}

/// Merge stored snapshots into `engine`. Missing keys leave the engine as it
/// is; unreadable snapshots are logged and skipped.
pub fn restore_session(engine: &mut ProgressionEngine, store: &dyn SnapshotStore) -> Result<(), PersistError> {
    if let Some(snapshot) = decode::<ProgressionSnapshot>(store, PROGRESSION_KEY)? {
        engine.restore(snapshot);
    }
    if let Some(snapshot) = decode::<RangeChartSnapshot>(store, RANGES_KEY)? {
        *engine.charts_mut() = RangeChartStore::from_snapshot(snapshot);
    }
    Ok(())
}

fn decode<T: serde::de::DeserializeOwned>(
    store: &dyn SnapshotStore,
    key: &str,
) -> Result<Option<T>, PersistError> {
    let Some(text) = store.load(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("ignoring corrupt snapshot {key}: {e}");
            Ok(None)
        }
    }
}
