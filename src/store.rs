use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::data::prefs::{Prefs, DEFAULT_PREFS};
use crate::error::StoreError;
use crate::snapshot::Snapshot;

/// Persistence for the single application snapshot.
pub trait SnapshotStore {
    /// `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;

    fn default_prefs(&self) -> Prefs {
        DEFAULT_PREFS
    }
}

/// Keeps the snapshot as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> JsonFileStore {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let snapshot = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
            }
        }

        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, snapshot)?;
        out.flush().map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Holds the serialized snapshot in memory. Values still go through JSON so
/// they behave like the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    text: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn with_snapshot(snapshot: &Snapshot) -> Result<MemoryStore, StoreError> {
        let store = MemoryStore::new();
        store.save(snapshot)?;
        Ok(store)
    }

    /// A store whose stored text is `text`, as written by an earlier session.
    pub fn from_text(text: impl Into<String>) -> MemoryStore {
        MemoryStore {
            text: Mutex::new(Some(text.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        match self.raw() {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = serde_json::to_string(snapshot)?;
        *self
            .text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self
            .text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
