//! Persisted form of a store and the storage backends that hold it.
//!
//! A [`Snapshot`] maps each `group.name` key to its raw input, resolved value
//! and type. Labels and grouping are not persisted; they always come from the
//! catalog the snapshot is restored over.
//!
//! ```json
//! {
//!   "attributes": {
//!     "colors.primary": {
//!       "rawInput": "{colors.highlight2}",
//!       "resolvedValue": "#ffab40",
//!       "type": "color"
//!     }
//!   }
//! }
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::attribute::AttrType;
use crate::error::StorageError;
use crate::key::AttrKey;

/// Persisted state of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub raw_input: String,
    pub resolved_value: String,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
}

/// Persisted state of a whole store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub attributes: BTreeMap<AttrKey, SnapshotEntry>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_yaml(&self) -> Result<String, StorageError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, StorageError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Where snapshots are kept between sessions.
pub trait SnapshotStorage {
    /// Returns the stored snapshot, or `None` if nothing has been saved.
    fn load(&self) -> Result<Option<Snapshot>, StorageError>;

    /// Replaces the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError>;

    /// Removes the stored snapshot. Clearing empty storage is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory storage, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: RefCell<Option<Snapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        *self.snapshot.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.snapshot.borrow_mut().take();
        Ok(())
    }
}

/// Storage in a JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Snapshot::from_json(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, snapshot.to_json()?).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
