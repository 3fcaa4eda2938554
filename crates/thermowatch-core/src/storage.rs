//! Named-slot storage backends.
//!
//! A backend is a tiny key/value medium holding serialized strings under slot
//! names, the same model as browser local storage. [`RecordStore`] sits on top
//! of one and owns the slot layout.
//!
//! # Storage Format
//!
//! [`FileBackend`] maps every slot to `<dir>/<slot>.json`. Writes go to a
//! temporary file in the same directory which is then renamed over the slot,
//! so a reader never observes a half-written slot.
//!
//! [`RecordStore`]: crate::store::RecordStore

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::StoreError;

/// A medium that stores whole strings under slot names.
pub trait StorageBackend: Send {
    /// Read a slot. `Ok(None)` means the slot was never written or was removed.
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError>;

    /// Replace the content of a slot.
    fn write_slot(&mut self, slot: &str, contents: &str) -> Result<(), StoreError>;

    /// Remove a slot. Removing an absent slot succeeds.
    fn remove_slot(&mut self, slot: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Process-local backend, used by tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot, e.g. with data written by another program.
    pub fn with_slot(mut self, slot: &str, contents: &str) -> Self {
        self.slots.insert(slot.to_string(), contents.to_string());
        self
    }
}

impl StorageBackend for MemoryBackend {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write_slot(&mut self, slot: &str, contents: &str) -> Result<(), StoreError> {
        self.slots.insert(slot.to_string(), contents.to_string());
        Ok(())
    }

    fn remove_slot(&mut self, slot: &str) -> Result<(), StoreError> {
        self.slots.remove(slot);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// Durable backend keeping one JSON file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Use `dir` for slot files. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    fn io_error(&self, slot: &str, source: io::Error) -> StoreError {
        StoreError::Io {
            slot: slot.to_string(),
            path: self.slot_path(slot),
            source,
        }
    }
}

impl StorageBackend for FileBackend {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(slot, e)),
        }
    }

    fn write_slot(&mut self, slot: &str, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| self.io_error(slot, e))?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| self.io_error(slot, e))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(slot, e))?;
        tmp.persist(self.slot_path(slot))
            .map_err(|e| self.io_error(slot, e.error))?;
        Ok(())
    }

    fn remove_slot(&mut self, slot: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(slot, e)),
        }
    }
}
