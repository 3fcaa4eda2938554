//! Append-only record store over a named-slot backend.
//!
//! The whole history lives in one slot as a JSON array. Appends rewrite the
//! slot (read-all, push, write-all); there is no per-record durability and the
//! last writer wins. A second slot carries the auto-mode resume flag.

use log::{debug, warn};

use crate::error::StoreError;
use crate::record::TemperatureRecord;
use crate::storage::StorageBackend;

/// Slot holding the serialized record sequence.
pub const RECORDS_SLOT: &str = "temperature_history";

/// Slot holding `true`/`false`: resume the simulation on next launch.
pub const AUTO_MODE_SLOT: &str = "auto_mode";

/// Exclusive owner of the persisted temperature history.
pub struct RecordStore {
    backend: Box<dyn StorageBackend>,
}

impl RecordStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Append one record to the end of the history.
    pub fn append(&mut self, record: &TemperatureRecord) -> Result<(), StoreError> {
        let mut records = self.read_all()?;
        records.push(record.clone());
        self.write_all(&records)?;
        debug!(
            "appended record {} ({}°C), {} total",
            record.id,
            record.value,
            records.len()
        );
        Ok(())
    }

    /// Full history, oldest first. Empty if nothing was ever stored.
    ///
    /// A blank slot reads as empty. Malformed content is an error for this
    /// call, never an empty history.
    pub fn read_all(&self) -> Result<Vec<TemperatureRecord>, StoreError> {
        match self.backend.read_slot(RECORDS_SLOT)? {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                slot: RECORDS_SLOT.to_string(),
                source,
            }),
        }
    }

    /// Most recent record, if any.
    pub fn latest(&self) -> Result<Option<TemperatureRecord>, StoreError> {
        Ok(self.read_all()?.pop())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read_all()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Remove every record. Clearing an empty store succeeds.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove_slot(RECORDS_SLOT)?;
        debug!("cleared temperature history");
        Ok(())
    }

    /// Whether the simulation should resume on next launch.
    ///
    /// Anything other than a stored `true` reads as `false`.
    pub fn auto_mode(&self) -> Result<bool, StoreError> {
        let raw = self.backend.read_slot(AUTO_MODE_SLOT)?;
        Ok(matches!(raw.as_deref().map(str::trim), Some("true")))
    }

    pub fn set_auto_mode(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.backend
            .write_slot(AUTO_MODE_SLOT, if enabled { "true" } else { "false" })
    }

    fn write_all(&mut self, records: &[TemperatureRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records).map_err(|source| StoreError::Serialize {
            slot: RECORDS_SLOT.to_string(),
            source,
        })?;
        self.backend.write_slot(RECORDS_SLOT, &json).inspect_err(|e| {
            warn!("failed to write {RECORDS_SLOT}: {e}");
        })
    }
}
