//! Error types for the temperature engine.
//!
//! Each layer owns one error enum: storage failures ([`StoreError`]), rejected
//! manual input ([`InputError`]), refused exports ([`ExportError`]) and invalid
//! band bounds ([`BandError`]). None of them is fatal to the process; the
//! caller of the failed operation decides what to show.

use std::io;
use std::path::PathBuf;

/// Failure reading or writing a persisted slot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage medium could not be read or written.
    #[error("storage I/O failed for slot '{slot}' at {}", path.display())]
    Io {
        slot: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A slot holds content that does not parse as the expected shape.
    #[error("slot '{slot}' holds malformed data")]
    Corrupt {
        slot: String,
        #[source]
        source: serde_json::Error,
    },

    /// Records could not be serialized before writing.
    #[error("failed to serialize slot '{slot}'")]
    Serialize {
        slot: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend refused the operation (quota, closed medium, ...).
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Manual temperature entry that cannot become a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("no temperature given")]
    Empty,

    #[error("'{input}' is not a number")]
    NotANumber { input: String },

    #[error("{value} is not a finite temperature")]
    NotFinite { value: f64 },
}

/// Export request that produced no output.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// There are no records; nothing is written.
    #[error("no data to export")]
    NoData,

    #[error("failed to encode JSON export")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV export")]
    Csv(#[from] csv::Error),

    #[error("CSV export is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Invalid operating band bounds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BandError {
    #[error("band bounds must be finite (got [{min}, {max}])")]
    NotFinite { min: f64, max: f64 },

    #[error("band minimum {min} must be below maximum {max}")]
    Inverted { min: f64, max: f64 },
}
