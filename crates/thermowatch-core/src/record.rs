//! Temperature records and validated manual input.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InputError;

/// One timestamped temperature observation.
///
/// Records are immutable once created. The serialized shape is
/// `{ "id": string, "value": number, "date": string }` with `date` in
/// RFC 3339 (UTC, millisecond precision).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    pub id: String,
    /// Degrees Celsius. Not range-checked here.
    pub value: f64,
    pub date: DateTime<Utc>,
}

impl TemperatureRecord {
    /// Create a record stamped with the current time and a fresh id.
    pub fn new(value: f64) -> Self {
        Self::at(value, Utc::now())
    }

    /// Create a record with an explicit timestamp (truncated to milliseconds).
    pub fn at(value: f64, date: DateTime<Utc>) -> Self {
        Self {
            id: new_record_id(),
            value,
            date: date.trunc_subsecs(3),
        }
    }
}

/// Generate a record id. UUID v4, never reused in practice.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// A finite temperature in degrees Celsius, the only accepted manual input.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Celsius(f64);

impl Celsius {
    pub fn new(value: f64) -> Result<Self, InputError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(InputError::NotFinite { value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Celsius {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InputError::Empty);
        }
        let value: f64 = trimmed.parse().map_err(|_| InputError::NotANumber {
            input: trimmed.to_string(),
        })?;
        Self::new(value)
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}
