//! # thermowatch-core
//!
//! Local temperature logbook with a smooth random-walk simulator.
//!
//! `thermowatch-core` keeps an append-only history of timestamped temperature
//! readings, produces simulated readings on a fixed cadence, and projects the
//! history into gauge and chart data for whatever renders it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Instant;
//! use thermowatch_core::{
//!     GAUGE_BAND, MemoryBackend, RecordStore, SampleGenerator, SimulationConfig,
//!     SimulationController, WALK_BAND, gauge_state,
//! };
//!
//! let store = RecordStore::new(MemoryBackend::new());
//! let generator = SampleGenerator::new(WALK_BAND);
//! let mut controller =
//!     SimulationController::new(store, generator, SimulationConfig::default()).unwrap();
//!
//! // First sample is produced immediately; later ones come from `poll`.
//! controller.start(Instant::now()).unwrap();
//!
//! let records = controller.records().unwrap();
//! let gauge = gauge_state(&records, &GAUGE_BAND);
//! println!("{:.1}°C ({:.0}% of the gauge)", gauge.value, gauge.fill * 100.0);
//! ```
//!
//! ## Architecture
//!
//! Timer tick or manual entry → SimulationController → RecordStore (append)
//! → snapshot → projector → gauge / chart
//!
//! The [`RecordStore`] is the single owner of the persisted history and sits
//! on a [`StorageBackend`] (files on disk or memory). The
//! [`SimulationController`] is a synchronous state machine: the hosting loop
//! passes the current instant to [`SimulationController::poll`] and gets back
//! at most one new record.

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod generator;
pub mod projector;
pub mod record;
pub mod storage;
pub mod store;

pub use config::{
    DEFAULT_DATA_DIR, DEFAULT_TICK_PERIOD, DashboardConfig, SeedPolicy, SimulationConfig,
};
pub use controller::{SimulationController, SimulationState};
pub use error::{BandError, ExportError, InputError, StoreError};
pub use export::{ExportFormat, export, export_in};
pub use generator::{GAUGE_BAND, OperatingBand, SampleGenerator, WALK_BAND, WALK_STEP, walk_step};
pub use projector::{
    ArcGeometry, ChartPoint, ChartSeries, GaugeState, chart_series, chart_series_in, gauge_state,
};
pub use record::{Celsius, TemperatureRecord};
pub use storage::{FileBackend, MemoryBackend, StorageBackend};
pub use store::{AUTO_MODE_SLOT, RECORDS_SLOT, RecordStore};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
