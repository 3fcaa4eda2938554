//! Dashboard configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::generator::{GAUGE_BAND, OperatingBand, WALK_BAND};

/// Interval between simulated samples.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(3);

/// Default directory for slot files, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".thermowatch";

/// Which value the next simulated step starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Any append, manual or simulated, reseeds the walk.
    #[default]
    FollowLatest,
    /// The walk continues from the last simulated value; manual entries
    /// only seed it when nothing has been simulated yet.
    SimulatedOnly,
}

impl fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FollowLatest => write!(f, "latest"),
            Self::SimulatedOnly => write!(f, "simulated"),
        }
    }
}

impl FromStr for SeedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" | "follow-latest" => Ok(Self::FollowLatest),
            "simulated" | "simulated-only" => Ok(Self::SimulatedOnly),
            other => Err(format!(
                "unknown seed policy '{other}' (expected 'latest' or 'simulated')"
            )),
        }
    }
}

/// Settings for the simulation state machine.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub period: Duration,
    pub seed_policy: SeedPolicy,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_TICK_PERIOD,
            seed_policy: SeedPolicy::default(),
            rng_seed: None,
        }
    }
}

/// Everything a hosting surface needs to build the engine.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub walk_band: OperatingBand,
    pub gauge_band: OperatingBand,
    pub simulation: SimulationConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            walk_band: WALK_BAND,
            gauge_band: GAUGE_BAND,
            simulation: SimulationConfig::default(),
        }
    }
}
