//! Bounded random-walk sample generator.
//!
//! Simulated temperatures move by at most one degree per step so the live
//! gauge and chart never jump. Only an empty history is seeded with a wide,
//! independent draw across the whole band.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BandError;

/// Largest step the walk takes in either direction, in °C.
pub const WALK_STEP: i32 = 1;

/// A closed temperature interval `[min, max]` with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingBand {
    min: f64,
    max: f64,
}

/// Band that simulated samples are clamped into.
pub const WALK_BAND: OperatingBand = OperatingBand {
    min: -5.0,
    max: 35.0,
};

/// Band the gauge display is normalized against.
pub const GAUGE_BAND: OperatingBand = OperatingBand {
    min: -10.0,
    max: 40.0,
};

impl OperatingBand {
    pub fn new(min: f64, max: f64) -> Result<Self, BandError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(BandError::NotFinite { min, max });
        }
        if min >= max {
            return Err(BandError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Saturate `value` into the band.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Position of `value` in the band, saturated into `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        ((self.clamp(value) - self.min) / self.span()).clamp(0.0, 1.0)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// One walk step: `previous + delta`, clamped into `band`.
pub fn walk_step(previous: f64, delta: i32, band: &OperatingBand) -> f64 {
    band.clamp(previous + f64::from(delta))
}

/// Produces simulated temperatures. Holds only its random source; the caller
/// passes the previous value in.
pub struct SampleGenerator {
    band: OperatingBand,
    rng: StdRng,
}

impl SampleGenerator {
    /// Generator over `band`, seeded from the OS.
    pub fn new(band: OperatingBand) -> Self {
        Self {
            band,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator for reproducible runs and tests.
    pub fn with_seed(band: OperatingBand, seed: u64) -> Self {
        Self {
            band,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn band(&self) -> &OperatingBand {
        &self.band
    }

    /// Next walk value after `previous`.
    pub fn next(&mut self, previous: f64) -> f64 {
        let delta = self.rng.random_range(-WALK_STEP..=WALK_STEP);
        walk_step(previous, delta, &self.band)
    }

    /// First value for an empty history: uniform over the whole band.
    ///
    /// Integral band bounds give integral values.
    pub fn cold_start(&mut self) -> f64 {
        let lo = self.band.min.ceil();
        let hi = self.band.max.floor();
        if lo <= hi {
            self.rng.random_range(lo as i64..=hi as i64) as f64
        } else {
            self.rng.random_range(self.band.min..=self.band.max)
        }
    }
}
