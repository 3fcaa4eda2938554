//! Simulation state machine.
//!
//! The controller owns the record store, the generator and the single
//! "last value" cell that both the manual path and the timer path write
//! through. Time is passed in by the hosting loop, which calls [`poll`] with
//! the current [`Instant`]; the controller fires at most one due tick per call.
//!
//! ```text
//!            start (sample now, arm timer)
//!    Idle ─────────────────────────────────▶ Running ──┐
//!      ▲                                        │      │ tick (sample, re-arm)
//!      └──────── stop / shutdown (disarm) ──────┘ ◀────┘
//! ```
//!
//! [`poll`]: SimulationController::poll

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::{DashboardConfig, SeedPolicy, SimulationConfig};
use crate::error::StoreError;
use crate::generator::SampleGenerator;
use crate::record::{Celsius, TemperatureRecord};
use crate::storage::FileBackend;
use crate::store::RecordStore;

/// Whether the simulation is producing samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    Idle,
    Running,
}

/// Armed recurring timer. Its presence is what "running" means.
#[derive(Debug, Clone, Copy)]
struct TickTimer {
    period: Duration,
    next_due: Instant,
}

/// Walk seeds, updated synchronously on every successful append.
#[derive(Debug, Clone, Copy, Default)]
struct SeedCell {
    latest: Option<f64>,
    simulated: Option<f64>,
}

impl SeedCell {
    fn for_policy(&self, policy: SeedPolicy) -> Option<f64> {
        match policy {
            SeedPolicy::FollowLatest => self.latest,
            SeedPolicy::SimulatedOnly => self.simulated.or(self.latest),
        }
    }
}

/// Timed producer of simulated temperatures.
pub struct SimulationController {
    store: RecordStore,
    generator: SampleGenerator,
    config: SimulationConfig,
    seed: SeedCell,
    timer: Option<TickTimer>,
}

impl SimulationController {
    /// Build a controller, seeding the walk from the stored history.
    pub fn new(
        store: RecordStore,
        generator: SampleGenerator,
        config: SimulationConfig,
    ) -> Result<Self, StoreError> {
        let latest = store.latest()?.map(|r| r.value);
        Ok(Self {
            store,
            generator,
            config,
            seed: SeedCell {
                latest,
                simulated: None,
            },
            timer: None,
        })
    }

    /// File-backed controller for `config.data_dir`.
    pub fn open(config: &DashboardConfig) -> Result<Self, StoreError> {
        let store = RecordStore::new(FileBackend::new(&config.data_dir));
        let generator = match config.simulation.rng_seed {
            Some(seed) => SampleGenerator::with_seed(config.walk_band, seed),
            None => SampleGenerator::new(config.walk_band),
        };
        debug!("opening history in {}", config.data_dir.display());
        Self::new(store, generator, config.simulation.clone())
    }

    pub fn state(&self) -> SimulationState {
        if self.timer.is_some() {
            SimulationState::Running
        } else {
            SimulationState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// When the next tick fires, if running.
    pub fn next_due(&self) -> Option<Instant> {
        self.timer.map(|t| t.next_due)
    }

    pub fn period(&self) -> Duration {
        self.config.period
    }

    pub fn seed_policy(&self) -> SeedPolicy {
        self.config.seed_policy
    }

    /// The value the next walk step would start from.
    pub fn latest_value(&self) -> Option<f64> {
        self.seed.for_policy(self.config.seed_policy)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Fresh snapshot of the history.
    pub fn records(&self) -> Result<Vec<TemperatureRecord>, StoreError> {
        self.store.read_all()
    }

    /// Enter `Running`: produce one sample immediately, then arm the timer.
    ///
    /// Starting while running is a no-op returning `Ok(None)`. If the first
    /// append fails the timer is still armed and the error is returned; the
    /// next tick tries again.
    pub fn start(&mut self, now: Instant) -> Result<Option<TemperatureRecord>, StoreError> {
        if self.timer.is_some() {
            return Ok(None);
        }

        let produced = self.produce();
        self.timer = Some(TickTimer {
            period: self.config.period,
            next_due: now + self.config.period,
        });
        self.persist_auto_mode(true);
        info!(
            "simulation started (period {:?}, seed policy {})",
            self.config.period, self.config.seed_policy
        );
        produced.map(Some)
    }

    /// Fire the pending tick if it is due at `now`.
    ///
    /// Returns `Ok(None)` when idle or not yet due. A failed append keeps the
    /// timer armed for the next period.
    pub fn poll(&mut self, now: Instant) -> Result<Option<TemperatureRecord>, StoreError> {
        let Some(timer) = self.timer.as_mut() else {
            return Ok(None);
        };
        if now < timer.next_due {
            return Ok(None);
        }
        timer.next_due = now + timer.period;

        match self.produce() {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("simulation tick failed: {e}");
                Err(e)
            }
        }
    }

    /// Enter `Idle` and remember that auto mode is off.
    pub fn stop(&mut self) {
        if self.timer.take().is_some() {
            self.persist_auto_mode(false);
            info!("simulation stopped");
        }
    }

    /// Disarm the timer at session teardown, keeping the persisted auto-mode
    /// flag so the next session resumes.
    pub fn shutdown(&mut self) {
        if self.timer.take().is_some() {
            debug!("simulation timer cancelled at shutdown");
        }
    }

    /// Start the simulation if the previous session left auto mode on.
    pub fn resume_if_requested(
        &mut self,
        now: Instant,
    ) -> Result<Option<TemperatureRecord>, StoreError> {
        if self.store.auto_mode()? {
            info!("resuming simulation from previous session");
            self.start(now)
        } else {
            Ok(None)
        }
    }

    /// Append one cold-start record when the history is empty.
    pub fn seed_if_empty(&mut self) -> Result<Option<TemperatureRecord>, StoreError> {
        if !self.store.is_empty()? {
            return Ok(None);
        }
        let record = TemperatureRecord::new(self.generator.cold_start());
        self.store.append(&record)?;
        self.seed.latest = Some(record.value);
        Ok(Some(record))
    }

    /// Manual entry. Allowed in any state; never touches the timer.
    pub fn add_manual(&mut self, value: Celsius) -> Result<TemperatureRecord, StoreError> {
        let record = TemperatureRecord::new(value.value());
        self.store.append(&record)?;
        self.seed.latest = Some(record.value);
        debug!("manual reading {value} recorded");
        Ok(record)
    }

    /// Remove the whole history. The walk seed is kept.
    pub fn clear_history(&mut self) -> Result<(), StoreError> {
        self.store.clear()
    }

    /// Value the next walk step starts from. `FollowLatest` re-reads the
    /// store so readings appended by another writer are picked up; the cell
    /// only answers once the history is empty.
    fn walk_seed(&self) -> Result<Option<f64>, StoreError> {
        match self.config.seed_policy {
            SeedPolicy::FollowLatest => Ok(self
                .store
                .latest()?
                .map(|r| r.value)
                .or(self.seed.latest)),
            SeedPolicy::SimulatedOnly => Ok(self.seed.for_policy(SeedPolicy::SimulatedOnly)),
        }
    }

    fn produce(&mut self) -> Result<TemperatureRecord, StoreError> {
        let value = match self.walk_seed()? {
            Some(previous) => self.generator.next(previous),
            None => self.generator.cold_start(),
        };
        let record = TemperatureRecord::new(value);
        self.store.append(&record)?;
        self.seed.latest = Some(value);
        self.seed.simulated = Some(value);
        Ok(record)
    }

    fn persist_auto_mode(&mut self, enabled: bool) {
        if let Err(e) = self.store.set_auto_mode(enabled) {
            warn!("could not persist auto mode = {enabled}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::generator::WALK_BAND;
    use crate::storage::{MemoryBackend, StorageBackend};
    use crate::store::AUTO_MODE_SLOT;

    const PERIOD: Duration = Duration::from_secs(3);

    fn controller_with(
        backend: impl StorageBackend + 'static,
        policy: SeedPolicy,
    ) -> SimulationController {
        let config = SimulationConfig {
            period: PERIOD,
            seed_policy: policy,
            rng_seed: Some(11),
        };
        SimulationController::new(
            RecordStore::new(backend),
            SampleGenerator::with_seed(WALK_BAND, 11),
            config,
        )
        .unwrap()
    }

    fn controller() -> SimulationController {
        controller_with(MemoryBackend::new(), SeedPolicy::FollowLatest)
    }

    /// Backend whose writes can be switched to fail.
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_writes: Arc<AtomicBool>,
    }

    impl StorageBackend for FlakyBackend {
        fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError> {
            self.inner.read_slot(slot)
        }

        fn write_slot(&mut self, slot: &str, contents: &str) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable {
                    reason: "quota exceeded".to_string(),
                });
            }
            self.inner.write_slot(slot, contents)
        }

        fn remove_slot(&mut self, slot: &str) -> Result<(), StoreError> {
            self.inner.remove_slot(slot)
        }
    }

    #[test]
    fn starts_idle() {
        let c = controller();
        assert_eq!(c.state(), SimulationState::Idle);
        assert_eq!(c.next_due(), None);
    }

    #[test]
    fn cold_start_produces_one_in_band_record_before_any_tick() {
        let mut c = controller();
        let t0 = Instant::now();
        let first = c.start(t0).unwrap().unwrap();

        assert!(WALK_BAND.contains(first.value));
        assert_eq!(c.records().unwrap().len(), 1);
        assert_eq!(c.state(), SimulationState::Running);
        assert_eq!(c.next_due(), Some(t0 + PERIOD));
        assert!(c.poll(t0 + PERIOD / 2).unwrap().is_none());
        assert_eq!(c.records().unwrap().len(), 1);
    }

    #[test]
    fn start_walks_from_existing_history() {
        let mut store = RecordStore::new(MemoryBackend::new());
        store.append(&TemperatureRecord::new(12.0)).unwrap();
        let mut c = SimulationController::new(
            store,
            SampleGenerator::with_seed(WALK_BAND, 5),
            SimulationConfig::default(),
        )
        .unwrap();

        let first = c.start(Instant::now()).unwrap().unwrap();
        assert!((first.value - 12.0).abs() <= 1.0);
        assert_eq!(c.records().unwrap().len(), 2);
    }

    #[test]
    fn ticks_chain_from_previous_sample() {
        let mut c = controller();
        let t0 = Instant::now();
        let mut previous = c.start(t0).unwrap().unwrap().value;

        for i in 1..=20u32 {
            let record = c.poll(t0 + PERIOD * i).unwrap().unwrap();
            assert!((record.value - previous).abs() <= 1.0);
            assert!(WALK_BAND.contains(record.value));
            previous = record.value;
        }
        assert_eq!(c.records().unwrap().len(), 21);
    }

    #[test]
    fn late_poll_fires_once_and_rearms_from_now() {
        let mut c = controller();
        let t0 = Instant::now();
        c.start(t0).unwrap();

        let late = t0 + PERIOD * 5;
        assert!(c.poll(late).unwrap().is_some());
        assert!(c.poll(late).unwrap().is_none());
        assert_eq!(c.next_due(), Some(late + PERIOD));
        assert_eq!(c.records().unwrap().len(), 2);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut c = controller();
        let t0 = Instant::now();
        c.start(t0).unwrap();
        assert!(c.start(t0 + PERIOD).unwrap().is_none());
        assert_eq!(c.records().unwrap().len(), 1);
        assert_eq!(c.next_due(), Some(t0 + PERIOD));
    }

    #[test]
    fn stop_cancels_future_ticks() {
        let mut c = controller();
        let t0 = Instant::now();
        c.start(t0).unwrap();
        c.stop();

        assert_eq!(c.state(), SimulationState::Idle);
        assert_eq!(c.next_due(), None);
        for i in 1..=5u32 {
            assert!(c.poll(t0 + PERIOD * i).unwrap().is_none());
        }
        assert_eq!(c.records().unwrap().len(), 1);

        // Stopping again is harmless.
        c.stop();
        assert!(!c.is_running());
    }

    #[test]
    fn manual_add_reseeds_next_tick_with_follow_latest() {
        let mut c = controller_with(MemoryBackend::new(), SeedPolicy::FollowLatest);
        let t0 = Instant::now();
        c.start(t0).unwrap();

        let manual = Celsius::new(30.0).unwrap();
        c.add_manual(manual).unwrap();
        assert!(c.is_running());
        assert_eq!(c.next_due(), Some(t0 + PERIOD));

        let tick = c.poll(t0 + PERIOD).unwrap().unwrap();
        assert!((tick.value - 30.0).abs() <= 1.0, "tick {}", tick.value);
    }

    #[test]
    fn manual_add_ignored_by_walk_with_simulated_only() {
        let mut c = controller_with(MemoryBackend::new(), SeedPolicy::SimulatedOnly);
        let t0 = Instant::now();
        let simulated = c.start(t0).unwrap().unwrap().value;

        // Far enough from any cold start value that the two policies differ.
        let manual = if simulated > 15.0 { -100.0 } else { 100.0 };
        c.add_manual(Celsius::new(manual).unwrap()).unwrap();

        let tick = c.poll(t0 + PERIOD).unwrap().unwrap();
        assert!((tick.value - simulated).abs() <= 1.0);
    }

    #[test]
    fn simulated_only_uses_manual_value_when_nothing_simulated_yet() {
        let mut c = controller_with(MemoryBackend::new(), SeedPolicy::SimulatedOnly);
        c.add_manual(Celsius::new(8.0).unwrap()).unwrap();
        let first = c.start(Instant::now()).unwrap().unwrap();
        assert!((first.value - 8.0).abs() <= 1.0);
    }

    #[test]
    fn manual_add_while_idle_seeds_next_start() {
        let mut c = controller();
        c.add_manual(Celsius::new(-2.0).unwrap()).unwrap();
        assert_eq!(c.latest_value(), Some(-2.0));
        let first = c.start(Instant::now()).unwrap().unwrap();
        assert!((first.value + 2.0).abs() <= 1.0);
    }

    #[test]
    fn failed_tick_does_not_wedge_the_loop() {
        let fail = Arc::new(AtomicBool::new(false));
        let backend = FlakyBackend {
            inner: MemoryBackend::new(),
            fail_writes: Arc::clone(&fail),
        };
        let mut c = controller_with(backend, SeedPolicy::FollowLatest);
        let t0 = Instant::now();
        c.start(t0).unwrap();

        fail.store(true, Ordering::SeqCst);
        assert!(c.poll(t0 + PERIOD).is_err());
        assert!(c.is_running());
        assert_eq!(c.records().unwrap().len(), 1);

        fail.store(false, Ordering::SeqCst);
        assert!(c.poll(t0 + PERIOD * 2).unwrap().is_some());
        assert_eq!(c.records().unwrap().len(), 2);
    }

    #[test]
    fn failed_first_append_still_arms_timer() {
        let fail = Arc::new(AtomicBool::new(true));
        let backend = FlakyBackend {
            inner: MemoryBackend::new(),
            fail_writes: Arc::clone(&fail),
        };
        let mut c = controller_with(backend, SeedPolicy::FollowLatest);
        let t0 = Instant::now();
        assert!(c.start(t0).is_err());
        assert!(c.is_running());

        fail.store(false, Ordering::SeqCst);
        assert!(c.poll(t0 + PERIOD).unwrap().is_some());
    }

    #[test]
    fn start_and_stop_persist_auto_mode() {
        let mut c = controller();
        assert!(!c.store().auto_mode().unwrap());
        c.start(Instant::now()).unwrap();
        assert!(c.store().auto_mode().unwrap());
        c.stop();
        assert!(!c.store().auto_mode().unwrap());
    }

    #[test]
    fn shutdown_keeps_auto_mode_for_resume() {
        let mut c = controller();
        c.start(Instant::now()).unwrap();
        c.shutdown();
        assert!(!c.is_running());
        assert!(c.store().auto_mode().unwrap());
    }

    #[test]
    fn resume_if_requested_starts_only_when_flag_set() {
        let mut idle = controller();
        assert!(idle.resume_if_requested(Instant::now()).unwrap().is_none());
        assert!(!idle.is_running());

        let backend = MemoryBackend::new().with_slot(AUTO_MODE_SLOT, "true");
        let mut resumed = controller_with(backend, SeedPolicy::FollowLatest);
        assert!(resumed.resume_if_requested(Instant::now()).unwrap().is_some());
        assert!(resumed.is_running());
    }

    #[test]
    fn seed_if_empty_only_seeds_empty_history() {
        let mut c = controller();
        let seeded = c.seed_if_empty().unwrap().unwrap();
        assert!(WALK_BAND.contains(seeded.value));
        assert_eq!(c.latest_value(), Some(seeded.value));
        assert!(c.seed_if_empty().unwrap().is_none());
        assert_eq!(c.records().unwrap().len(), 1);
    }

    #[test]
    fn clear_history_keeps_running_and_seed() {
        let mut c = controller();
        let t0 = Instant::now();
        let first = c.start(t0).unwrap().unwrap();
        c.clear_history().unwrap();
        assert!(c.records().unwrap().is_empty());
        assert!(c.is_running());

        let tick = c.poll(t0 + PERIOD).unwrap().unwrap();
        assert!((tick.value - first.value).abs() <= 1.0);
        assert_eq!(c.records().unwrap().len(), 1);
    }
}
