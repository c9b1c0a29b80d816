//! Drives a world day after day on a dedicated thread.

use eco_core::{Result, RunnerConfig};
use eco_world::{DayReport, MapSnapshot, RunSummary, World, WorldStatistics};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Latest map view, replaced after every completed day
pub type SharedSnapshot = Arc<RwLock<Option<MapSnapshot>>>;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub days_run: u64,
    /// True when the stop flag ended the run before `max_days`
    pub interrupted: bool,
    pub last_report: Option<DayReport>,
    pub summary: RunSummary,
    pub elapsed: Duration,
}

pub struct Engine {
    world: World,
    statistics: WorldStatistics,
    config: RunnerConfig,
    stop: Arc<AtomicBool>,
    latest: SharedSnapshot,
}

impl Engine {
    pub fn new(world: World, config: RunnerConfig) -> Self {
        let latest = Arc::new(RwLock::new(Some(world.snapshot())));
        Self {
            world,
            statistics: WorldStatistics::new(),
            config,
            stop: Arc::new(AtomicBool::new(false)),
            latest,
        }
    }

    /// Setting the flag ends the run once the current day has finished.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn snapshot_handle(&self) -> SharedSnapshot {
        Arc::clone(&self.latest)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    #[instrument(skip(self), fields(seed = self.world.config().seed))]
    pub fn run(&mut self) -> Result<RunOutcome> {
        let start = Instant::now();
        let interval = Duration::from_millis(self.config.day_interval_ms);
        let mut days_run = 0;
        let mut last_report = None;
        let mut interrupted = false;

        loop {
            if self.stop.load(Ordering::Relaxed) {
                interrupted = true;
                break;
            }
            if self.config.max_days.is_some_and(|max| days_run >= max) {
                break;
            }

            let report = self.world.simulate_day(&mut self.statistics)?;
            days_run += 1;
            debug!(
                day = report.day,
                deaths = report.deaths,
                births = report.births,
                plants_eaten = report.plants_eaten,
                "Day complete"
            );
            last_report = Some(report);

            *self.latest.write() = Some(self.world.snapshot());

            if self.config.stats_interval_days > 0
                && self.world.day() % self.config.stats_interval_days == 0
            {
                self.log_statistics();
            }

            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }

        Ok(RunOutcome {
            days_run,
            interrupted,
            last_report,
            summary: self.statistics.summary(),
            elapsed: start.elapsed(),
        })
    }

    fn log_statistics(&self) {
        self.world.log_census();
        info!(
            event = "lifecycle_statistics",
            day = self.world.day(),
            births = self.statistics.births(),
            deaths = self.statistics.deaths(),
            average_lifespan = self.statistics.average_lifespan(),
            "Lifecycle statistics"
        );
    }
}
