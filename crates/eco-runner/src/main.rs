//! Runs an ecosystem simulation from the command line.

mod engine;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use eco_core::{RunnerConfig, WorldConfig};
use eco_world::World;
use engine::{Engine, RunOutcome};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

/// How often the main task reports progress from the shared snapshot
const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(author, version, about = "Grid ecosystem simulation", long_about = None)]
struct Args {
    /// World configuration file (JSON); defaults are used when omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the random seed from the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Number of days to simulate, 0 runs until interrupted
    #[arg(long, value_name = "DAYS")]
    days: Option<u64>,

    /// Pause between days
    #[arg(long, value_name = "MILLIS")]
    interval_ms: Option<u64>,

    /// Log population statistics every N days, 0 disables
    #[arg(long, value_name = "DAYS")]
    stats_every: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn world_config(&self) -> Result<WorldConfig> {
        let mut config = match &self.config {
            Some(path) => WorldConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => WorldConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }

    fn runner_config(&self) -> RunnerConfig {
        let defaults = RunnerConfig::default();
        RunnerConfig {
            day_interval_ms: self.interval_ms.unwrap_or(defaults.day_interval_ms),
            max_days: match self.days {
                Some(0) => None,
                Some(days) => Some(days),
                None => defaults.max_days,
            },
            stats_interval_days: self.stats_every.unwrap_or(defaults.stats_interval_days),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_logging(args.log_json)?;

    let world_config = args.world_config()?;
    let runner_config = args.runner_config();

    info!(
        event = "run_started",
        seed = world_config.seed,
        width = world_config.map.width,
        height = world_config.map.height,
        animals = world_config.start_animals,
        max_days = ?runner_config.max_days,
        "Starting ecosystem simulation"
    );

    let world = World::new(world_config)?;
    let mut engine = Engine::new(world, runner_config);
    let stop = engine.stop_handle();
    let latest = engine.snapshot_handle();

    let mut task = tokio::task::spawn_blocking(move || engine.run());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut progress = interval(PROGRESS_INTERVAL);
    progress.tick().await;

    let outcome = loop {
        tokio::select! {
            joined = &mut task => break joined??,
            _ = &mut shutdown, if !stop.load(Ordering::Relaxed) => {
                info!("Stopping after the current day");
                stop.store(true, Ordering::Relaxed);
            }
            _ = progress.tick() => {
                if let Some(snapshot) = latest.read().as_ref() {
                    debug!(
                        day = snapshot.day,
                        animals = snapshot.animal_count(),
                        plants = snapshot.plant_count(),
                        "Progress"
                    );
                }
            }
        }
    };

    log_outcome(&outcome);
    Ok(())
}

fn log_outcome(outcome: &RunOutcome) {
    let summary = &outcome.summary;
    info!(
        event = "run_finished",
        days = outcome.days_run,
        interrupted = outcome.interrupted,
        elapsed_secs = outcome.elapsed.as_secs_f64(),
        births = summary.births,
        deaths = summary.deaths,
        average_animals = summary.average_animals,
        average_plants = summary.average_plants,
        average_energy = summary.average_energy,
        average_lifespan = summary.average_lifespan,
        average_children = summary.average_children,
        "Simulation finished"
    );

    if let Some(report) = &outcome.last_report {
        debug!(?report, "Last day");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
