//! Population statistics gathered from world events.

use crate::event::{Census, WorldEvent, WorldObserver};
use eco_core::Genotype;
use serde::{Deserialize, Serialize};

/// One row of statistics, recorded at each census
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStatistics {
    pub day: u64,
    pub animals: usize,
    pub plants: usize,
    pub average_energy: f64,
    /// Mean lifespan in days of every animal that died so far
    pub average_lifespan: f64,
    pub average_children: f64,
    pub dominant_genotype: Option<Genotype>,
}

/// Means of every numeric column over a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub days: u64,
    pub births: u64,
    pub deaths: u64,
    pub average_animals: f64,
    pub average_plants: f64,
    pub average_energy: f64,
    pub average_lifespan: f64,
    pub average_children: f64,
}

/// Observer that keeps the statistics history of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldStatistics {
    history: Vec<DayStatistics>,
    deaths: u64,
    total_lifespan: u64,
    births: u64,
    days: u64,
}

impl WorldStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[DayStatistics] {
        &self.history
    }

    pub fn latest(&self) -> Option<&DayStatistics> {
        self.history.last()
    }

    /// Completed days seen
    pub fn days(&self) -> u64 {
        self.days
    }

    pub fn births(&self) -> u64 {
        self.births
    }

    pub fn deaths(&self) -> u64 {
        self.deaths
    }

    /// Mean lifespan of dead animals, 0 before the first death
    pub fn average_lifespan(&self) -> f64 {
        if self.deaths == 0 {
            0.0
        } else {
            self.total_lifespan as f64 / self.deaths as f64
        }
    }

    fn record_census(&mut self, census: &Census) {
        self.history.push(DayStatistics {
            day: census.day,
            animals: census.animals,
            plants: census.plants,
            average_energy: census.average_energy,
            average_lifespan: self.average_lifespan(),
            average_children: census.average_children,
            dominant_genotype: census.dominant_genotype.clone(),
        });
    }

    pub fn summary(&self) -> RunSummary {
        let rows = self.history.len();
        let mean = |column: fn(&DayStatistics) -> f64| {
            if rows == 0 {
                0.0
            } else {
                self.history.iter().map(column).sum::<f64>() / rows as f64
            }
        };

        RunSummary {
            days: self.days,
            births: self.births,
            deaths: self.deaths,
            average_animals: mean(|row| row.animals as f64),
            average_plants: mean(|row| row.plants as f64),
            average_energy: mean(|row| row.average_energy),
            average_lifespan: mean(|row| row.average_lifespan),
            average_children: mean(|row| row.average_children),
        }
    }
}

impl WorldObserver for WorldStatistics {
    fn on_event(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::AnimalDied { day, birth_day, .. } => {
                self.deaths += 1;
                self.total_lifespan += day.saturating_sub(*birth_day);
            }
            WorldEvent::Census(census) => self.record_census(census),
            WorldEvent::AnimalBorn { .. } => self.births += 1,
            WorldEvent::AnimalsBred { .. } => {}
            WorldEvent::DayAdvanced { day } => self.days = *day,
        }
    }
}
