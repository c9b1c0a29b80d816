//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::genotype::DEFAULT_GENOTYPE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens when an animal walks off the edge of the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Moves past the edge are rejected
    Clamped,
    /// Edges wrap around (toroidal map)
    Wrapped,
}

/// Map dimensions and terrain layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Width of the map
    pub width: i32,
    /// Height of the map
    pub height: i32,
    /// Width of the jungle carved out of the map centre
    pub jungle_width: i32,
    /// Height of the jungle carved out of the map centre
    pub jungle_height: i32,
    /// Boundary behaviour
    pub boundary: BoundaryPolicy,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            jungle_width: 5,
            jungle_height: 5,
            boundary: BoundaryPolicy::Wrapped,
        }
    }
}

impl MapConfig {
    /// Size the jungle as a fraction of the map on both axes.
    pub fn with_jungle_ratio(mut self, ratio: f32) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        self.jungle_width = (self.width as f32 * ratio).round() as i32;
        self.jungle_height = (self.height as f32 * ratio).round() as i32;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::Validation(format!(
                "map size must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if self.jungle_width < 0
            || self.jungle_height < 0
            || self.jungle_width > self.width
            || self.jungle_height > self.height
        {
            return Err(Error::Validation(format!(
                "jungle {}x{} does not fit in map {}x{}",
                self.jungle_width, self.jungle_height, self.width, self.height
            )));
        }

        // cell indices are computed in i32
        if i64::from(self.width) * i64::from(self.height) > i64::from(i32::MAX) {
            return Err(Error::Validation(format!(
                "map {}x{} has too many cells",
                self.width, self.height
            )));
        }

        Ok(())
    }
}

/// Energy costs and gains
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Energy of every newly created animal
    pub start_energy: f64,
    /// Energy drained from every animal at the end of each day
    pub move_energy: f64,
    /// Energy a plant gives when eaten, split among the strongest eaters
    pub plant_energy: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            start_energy: 30.0,
            move_energy: 1.0,
            plant_energy: 30.0,
        }
    }
}

/// Plant regrowth per day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Plants grown in the jungle each day
    pub plants_jungle: usize,
    /// Plants grown in the steppe each day
    pub plants_steppe: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            plants_jungle: 3,
            plants_steppe: 50,
        }
    }
}

/// Full world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Animals placed at the map centre when the world is created
    pub start_animals: usize,
    /// Number of genes per genotype
    pub genotype_size: usize,
    pub map: MapConfig,
    pub energy: EnergyConfig,
    pub growth: GrowthConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            start_animals: 100,
            genotype_size: DEFAULT_GENOTYPE_SIZE,
            map: MapConfig::default(),
            energy: EnergyConfig::default(),
            growth: GrowthConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        self.map.validate()?;

        if self.genotype_size == 0 {
            return Err(Error::Validation("genotype size must be positive".to_string()));
        }

        if !(self.energy.start_energy > 0.0) {
            return Err(Error::Validation(format!(
                "start energy must be positive, got {}",
                self.energy.start_energy
            )));
        }

        if !(self.energy.move_energy >= 0.0) || !(self.energy.plant_energy >= 0.0) {
            return Err(Error::Validation(format!(
                "energy costs and gains must not be negative (move {}, plant {})",
                self.energy.move_energy, self.energy.plant_energy
            )));
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Settings for the simulation loop driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Pause between days (milliseconds), 0 runs flat out
    pub day_interval_ms: u64,
    /// Stop after this many days; run until interrupted if unset
    pub max_days: Option<u64>,
    /// Log a statistics snapshot every N days
    pub stats_interval_days: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            day_interval_ms: 0,
            max_days: Some(1000),
            stats_interval_days: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = WorldConfig::default();
        assert_eq!(config.map.width, 20);
        assert_eq!(config.map.height, 20);
        assert_eq!(config.genotype_size, DEFAULT_GENOTYPE_SIZE);
        assert_eq!(config.energy.start_energy, 30.0);
        assert!(config.validate().is_ok());

        let runner = RunnerConfig::default();
        assert_eq!(runner.stats_interval_days, 100);
    }

    #[test]
    fn test_jungle_ratio() {
        let map = MapConfig {
            width: 40,
            height: 30,
            ..Default::default()
        }
        .with_jungle_ratio(0.25);
        assert_eq!(map.jungle_width, 10);
        assert_eq!(map.jungle_height, 8);
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = WorldConfig::default();
        config.map.width = 0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = WorldConfig::default();
        config.map.jungle_height = 21;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = WorldConfig::default();
        config.energy.start_energy = 0.0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = WorldConfig::default();
        config.genotype_size = 0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_nan_energy_rejected() {
        let mut config = WorldConfig::default();
        config.energy.move_energy = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        let mut config = WorldConfig::default();
        config.energy.plant_energy = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_map_cell_count_bounded() {
        let mut map = MapConfig::default();
        map.width = 50_000;
        map.height = 50_000;
        assert!(matches!(map.validate(), Err(Error::Validation(_))));

        map.width = 46_340;
        map.height = 46_340;
        assert!(map.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "seed": 7,
            "map": { "width": 50, "height": 40, "boundary": "clamped" },
            "energy": { "plant_energy": 12.5 }
        }"#;

        let config = WorldConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.map.width, 50);
        assert_eq!(config.map.jungle_width, 5);
        assert_eq!(config.map.boundary, BoundaryPolicy::Clamped);
        assert_eq!(config.energy.plant_energy, 12.5);
        assert_eq!(config.energy.start_energy, 30.0);
        assert_eq!(config.growth.plants_steppe, 50);
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let result = WorldConfig::from_json_str("{ \"seed\": ");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
