//! Immutable copies of the map for renderers and other readers that must not
//! touch the live world.

use crate::map::{Region, WorldMap};
use eco_core::{AnimalId, Direction, Position, Result, Terrain};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalSnapshot {
    pub id: AnimalId,
    pub energy: f64,
    pub direction: Direction,
    pub genotype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub position: Position,
    pub terrain: Terrain,
    pub has_plant: bool,
    /// Strongest first, so a renderer can draw `animals[0]`
    pub animals: Vec<AnimalSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub day: u64,
    pub width: i32,
    pub height: i32,
    pub jungle: Option<Region>,
    /// Every cell, row by row
    pub cells: Vec<CellSnapshot>,
}

impl MapSnapshot {
    pub fn capture(map: &WorldMap, day: u64) -> Self {
        let cells = map
            .cells()
            .map(|cell| CellSnapshot {
                position: cell.position(),
                terrain: cell.terrain(),
                has_plant: cell.has_plant(),
                animals: map
                    .animals_at(cell.position())
                    .into_iter()
                    .map(|animal| AnimalSnapshot {
                        id: animal.id(),
                        energy: animal.energy(),
                        direction: animal.direction(),
                        genotype: animal.genotype().to_string(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            day,
            width: map.width(),
            height: map.height(),
            jungle: map.jungle(),
            cells,
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&CellSnapshot> {
        if pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height {
            return None;
        }
        self.cells.get((pos.y * self.width + pos.x) as usize)
    }

    pub fn animal_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.animals.len()).sum()
    }

    pub fn plant_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.has_plant).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
