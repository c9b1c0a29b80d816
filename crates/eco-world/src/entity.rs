//! Things that can stand on the map.

use crate::animal::Animal;
use eco_core::Position;
use serde::{Deserialize, Serialize};

/// A plant. Plants are interchangeable, so the position is all there is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plant {
    pub position: Position,
}

impl Plant {
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

/// Anything that can be placed on the map
#[derive(Debug, Clone)]
pub enum Entity {
    Plant(Plant),
    Animal(Animal),
}

impl Entity {
    pub fn position(&self) -> Position {
        match self {
            Entity::Plant(plant) => plant.position,
            Entity::Animal(animal) => animal.position(),
        }
    }
}

impl From<Plant> for Entity {
    fn from(plant: Plant) -> Self {
        Entity::Plant(plant)
    }
}

impl From<Animal> for Entity {
    fn from(animal: Animal) -> Self {
        Entity::Animal(animal)
    }
}
