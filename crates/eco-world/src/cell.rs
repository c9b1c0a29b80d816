//! A single map cell and what is standing on it.

use eco_core::{AnimalId, Position, Terrain};
use serde::{Deserialize, Serialize};
use std::mem;

/// Contents of a cell.
///
/// A plant and any number of animals may share a cell. The animal lists are
/// never empty and keep arrival order, which is the tie-break when two
/// animals have the same energy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    #[default]
    Empty,
    Plant,
    Animals(Vec<AnimalId>),
    PlantAndAnimals(Vec<AnimalId>),
}

impl CellContent {
    fn animals(&self) -> &[AnimalId] {
        match self {
            CellContent::Animals(ids) | CellContent::PlantAndAnimals(ids) => ids,
            CellContent::Empty | CellContent::Plant => &[],
        }
    }

    fn has_plant(&self) -> bool {
        matches!(self, CellContent::Plant | CellContent::PlantAndAnimals(_))
    }

    /// Rebuild the content from its parts, collapsing empty animal lists.
    fn from_parts(plant: bool, animals: Vec<AnimalId>) -> Self {
        match (plant, animals.is_empty()) {
            (false, true) => CellContent::Empty,
            (true, true) => CellContent::Plant,
            (false, false) => CellContent::Animals(animals),
            (true, false) => CellContent::PlantAndAnimals(animals),
        }
    }

    fn into_parts(self) -> (bool, Vec<AnimalId>) {
        match self {
            CellContent::Empty => (false, Vec::new()),
            CellContent::Plant => (true, Vec::new()),
            CellContent::Animals(ids) => (false, ids),
            CellContent::PlantAndAnimals(ids) => (true, ids),
        }
    }
}

/// One grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    terrain: Terrain,
    content: CellContent,
}

impl Cell {
    pub fn new(position: Position, terrain: Terrain) -> Self {
        Self {
            position,
            terrain,
            content: CellContent::Empty,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Animal ids in arrival order
    pub fn animal_ids(&self) -> &[AnimalId] {
        self.content.animals()
    }

    pub fn has_plant(&self) -> bool {
        self.content.has_plant()
    }

    pub fn has_animal(&self) -> bool {
        !self.content.animals().is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.content == CellContent::Empty
    }

    /// Returns false if the animal is already here.
    pub(crate) fn add_animal(&mut self, id: AnimalId) -> bool {
        if self.content.animals().contains(&id) {
            return false;
        }
        self.update(|_, animals| animals.push(id));
        true
    }

    /// Returns false if the animal is not here.
    pub(crate) fn remove_animal(&mut self, id: AnimalId) -> bool {
        if !self.content.animals().contains(&id) {
            return false;
        }
        self.update(|_, animals| animals.retain(|&other| other != id));
        true
    }

    /// Returns false if a plant is already here.
    pub(crate) fn set_plant(&mut self) -> bool {
        if self.has_plant() {
            return false;
        }
        self.update(|plant, _| *plant = true);
        true
    }

    /// Returns false if there was no plant.
    pub(crate) fn remove_plant(&mut self) -> bool {
        if !self.has_plant() {
            return false;
        }
        self.update(|plant, _| *plant = false);
        true
    }

    fn update(&mut self, f: impl FnOnce(&mut bool, &mut Vec<AnimalId>)) {
        let (mut plant, mut animals) = mem::take(&mut self.content).into_parts();
        f(&mut plant, &mut animals);
        self.content = CellContent::from_parts(plant, animals);
    }
}
