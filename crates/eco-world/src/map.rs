//! The spatial map: cells, terrain, boundary policy and the animal and plant
//! indices.
//!
//! Invariants kept by every public method:
//! - an animal's position always names the cell that lists it,
//! - every animal is listed in exactly one cell and in the animal index,
//! - the plant index holds exactly the positions whose cell has a plant.

use crate::animal::{Animal, Step};
use crate::cell::Cell;
use crate::entity::{Entity, Plant};
use eco_core::{AnimalId, BoundaryPolicy, Error, MapConfig, Position, Result, Terrain};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Map dimensions plus what happens at the edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: i32,
    pub height: i32,
    pub policy: BoundaryPolicy,
}

impl MapBounds {
    pub fn new(width: i32, height: i32, policy: BoundaryPolicy) -> Self {
        Self {
            width,
            height,
            policy,
        }
    }

    /// True if the position has a backing cell
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Clamped maps only accept positions inside the grid; wrapped maps
    /// accept anything and normalise it with [`MapBounds::wrap`].
    pub fn can_move_to(&self, pos: Position) -> bool {
        match self.policy {
            BoundaryPolicy::Clamped => self.contains(pos),
            BoundaryPolicy::Wrapped => true,
        }
    }

    /// Fold a raw position back onto the grid.
    pub fn wrap(&self, pos: Position) -> Position {
        pos.wrap(self.width, self.height)
    }

    /// Where a move toward `target` actually ends, if it is allowed.
    pub fn resolve(&self, target: Position) -> Option<Position> {
        if !self.can_move_to(target) {
            return None;
        }
        match self.policy {
            BoundaryPolicy::Clamped => Some(target),
            BoundaryPolicy::Wrapped => Some(self.wrap(target)),
        }
    }
}

/// Inclusive rectangle of jungle cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub lower: Position,
    pub upper: Position,
}

impl Region {
    pub fn contains(&self, pos: Position) -> bool {
        pos.within(self.lower, self.upper)
    }
}

/// The world map
#[derive(Debug, Clone)]
pub struct WorldMap {
    bounds: MapBounds,
    jungle: Option<Region>,
    cells: Vec<Cell>,
    animals: BTreeMap<AnimalId, Animal>,
    plants: BTreeSet<Position>,
}

impl WorldMap {
    pub fn new(config: &MapConfig) -> Result<Self> {
        config.validate()?;

        let bounds = MapBounds::new(config.width, config.height, config.boundary);
        let jungle = Self::centered_region(config);

        let mut cells = Vec::with_capacity(config.width as usize * config.height as usize);
        for y in 0..config.height {
            for x in 0..config.width {
                let pos = Position::new(x, y);
                let terrain = match jungle {
                    Some(region) if region.contains(pos) => Terrain::Jungle,
                    _ => Terrain::Steppe,
                };
                cells.push(Cell::new(pos, terrain));
            }
        }

        Ok(Self {
            bounds,
            jungle,
            cells,
            animals: BTreeMap::new(),
            plants: BTreeSet::new(),
        })
    }

    fn centered_region(config: &MapConfig) -> Option<Region> {
        if config.jungle_width == 0 || config.jungle_height == 0 {
            return None;
        }

        let lower = Position::new(
            (config.width - config.jungle_width) / 2,
            (config.height - config.jungle_height) / 2,
        );
        let upper = lower + Position::new(config.jungle_width - 1, config.jungle_height - 1);
        Some(Region { lower, upper })
    }

    pub fn bounds(&self) -> MapBounds {
        self.bounds
    }

    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    /// The jungle rectangle, if the map has one
    pub fn jungle(&self) -> Option<Region> {
        self.jungle
    }

    pub fn can_move_to(&self, pos: Position) -> bool {
        self.bounds.can_move_to(pos)
    }

    pub fn wrap(&self, pos: Position) -> Position {
        self.bounds.wrap(pos)
    }

    fn pos_to_index(&self, pos: Position) -> Option<usize> {
        if self.bounds.contains(pos) {
            Some((pos.y * self.bounds.width + pos.x) as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.pos_to_index(pos).map(|index| &self.cells[index])
    }

    fn cell_mut(&mut self, pos: Position) -> Result<&mut Cell> {
        let index = self.pos_to_index(pos).ok_or(Error::OutOfBounds(pos))?;
        Ok(&mut self.cells[index])
    }

    /// All cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Place a plant or an animal at its own position.
    pub fn place(&mut self, entity: Entity) -> Result<()> {
        match entity {
            Entity::Plant(plant) => self.place_plant(plant.position),
            Entity::Animal(animal) => self.place_animal(animal).map(|_| ()),
        }
    }

    pub fn place_plant(&mut self, pos: Position) -> Result<()> {
        let cell = self.cell_mut(pos)?;
        if !cell.set_plant() {
            return Err(Error::SlotOccupied(format!("cell {} already has a plant", pos)));
        }
        self.plants.insert(pos);
        Ok(())
    }

    pub fn place_animal(&mut self, animal: Animal) -> Result<AnimalId> {
        let id = animal.id();
        let pos = animal.position();

        if self.animals.contains_key(&id) {
            return Err(Error::SlotOccupied(format!("animal {} is already on the map", id)));
        }

        let cell = self.cell_mut(pos)?;
        if !cell.add_animal(id) {
            return Err(Error::SlotOccupied(format!("animal {} is already at {}", id, pos)));
        }

        self.animals.insert(id, animal);
        Ok(id)
    }

    pub fn pop_plant(&mut self, pos: Position) -> Result<Plant> {
        if !self.plants.remove(&pos) {
            return Err(Error::NotFound(format!("no plant at {}", pos)));
        }

        let cell = self.cell_mut(pos)?;
        if !cell.remove_plant() {
            return Err(Error::NotFound(format!("plant index lists {} but the cell is bare", pos)));
        }

        Ok(Plant::new(pos))
    }

    pub fn pop_animal(&mut self, id: AnimalId) -> Result<Animal> {
        let pos = self
            .animals
            .get(&id)
            .map(Animal::position)
            .ok_or_else(|| Error::NotFound(format!("animal {}", id)))?;

        let cell = self.cell_mut(pos)?;
        if !cell.remove_animal(id) {
            return Err(Error::NotFound(format!("animal {} is not listed at {}", id, pos)));
        }

        self.animals
            .remove(&id)
            .ok_or_else(|| Error::NotFound(format!("animal {}", id)))
    }

    /// Animals on a cell, strongest first; equal energy keeps arrival order.
    pub fn animals_at(&self, pos: Position) -> Vec<&Animal> {
        let mut animals: Vec<&Animal> = match self.cell(pos) {
            Some(cell) => cell
                .animal_ids()
                .iter()
                .filter_map(|id| self.animals.get(id))
                .collect(),
            None => Vec::new(),
        };
        animals.sort_by(|a, b| by_energy_desc(a, b));
        animals
    }

    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.get(&id)
    }

    /// Mutable access for energy and facing changes. Position only ever
    /// changes through [`WorldMap::decide`].
    pub fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.animals.get_mut(&id)
    }

    /// All animals, ordered by id
    pub fn animals(&self) -> impl Iterator<Item = &Animal> + '_ {
        self.animals.values()
    }

    pub(crate) fn animals_mut(&mut self) -> impl Iterator<Item = &mut Animal> + '_ {
        self.animals.values_mut()
    }

    pub fn animal_ids(&self) -> Vec<AnimalId> {
        self.animals.keys().copied().collect()
    }

    pub fn animal_count(&self) -> usize {
        self.animals.len()
    }

    /// Positions of all plants
    pub fn plants(&self) -> impl Iterator<Item = Position> + '_ {
        self.plants.iter().copied()
    }

    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    pub fn has_plant(&self, pos: Position) -> bool {
        self.plants.contains(&pos)
    }

    /// Let one animal act on its genes and move it between cells if it walked.
    pub fn decide(&mut self, id: AnimalId, rng: &mut impl Rng) -> Result<Step> {
        let bounds = self.bounds;
        let animal = self
            .animals
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("animal {}", id)))?;

        let step = animal.decide(&bounds, rng);
        if let Step::Moved { from, to } = step {
            self.relocate(id, from, to)?;
        }
        Ok(step)
    }

    fn relocate(&mut self, id: AnimalId, from: Position, to: Position) -> Result<()> {
        if from == to {
            return Ok(());
        }

        if !self.cell_mut(from)?.remove_animal(id) {
            return Err(Error::NotFound(format!("animal {} is not listed at {}", id, from)));
        }
        if !self.cell_mut(to)?.add_animal(id) {
            return Err(Error::SlotOccupied(format!("animal {} is already at {}", id, to)));
        }
        Ok(())
    }

    /// Borrow two different animals mutably at once.
    pub fn with_pair_mut<R>(
        &mut self,
        first: AnimalId,
        second: AnimalId,
        f: impl FnOnce(&mut Animal, &mut Animal) -> R,
    ) -> Result<R> {
        if first == second {
            return Err(Error::Validation(format!("animal {} cannot pair with itself", first)));
        }

        let mut taken = self
            .animals
            .remove(&first)
            .ok_or_else(|| Error::NotFound(format!("animal {}", first)))?;

        let result = match self.animals.get_mut(&second) {
            Some(other) => Ok(f(&mut taken, other)),
            None => Err(Error::NotFound(format!("animal {}", second))),
        };

        self.animals.insert(first, taken);
        result
    }
}

fn by_energy_desc(a: &Animal, b: &Animal) -> Ordering {
    b.energy().total_cmp(&a.energy())
}
