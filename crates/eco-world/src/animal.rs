//! Animal state, gene-driven behaviour and breeding.

use crate::map::MapBounds;
use eco_core::{AnimalId, Direction, Error, Genotype, Position, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a single gene tells the animal to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Backward,
    /// Turn by this many 45° steps, positive is clockwise (±1, ±2 or ±3)
    Rotate(i32),
}

impl Action {
    /// 0 walks forward and 4 walks backward, both keeping the heading.
    /// Any other gene `g` only turns, by `g`·45° clockwise.
    pub fn from_gene(gene: u8) -> Self {
        match gene % 8 {
            0 => Action::Forward,
            4 => Action::Backward,
            g if g < 4 => Action::Rotate(g as i32),
            g => Action::Rotate(g as i32 - 8),
        }
    }
}

/// Outcome of one decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved { from: Position, to: Position },
    Rotated { facing: Direction },
    /// Movement was rejected by the map boundary
    Blocked,
}

/// An animal in the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    id: AnimalId,
    position: Position,
    genotype: Genotype,
    energy: f64,
    start_energy: f64,
    direction: Direction,
    birth_day: u64,
    children: u32,
}

impl Animal {
    pub fn new(
        id: AnimalId,
        position: Position,
        genotype: Genotype,
        energy: f64,
        birth_day: u64,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        if !(energy > 0.0) {
            return Err(Error::Validation(format!(
                "animal {} needs positive starting energy, got {}",
                id, energy
            )));
        }

        if genotype.is_empty() {
            return Err(Error::InvalidGenotype(format!("animal {} has no genes", id)));
        }

        Ok(Self {
            id,
            position,
            genotype,
            energy,
            start_energy: energy,
            direction: Direction::from_index(rng.gen_range(0..Direction::COUNT)),
            birth_day,
            children: 0,
        })
    }

    pub fn id(&self) -> AnimalId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn genotype(&self) -> &Genotype {
        &self.genotype
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Energy the animal was born with
    pub fn start_energy(&self) -> f64 {
        self.start_energy
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn birth_day(&self) -> u64 {
        self.birth_day
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// More than half of the starting energy left
    pub fn can_breed(&self) -> bool {
        self.energy > 0.5 * self.start_energy
    }

    pub fn add_energy(&mut self, amount: f64) {
        self.energy += amount;
    }

    /// Death is not handled here; the world sweeps exhausted animals at the
    /// start of the next day.
    pub fn remove_energy(&mut self, amount: f64) {
        self.energy -= amount;
    }

    pub fn face(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Sample one gene and act on it.
    pub(crate) fn decide(&mut self, bounds: &MapBounds, rng: &mut impl Rng) -> Step {
        match self.genotype.sample(rng) {
            Some(gene) => self.perform(Action::from_gene(gene), bounds),
            None => Step::Blocked,
        }
    }

    pub(crate) fn perform(&mut self, action: Action, bounds: &MapBounds) -> Step {
        let delta = self.direction.to_unit_vector();
        let target = match action {
            Action::Forward => self.position + delta,
            Action::Backward => self.position - delta,
            Action::Rotate(steps) => {
                self.direction = self.direction.rotate(steps);
                return Step::Rotated {
                    facing: self.direction,
                };
            }
        };

        match bounds.resolve(target) {
            Some(to) => {
                let from = self.position;
                self.position = to;
                Step::Moved { from, to }
            }
            None => Step::Blocked,
        }
    }

    /// Breed with `partner`.
    ///
    /// Both animals need more than half of their own starting energy. The
    /// stronger one dominates the crossover; on an exact tie the partner is
    /// treated as the stronger. Each parent then pays half of its own
    /// starting energy and the child appears on this animal's cell.
    pub fn breed(
        &mut self,
        partner: &mut Animal,
        child_id: AnimalId,
        child_energy: f64,
        day: u64,
        rng: &mut impl Rng,
    ) -> Result<Option<Animal>> {
        if !self.can_breed() || !partner.can_breed() {
            return Ok(None);
        }

        if self.genotype.len() != partner.genotype.len() {
            return Err(Error::InvalidGenotype(format!(
                "cannot cross {} genes of {} with {} genes of {}",
                self.genotype.len(),
                self.id,
                partner.genotype.len(),
                partner.id
            )));
        }

        let (strong, weak) = if self.energy > partner.energy {
            (&*self, &*partner)
        } else {
            (&*partner, &*self)
        };
        let genotype = Genotype::crossover(
            &strong.genotype,
            &weak.genotype,
            strong.energy,
            weak.energy,
            rng,
        );

        let child = Animal::new(child_id, self.position, genotype, child_energy, day, rng)?;

        self.energy -= 0.5 * self.start_energy;
        partner.energy -= 0.5 * partner.start_energy;
        self.children += 1;
        partner.children += 1;

        Ok(Some(child))
    }
}
