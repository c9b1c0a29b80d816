//! Lifecycle events emitted by the day cycle, and the observer trait that
//! receives them.
//!
//! Observers are handed to [`crate::World::simulate_day`] for the duration of
//! one call. They see event data only, never the map, so nothing they do can
//! disturb a day in progress.

use eco_core::{AnimalId, Genotype, Position};
use serde::{Deserialize, Serialize};

/// Population summary taken right after the death sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub day: u64,
    pub animals: usize,
    pub plants: usize,
    /// Mean energy of living animals, 0 when there are none
    pub average_energy: f64,
    /// Mean number of children per living animal, 0 when there are none
    pub average_children: f64,
    /// Most common genotype among living animals
    pub dominant_genotype: Option<Genotype>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// An animal ran out of energy and is about to be removed
    AnimalDied {
        id: AnimalId,
        position: Position,
        day: u64,
        birth_day: u64,
        children: u32,
    },
    Census(Census),
    AnimalBorn {
        id: AnimalId,
        position: Position,
        day: u64,
    },
    /// Two parents produced one offspring; both are credited with a child
    AnimalsBred {
        parents: (AnimalId, AnimalId),
        offspring: AnimalId,
        day: u64,
    },
    /// A full day finished; `day` is the new day counter
    DayAdvanced { day: u64 },
}

/// Receiver of world events.
pub trait WorldObserver {
    fn on_event(&mut self, event: &WorldEvent);
}

/// Records every event, handy for tests and replays within a run.
impl WorldObserver for Vec<WorldEvent> {
    fn on_event(&mut self, event: &WorldEvent) {
        self.push(event.clone());
    }
}

/// Ignores everything.
impl WorldObserver for () {
    fn on_event(&mut self, _event: &WorldEvent) {}
}

/// Fans each event out to both observers, left first.
impl<A: WorldObserver, B: WorldObserver> WorldObserver for (A, B) {
    fn on_event(&mut self, event: &WorldEvent) {
        self.0.on_event(event);
        self.1.on_event(event);
    }
}

impl<T: WorldObserver + ?Sized> WorldObserver for &mut T {
    fn on_event(&mut self, event: &WorldEvent) {
        (**self).on_event(event);
    }
}
