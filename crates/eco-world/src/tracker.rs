//! Follow one chosen animal and its descendants.

use crate::event::{WorldEvent, WorldObserver};
use eco_core::AnimalId;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct LineageTracker {
    root: AnimalId,
    children: BTreeSet<AnimalId>,
    descendants: BTreeSet<AnimalId>,
    death_day: Option<u64>,
}

impl LineageTracker {
    pub fn new(root: AnimalId) -> Self {
        Self {
            root,
            children: BTreeSet::new(),
            descendants: BTreeSet::new(),
            death_day: None,
        }
    }

    pub fn root(&self) -> AnimalId {
        self.root
    }

    /// Direct offspring born since tracking started
    pub fn children(&self) -> usize {
        self.children.len()
    }

    /// Every offspring of the root or of a tracked descendant
    pub fn descendants(&self) -> usize {
        self.descendants.len()
    }

    pub fn is_descendant(&self, id: AnimalId) -> bool {
        self.descendants.contains(&id)
    }

    pub fn death_day(&self) -> Option<u64> {
        self.death_day
    }

    fn in_lineage(&self, id: AnimalId) -> bool {
        id == self.root || self.descendants.contains(&id)
    }
}

impl WorldObserver for LineageTracker {
    fn on_event(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::AnimalsBred {
                parents: (a, b),
                offspring,
                ..
            } => {
                if *a == self.root || *b == self.root {
                    self.children.insert(*offspring);
                }
                if self.in_lineage(*a) || self.in_lineage(*b) {
                    self.descendants.insert(*offspring);
                }
            }
            WorldEvent::AnimalDied { id, day, .. } if *id == self.root => {
                self.death_day = Some(*day);
            }
            _ => {}
        }
    }
}
