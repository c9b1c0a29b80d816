//! World simulation engine.
//!
//! This crate implements the grid world where plants grow and animals move,
//! feed, breed and die one simulated day at a time.

pub mod animal;
pub mod cell;
pub mod entity;
pub mod event;
pub mod map;
pub mod snapshot;
pub mod stats;
pub mod tracker;
pub mod world;

pub use animal::{Action, Animal, Step};
pub use cell::{Cell, CellContent};
pub use entity::{Entity, Plant};
pub use event::{Census, WorldEvent, WorldObserver};
pub use map::{MapBounds, Region, WorldMap};
pub use snapshot::{AnimalSnapshot, CellSnapshot, MapSnapshot};
pub use stats::{DayStatistics, RunSummary, WorldStatistics};
pub use tracker::LineageTracker;
pub use world::{DayReport, World};
