//! Core types and utilities for the Eco-Sim grid ecosystem simulation.

pub mod types;
pub mod config;
pub mod error;
pub mod genotype;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use genotype::*;
