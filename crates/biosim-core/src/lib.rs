//! BioSim Core - Island Ecosystem Simulation Engine
//!
//! Herbivores graze and carnivores hunt on a rectangular island of terrain
//! cells. Every simulated year runs a fixed sequence of phases over the whole
//! grid: fodder growth, feeding, breeding, migration, aging, weight loss and
//! death.
//!
//! # Architecture
//!
//! - **Animals** carry age, weight and cached fitness; their species table
//!   lives in the shared [`params::Parameters`]
//! - **Cells** own their fodder and one collection per species
//! - **Island** owns the grid and runs the phases
//! - **Engine** owns the island plus the single seeded RNG, and records history
//!
//! The formulas themselves live in `biosim-logic`.
//!
//! # Example
//!
//! ```rust,no_run
//! use biosim_core::prelude::*;
//!
//! let mut engine = SimulationEngine::default_island(656412).unwrap();
//! engine.simulate(50);
//! println!("{:?}", engine.animal_counts());
//! ```

pub mod animal;
pub mod cell;
pub mod common;
pub mod engine;
pub mod error;
pub mod generation;
pub mod island;
pub mod params;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::animal::Animal;
    pub use crate::cell::{Cell, CellCount};
    pub use crate::common::Coord;
    pub use crate::engine::SimulationEngine;
    pub use crate::error::SimError;
    pub use crate::generation::{AnimalSpec, PopulationEntry};
    pub use crate::island::{Island, YearStats, YearSummary};
    pub use crate::params::Parameters;
    pub use biosim_logic::{FoodParamsUpdate, Species, SpeciesParamsUpdate, Terrain};
}
