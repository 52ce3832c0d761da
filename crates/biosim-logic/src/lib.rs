//! Pure population-dynamics logic for BioSim.
//!
//! This crate holds the data tables and formulas of the island model with
//! no RNG and no engine state. Functions take plain data and return numbers,
//! which keeps them unit-testable; the `biosim-core` engine draws the random
//! numbers and compares them against the probabilities computed here.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`error`] | Parameter validation errors |
//! | [`fitness`] | Fitness, death, birth, migration and predation formulas |
//! | [`landscape`] | Terrain kinds, passability, fodder tables and regrowth |
//! | [`species`] | Species tags and per-species parameter tables |

pub mod error;
pub mod fitness;
pub mod landscape;
pub mod species;

pub use error::ParamError;
pub use landscape::{FoodParams, FoodParamsUpdate, GrowthRule, Terrain};
pub use species::{Species, SpeciesParams, SpeciesParamsUpdate};
