//! The island grid and the yearly cycle.
//!
//! A year runs these phases in order, each over the whole grid before the
//! next starts:
//!
//! 1. fodder growth
//! 2. feeding (herbivores, then carnivores)
//! 3. breeding
//! 4. migration
//! 5. aging
//! 6. weight loss
//! 7. death
//!
//! Migration visits every cell once, in a freshly shuffled order. Animals
//! are flagged when they decide to move and flags are cleared only after
//! the whole pass, so nobody moves twice in one year no matter the order.

use biosim_logic::landscape::{FoodParamsUpdate, Terrain};
use biosim_logic::species::{Species, SpeciesParams, SpeciesParamsUpdate};
use biosim_logic::ParamError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::animal::{draw_birth_weight, Animal};
use crate::cell::{Cell, CellCount};
use crate::common::Coord;
use crate::error::SimError;
use crate::generation::{parse_map, PopulationEntry};
use crate::params::Parameters;

/// Per-cell animal counts after a year, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub cells: Vec<Vec<CellCount>>,
}

impl YearSummary {
    pub fn get(&self, coord: Coord) -> Option<CellCount> {
        self.cells.get(coord.row)?.get(coord.col).copied()
    }

    /// Island-wide totals.
    pub fn totals(&self) -> CellCount {
        self.cells
            .iter()
            .flatten()
            .fold(CellCount::default(), |acc, c| CellCount {
                herbivores: acc.herbivores + c.herbivores,
                carnivores: acc.carnivores + c.carnivores,
            })
    }

    /// Count matrix for one species, for heatmaps.
    pub fn heatmap(&self, species: Species) -> Vec<Vec<usize>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.get(species)).collect())
            .collect()
    }
}

/// What happened during one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearStats {
    pub kills: usize,
    pub births: usize,
    pub migrations: usize,
    pub deaths: usize,
}

#[derive(Debug, Clone)]
pub struct Island {
    cells: Vec<Vec<Cell>>,
    params: Parameters,
}

impl Island {
    /// Build from a rectangular terrain grid.
    pub fn new(terrain: Vec<Vec<Terrain>>, params: Parameters) -> Result<Self, SimError> {
        let width = match terrain.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(SimError::EmptyMap),
        };
        if let Some((row, found)) = terrain
            .iter()
            .enumerate()
            .map(|(i, r)| (i, r.len()))
            .find(|&(_, len)| len != width)
        {
            return Err(SimError::RaggedMap {
                row,
                expected: width,
                found,
            });
        }

        let cells = terrain
            .into_iter()
            .map(|row| row.into_iter().map(|t| Cell::new(t, &params)).collect())
            .collect();
        Ok(Self { cells, params })
    }

    pub fn from_map(map: &str, params: Parameters) -> Result<Self, SimError> {
        Self::new(parse_map(map)?, params)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map(Vec::len).unwrap_or(0)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(coord.row)?.get(coord.col)
    }

    fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.cells.get_mut(coord.row)?.get_mut(coord.col)
    }

    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (Coord::new(row, col), cell))
        })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn set_species_params(
        &mut self,
        species: Species,
        update: &SpeciesParamsUpdate,
    ) -> Result<(), ParamError> {
        self.params.update_species(species, update)
    }

    pub fn set_food_params(
        &mut self,
        terrain: Terrain,
        update: &FoodParamsUpdate,
    ) -> Result<(), ParamError> {
        self.params.update_food(terrain, update)
    }

    /// Ok if `coord` is on the island and passable.
    pub fn check_placement(&self, coord: Coord) -> Result<(), SimError> {
        let cell = self.cell(coord).ok_or(SimError::OutOfBounds {
            row: coord.row,
            col: coord.col,
        })?;
        if !cell.is_passable() {
            return Err(SimError::Impassable {
                row: coord.row,
                col: coord.col,
                terrain: cell.terrain(),
            });
        }
        Ok(())
    }

    /// Insert one animal into the cell at its own coordinates.
    pub fn place(&mut self, animal: Animal) -> Result<(), SimError> {
        let coord = animal.coordinates();
        self.check_placement(coord)?;
        if let Some(cell) = self.cell_mut(coord) {
            cell.push(animal);
        }
        Ok(())
    }

    /// Insert a declarative population. Every animal is built and checked
    /// before any is inserted, so a bad entry leaves the island unchanged.
    /// Returns the number of animals added.
    pub fn add_population(
        &mut self,
        entries: &[PopulationEntry],
        rng: &mut impl Rng,
    ) -> Result<usize, SimError> {
        let mut pending = Vec::new();
        for entry in entries {
            let coord = entry.coord()?;
            self.check_placement(coord)?;
            for spec in &entry.pop {
                let species_params = self.params.species(spec.species);
                for _ in 0..spec.count {
                    let weight = match spec.weight {
                        Some(weight) => weight,
                        None => draw_positive_weight(species_params, rng),
                    };
                    if !(weight.is_finite() && weight > 0.0) {
                        return Err(SimError::InvalidWeight { weight });
                    }
                    let animal = Animal::new(spec.species, spec.age, weight, coord, species_params);
                    pending.push(animal);
                }
            }
        }

        let added = pending.len();
        for animal in pending {
            let coord = animal.coordinates();
            self.cells[coord.row][coord.col].push(animal);
        }
        Ok(added)
    }

    /// Passable in-bound neighbors in north, south, west, east order.
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        [coord.north(), Some(coord.south()), coord.west(), Some(coord.east())]
            .into_iter()
            .flatten()
            .filter(|&n| self.cell(n).is_some_and(Cell::is_passable))
            .collect()
    }

    /// Every coordinate on the island in random order.
    pub fn shuffled_coordinates(&self, rng: &mut impl Rng) -> Vec<Coord> {
        let mut coords: Vec<Coord> = self.cells().map(|(coord, _)| coord).collect();
        coords.shuffle(rng);
        coords
    }

    pub fn grow(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.grow_food(&self.params);
        }
    }

    pub fn feeding(&mut self, rng: &mut impl Rng) -> usize {
        let mut kills = 0;
        for cell in self.cells.iter_mut().flatten() {
            kills += cell.feeding_cycle(&self.params, rng);
        }
        kills
    }

    pub fn procreation(&mut self, rng: &mut impl Rng) -> usize {
        let mut births = 0;
        for cell in self.cells.iter_mut().flatten() {
            births += cell.breeding_cycle(&self.params, rng);
        }
        births
    }

    /// One migration pass. Returns the number of animals that changed cell.
    pub fn migration(&mut self, rng: &mut impl Rng) -> usize {
        let mut moved = 0;
        for coord in self.shuffled_coordinates(rng) {
            if !self.cells[coord.row][coord.col].is_passable() {
                continue;
            }

            for species in Species::ALL {
                let candidates: Vec<(Coord, f64)> = self
                    .neighbors(coord)
                    .into_iter()
                    .map(|n| (n, self.cells[n.row][n.col].relative_food(species, &self.params)))
                    .collect();

                let species_params = self.params.species(species);
                let source = &mut self.cells[coord.row][coord.col];
                let intents = source.migration_intents(species, &candidates, species_params, rng);
                if intents.is_empty() {
                    continue;
                }

                for (destination, mut animal) in source.take_migrants(species, &intents) {
                    animal.relocate(destination);
                    self.cells[destination.row][destination.col].push(animal);
                    moved += 1;
                }
            }
        }

        for cell in self.cells.iter_mut().flatten() {
            cell.reset_moved();
        }
        moved
    }

    pub fn aging(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.age_cycle();
        }
    }

    pub fn weight_loss(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.weight_loss_cycle(&self.params);
        }
    }

    pub fn death(&mut self, rng: &mut impl Rng) -> usize {
        let mut deaths = 0;
        for cell in self.cells.iter_mut().flatten() {
            deaths += cell.death_cycle(&self.params, rng);
        }
        deaths
    }

    /// Run all phases of one year and return the resulting counts.
    pub fn one_year(&mut self, rng: &mut impl Rng) -> (YearSummary, YearStats) {
        self.grow();
        let kills = self.feeding(rng);
        let births = self.procreation(rng);
        let migrations = self.migration(rng);
        self.aging();
        self.weight_loss();
        let deaths = self.death(rng);

        let stats = YearStats {
            kills,
            births,
            migrations,
            deaths,
        };
        (self.year_summary(), stats)
    }

    pub fn year_summary(&self) -> YearSummary {
        YearSummary {
            cells: self
                .cells
                .iter()
                .map(|row| row.iter().map(Cell::counts).collect())
                .collect(),
        }
    }

    pub fn animal_count(&self) -> usize {
        self.cells.iter().flatten().map(|c| c.counts().total()).sum()
    }
}

/// Redraws allowed for an initial weight before giving up.
const WEIGHT_DRAWS: usize = 100;

/// Birth-weight draw for an animal loaded without a weight. Non-positive
/// draws are retried; the last draw is returned if none is positive.
fn draw_positive_weight(params: &SpeciesParams, rng: &mut impl Rng) -> f64 {
    let mut weight = draw_birth_weight(params, rng);
    for _ in 1..WEIGHT_DRAWS {
        if weight > 0.0 {
            break;
        }
        weight = draw_birth_weight(params, rng);
    }
    weight
}
