//! Individual animals and their yearly lifecycle.
//!
//! Herbivores and carnivores share one struct; the species tag selects the
//! parameter table and the feeding strategy (`graze` or `hunt`). Animals never
//! own their parameters: every operation borrows the species table from the
//! island so that a parameter update reaches all of them at once.

use biosim_logic::fitness::{
    birth_probability, death_probability, fitness, migration_probability, migration_weights,
    predation_probability,
};
use biosim_logic::species::{Species, SpeciesParams};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::common::{Coord, Destination};

#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    species: Species,
    age: u32,
    weight: f64,
    fitness: f64,
    coordinates: Coord,
    has_moved: bool,
}

impl Animal {
    pub fn new(
        species: Species,
        age: u32,
        weight: f64,
        coordinates: Coord,
        params: &SpeciesParams,
    ) -> Self {
        let mut animal = Self {
            species,
            age,
            weight,
            fitness: 0.0,
            coordinates,
            has_moved: false,
        };
        animal.update_fitness(params);
        animal
    }

    /// Age-zero animal with a weight drawn from the birth-weight distribution.
    pub fn newborn(
        species: Species,
        coordinates: Coord,
        params: &SpeciesParams,
        rng: &mut impl Rng,
    ) -> Self {
        let weight = draw_birth_weight(params, rng);
        Self::new(species, 0, weight, coordinates, params)
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn coordinates(&self) -> Coord {
        self.coordinates
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn age_one_year(&mut self) {
        self.age += 1;
    }

    /// Yearly metabolism: lose `eta` of current weight.
    pub fn lose_weight(&mut self, params: &SpeciesParams) {
        self.weight -= params.eta * self.weight;
        self.update_fitness(params);
    }

    pub fn update_fitness(&mut self, params: &SpeciesParams) {
        self.fitness = fitness(self.age, self.weight, params);
    }

    pub fn dies(&self, params: &SpeciesParams, rng: &mut impl Rng) -> bool {
        if self.weight <= 0.0 {
            return true;
        }
        death_probability(self.fitness, self.weight, params) > rng.gen::<f64>()
    }

    /// Try to give birth with `same_species` animals (self included) in the cell.
    ///
    /// Returns the newborn's weight; the caller creates the newborn. A draw
    /// that is not positive, not lighter than the parent, or that would cost
    /// the parent all of its weight produces no birth and costs nothing.
    pub fn attempt_birth(
        &mut self,
        same_species: usize,
        params: &SpeciesParams,
        rng: &mut impl Rng,
    ) -> Option<f64> {
        let probability = birth_probability(self.weight, self.fitness, same_species, params);
        if probability <= rng.gen::<f64>() {
            return None;
        }

        let birth_weight = draw_birth_weight(params, rng);
        if birth_weight <= 0.0 || birth_weight >= self.weight {
            return None;
        }
        let cost = params.xi * birth_weight;
        if cost >= self.weight {
            return None;
        }

        self.weight -= cost;
        self.update_fitness(params);
        Some(birth_weight)
    }

    pub fn wants_to_migrate(&self, params: &SpeciesParams, rng: &mut impl Rng) -> bool {
        migration_probability(self.fitness, params) > rng.gen::<f64>()
    }

    /// Pick a destination among `(coordinate, relative food)` candidates,
    /// weighted by `e^(lambda * relative food)`.
    ///
    /// One uniform draw is compared against the running cumulative weight.
    pub fn choose_destination(
        &self,
        candidates: &[(Coord, f64)],
        params: &SpeciesParams,
        rng: &mut impl Rng,
    ) -> Destination {
        let Some(&(last, _)) = candidates.last() else {
            return Destination::Stay;
        };

        let foods: Vec<f64> = candidates.iter().map(|&(_, food)| food).collect();
        let weights = migration_weights(&foods, params.lambda);
        let draw = rng.gen::<f64>();

        let mut cumulative = 0.0;
        for (&(coord, _), weight) in candidates.iter().zip(weights) {
            cumulative += weight;
            if cumulative > draw {
                return Destination::Move(coord);
            }
        }
        // Rounding can leave the sum a hair under the draw.
        Destination::Move(last)
    }

    /// Herbivore feeding: eat up to `F` of `available` fodder and return what is left.
    pub fn graze(&mut self, available: f64, params: &SpeciesParams) -> f64 {
        let eaten = available.min(params.f).max(0.0);
        self.weight += params.beta * eaten;
        self.update_fitness(params);
        if eaten >= available {
            0.0
        } else {
            available - eaten
        }
    }

    /// Carnivore feeding over `prey` in its current order.
    ///
    /// `eaten` marks prey already killed this cycle; kills made here are
    /// marked too. Fitness is recomputed after every kill, so later attempts
    /// in the same hunt use the new value. Total mass eaten never exceeds
    /// `F`: the kill that would pass it only yields the remaining appetite.
    /// Returns the number of kills.
    pub fn hunt(
        &mut self,
        prey: &[Animal],
        eaten: &mut [bool],
        params: &SpeciesParams,
        rng: &mut impl Rng,
    ) -> usize {
        let Some(delta_phi_max) = params.delta_phi_max else {
            return 0;
        };

        let mut consumed = 0.0;
        let mut kills = 0;
        for (victim, taken) in prey.iter().zip(eaten.iter_mut()) {
            if consumed >= params.f {
                break;
            }
            if *taken {
                continue;
            }
            let probability = predation_probability(self.fitness, victim.fitness, delta_phi_max);
            if probability <= 0.0 || rng.gen::<f64>() >= probability {
                continue;
            }

            *taken = true;
            kills += 1;
            let appetite = params.f - consumed;
            if victim.weight <= appetite {
                self.weight += params.beta * victim.weight;
                consumed += victim.weight;
                self.update_fitness(params);
            } else {
                self.weight += params.beta * appetite;
                self.update_fitness(params);
                break;
            }
        }
        kills
    }

    pub(crate) fn relocate(&mut self, coordinates: Coord) {
        self.coordinates = coordinates;
    }

    pub(crate) fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    pub(crate) fn reset_moved(&mut self) {
        self.has_moved = false;
    }
}

/// Draw from `N(w_birth, sigma_birth)`.
pub fn draw_birth_weight(params: &SpeciesParams, rng: &mut impl Rng) -> f64 {
    match Normal::new(params.w_birth, params.sigma_birth) {
        Ok(normal) => normal.sample(rng),
        Err(_) => params.w_birth,
    }
}
