//! Single terrain cell: fodder plus the two animal collections.
//!
//! Each yearly phase has a cell-level operation here; the island calls it on
//! every cell before moving on to the next phase. Operations that remove
//! animals decide first and remove afterwards, so removal never changes
//! which animals are visited.

use biosim_logic::fitness::relative_food;
use biosim_logic::landscape::{grow_food, Terrain};
use biosim_logic::species::{Species, SpeciesParams};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::animal::Animal;
use crate::common::{Coord, Destination};
use crate::params::Parameters;

/// Animal counts in one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCount {
    pub herbivores: usize,
    pub carnivores: usize,
}

impl CellCount {
    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Herbivore => self.herbivores,
            Species::Carnivore => self.carnivores,
        }
    }

    pub fn total(&self) -> usize {
        self.herbivores + self.carnivores
    }
}

/// Migration decision for the animal at `index` in one species collection.
pub type MigrationIntent = (usize, Destination);

#[derive(Debug, Clone)]
pub struct Cell {
    terrain: Terrain,
    food: f64,
    herbivores: Vec<Animal>,
    carnivores: Vec<Animal>,
}

impl Cell {
    /// New cell with fodder at its maximum.
    pub fn new(terrain: Terrain, params: &Parameters) -> Self {
        Self {
            terrain,
            food: params.food(terrain).map(|f| f.f_max).unwrap_or(0.0),
            herbivores: Vec::new(),
            carnivores: Vec::new(),
        }
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn is_passable(&self) -> bool {
        self.terrain.is_passable()
    }

    /// Herbivore fodder left in the cell.
    pub fn food(&self) -> f64 {
        self.food
    }

    pub fn animals(&self, species: Species) -> &[Animal] {
        match species {
            Species::Herbivore => &self.herbivores,
            Species::Carnivore => &self.carnivores,
        }
    }

    fn animals_mut(&mut self, species: Species) -> &mut Vec<Animal> {
        match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Carnivore => &mut self.carnivores,
        }
    }

    pub fn count(&self, species: Species) -> usize {
        self.animals(species).len()
    }

    pub fn counts(&self) -> CellCount {
        CellCount {
            herbivores: self.herbivores.len(),
            carnivores: self.carnivores.len(),
        }
    }

    /// Append an animal to its species collection. The island checks
    /// passability before calling this.
    pub(crate) fn push(&mut self, animal: Animal) {
        debug_assert!(self.is_passable(), "animal placed on {}", self.terrain);
        self.animals_mut(animal.species()).push(animal);
    }

    pub fn grow_food(&mut self, params: &Parameters) {
        if let Some(food_params) = params.food(self.terrain) {
            self.food = grow_food(self.terrain.growth_rule(), self.food, food_params);
        }
    }

    /// Herbivores graze fittest first, then carnivores hunt fittest first.
    /// Returns the number of herbivores killed.
    pub fn feeding_cycle(&mut self, params: &Parameters, rng: &mut impl Rng) -> usize {
        if !self.is_passable() {
            return 0;
        }

        let herbivore_params = params.species(Species::Herbivore);
        for i in by_fitness_desc(&self.herbivores) {
            self.food = self.herbivores[i].graze(self.food, herbivore_params);
        }

        let carnivore_params = params.species(Species::Carnivore);
        let mut eaten = vec![false; self.herbivores.len()];
        let mut kills = 0;
        for i in by_fitness_desc(&self.carnivores) {
            kills += self.carnivores[i].hunt(&self.herbivores, &mut eaten, carnivore_params, rng);
        }

        if kills > 0 {
            let mut eaten = eaten.into_iter();
            self.herbivores.retain(|_| !eaten.next().unwrap_or(false));
        }
        kills
    }

    /// Every animal present at the start tries to breed, fittest first,
    /// against the pre-cycle head count. Newborns join the cell afterwards.
    /// Returns the number of births.
    pub fn breeding_cycle(&mut self, params: &Parameters, rng: &mut impl Rng) -> usize {
        let mut births = 0;
        for species in Species::ALL {
            let species_params = params.species(species);
            let animals = self.animals_mut(species);
            let head_count = animals.len();

            let mut newborns = Vec::new();
            for i in by_fitness_desc(animals) {
                let parent = &mut animals[i];
                if let Some(weight) = parent.attempt_birth(head_count, species_params, rng) {
                    let coords = parent.coordinates();
                    newborns.push(Animal::new(species, 0, weight, coords, species_params));
                }
            }
            births += newborns.len();
            animals.extend(newborns);
        }
        births
    }

    /// Decide which animals of `species` leave this year and where to.
    ///
    /// Animals that already moved this year are skipped; deciders are
    /// flagged. Collections are left untouched, see [`Cell::take_migrants`].
    pub fn migration_intents(
        &mut self,
        species: Species,
        candidates: &[(Coord, f64)],
        params: &SpeciesParams,
        rng: &mut impl Rng,
    ) -> Vec<MigrationIntent> {
        let mut intents = Vec::new();
        for (i, animal) in self.animals_mut(species).iter_mut().enumerate() {
            if animal.has_moved() || !animal.wants_to_migrate(params, rng) {
                continue;
            }
            animal.mark_moved();
            intents.push((i, animal.choose_destination(candidates, params, rng)));
        }
        intents
    }

    /// Remove the animals whose intent is to move and hand them back with
    /// their destinations. Animals staying put keep their place and order.
    pub(crate) fn take_migrants(
        &mut self,
        species: Species,
        intents: &[MigrationIntent],
    ) -> Vec<(Coord, Animal)> {
        let animals = self.animals_mut(species);
        let mut targets: Vec<Option<Coord>> = vec![None; animals.len()];
        for &(i, destination) in intents {
            if let (Destination::Move(coord), Some(slot)) = (destination, targets.get_mut(i)) {
                *slot = Some(coord);
            }
        }
        if targets.iter().all(Option::is_none) {
            return Vec::new();
        }

        let mut staying = Vec::with_capacity(animals.len());
        let mut leaving = Vec::new();
        for (animal, target) in std::mem::take(animals).into_iter().zip(targets) {
            match target {
                Some(coord) => leaving.push((coord, animal)),
                None => staying.push(animal),
            }
        }
        *animals = staying;
        leaving
    }

    pub(crate) fn reset_moved(&mut self) {
        for animal in self.herbivores.iter_mut().chain(self.carnivores.iter_mut()) {
            animal.reset_moved();
        }
    }

    pub fn age_cycle(&mut self) {
        for animal in self.herbivores.iter_mut().chain(self.carnivores.iter_mut()) {
            animal.age_one_year();
        }
    }

    pub fn weight_loss_cycle(&mut self, params: &Parameters) {
        for species in Species::ALL {
            let species_params = params.species(species);
            for animal in self.animals_mut(species) {
                animal.lose_weight(species_params);
            }
        }
    }

    /// Remove animals whose death check succeeds. Returns the number of deaths.
    pub fn death_cycle(&mut self, params: &Parameters, rng: &mut impl Rng) -> usize {
        let mut deaths = 0;
        for species in Species::ALL {
            let species_params = params.species(species);
            let animals = self.animals_mut(species);
            let before = animals.len();
            animals.retain(|animal| !animal.dies(species_params, rng));
            deaths += before - animals.len();
        }
        deaths
    }

    /// Total herbivore mass, the carnivores' food supply.
    pub fn herbivore_mass(&self) -> f64 {
        self.herbivores.iter().map(Animal::weight).sum()
    }

    /// How attractive this cell is to a prospective `species` immigrant.
    pub fn relative_food(&self, species: Species, params: &Parameters) -> f64 {
        let capacity = params.species(species).f;
        match species {
            Species::Herbivore => relative_food(self.food, self.herbivores.len(), capacity),
            Species::Carnivore => {
                relative_food(self.herbivore_mass(), self.carnivores.len(), capacity)
            }
        }
    }

    pub fn average_age(&self, species: Species) -> Option<f64> {
        mean(self.animals(species).iter().map(|a| a.age() as f64))
    }

    pub fn average_fitness(&self, species: Species) -> Option<f64> {
        mean(self.animals(species).iter().map(Animal::fitness))
    }
}

/// Indices ordered by descending fitness; equal fitness keeps collection order.
fn by_fitness_desc(animals: &[Animal]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..animals.len()).collect();
    order.sort_by(|&a, &b| animals[b].fitness().total_cmp(&animals[a].fitness()));
    order
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biosim_logic::landscape::FoodParamsUpdate;
    use biosim_logic::species::SpeciesParamsUpdate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cell_with(
        terrain: Terrain,
        params: &Parameters,
        herbs: &[(u32, f64)],
        carns: &[(u32, f64)],
    ) -> Cell {
        let mut cell = Cell::new(terrain, params);
        for &(age, weight) in herbs {
            cell.push(Animal::new(
                Species::Herbivore,
                age,
                weight,
                Coord::new(1, 1),
                params.species(Species::Herbivore),
            ));
        }
        for &(age, weight) in carns {
            cell.push(Animal::new(
                Species::Carnivore,
                age,
                weight,
                Coord::new(1, 1),
                params.species(Species::Carnivore),
            ));
        }
        cell
    }

    #[test]
    fn test_initial_food() {
        let params = Parameters::default();
        assert_eq!(Cell::new(Terrain::Jungle, &params).food(), 800.0);
        assert_eq!(Cell::new(Terrain::Savannah, &params).food(), 300.0);
        assert_eq!(Cell::new(Terrain::Desert, &params).food(), 0.0);
        assert!(!Cell::new(Terrain::Ocean, &params).is_passable());
    }

    #[test]
    fn test_jungle_food_resets_after_feeding() {
        let params = Parameters::default();
        let herbs: Vec<(u32, f64)> = (0..30).map(|_| (5, 20.0)).collect();
        let mut cell = cell_with(Terrain::Jungle, &params, &herbs, &[]);
        let mut rng = StdRng::seed_from_u64(1);
        cell.feeding_cycle(&params, &mut rng);
        assert!((cell.food() - 500.0).abs() < 1e-9);
        cell.grow_food(&params);
        assert_eq!(cell.food(), 800.0);
    }

    #[test]
    fn test_savannah_regrows_without_exceeding_max() {
        let params = Parameters::default();
        let herbs: Vec<(u32, f64)> = (0..25).map(|_| (5, 20.0)).collect();
        let mut cell = cell_with(Terrain::Savannah, &params, &herbs, &[]);
        let mut rng = StdRng::seed_from_u64(2);
        cell.feeding_cycle(&params, &mut rng);
        assert!((cell.food() - 50.0).abs() < 1e-9);

        let mut previous = cell.food();
        for _ in 0..30 {
            cell.grow_food(&params);
            assert!(cell.food() > previous);
            assert!(cell.food() <= 300.0);
            previous = cell.food();
        }
    }

    #[test]
    fn test_fittest_herbivore_eats_first() {
        let mut params = Parameters::default();
        params
            .update_food(
                Terrain::Jungle,
                &FoodParamsUpdate {
                    f_max: Some(15.0),
                    alpha: None,
                },
            )
            .unwrap();
        // The heavier one is fitter and gets the full ration.
        let mut cell = cell_with(Terrain::Jungle, &params, &[(5, 10.0), (5, 30.0)], &[]);
        let mut rng = StdRng::seed_from_u64(3);
        cell.feeding_cycle(&params, &mut rng);

        let beta = params.species(Species::Herbivore).beta;
        let weights: Vec<f64> = cell
            .animals(Species::Herbivore)
            .iter()
            .map(Animal::weight)
            .collect();
        assert!((weights[1] - (30.0 + beta * 10.0)).abs() < 1e-9);
        assert!((weights[0] - (10.0 + beta * 5.0)).abs() < 1e-9);
        assert_eq!(cell.food(), 0.0);
    }

    #[test]
    fn test_savannah_follows_lowered_max() {
        let mut params = Parameters::default();
        let mut cell = Cell::new(Terrain::Savannah, &params);
        assert_eq!(cell.food(), 300.0);
        params
            .update_food(
                Terrain::Savannah,
                &FoodParamsUpdate {
                    f_max: Some(120.0),
                    alpha: None,
                },
            )
            .unwrap();
        cell.grow_food(&params);
        assert_eq!(cell.food(), 120.0);
    }

    #[test]
    fn test_desert_feeds_nothing() {
        let params = Parameters::default();
        let mut cell = cell_with(Terrain::Desert, &params, &[(5, 20.0)], &[]);
        let mut rng = StdRng::seed_from_u64(4);
        cell.grow_food(&params);
        cell.feeding_cycle(&params, &mut rng);
        assert_eq!(cell.animals(Species::Herbivore)[0].weight(), 20.0);
    }

    #[test]
    fn test_carnivores_eat_weak_herbivores() {
        let mut params = Parameters::default();
        params
            .update_species(
                Species::Carnivore,
                &SpeciesParamsUpdate {
                    delta_phi_max: Some(2.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let herbs: Vec<(u32, f64)> = (0..20).map(|_| (90, 3.0)).collect();
        let carns: Vec<(u32, f64)> = (0..5).map(|_| (5, 40.0)).collect();
        let mut cell = cell_with(Terrain::Desert, &params, &herbs, &carns);
        let before: f64 = cell.animals(Species::Carnivore).iter().map(Animal::weight).sum();
        let mut rng = StdRng::seed_from_u64(5);

        let kills = cell.feeding_cycle(&params, &mut rng);
        assert!(kills > 0);
        assert_eq!(cell.count(Species::Herbivore), 20 - kills);
        let after: f64 = cell.animals(Species::Carnivore).iter().map(Animal::weight).sum();
        assert!(after > before);
    }

    #[test]
    fn test_breeding_counts_only_existing_animals() {
        let mut params = Parameters::default();
        params
            .update_species(
                Species::Herbivore,
                &SpeciesParamsUpdate {
                    gamma: Some(1.0),
                    ..Default::default()
                },
            )
            .unwrap();
        // One heavy pair: at most one birth per parent, newborns never breed.
        let mut cell = cell_with(Terrain::Jungle, &params, &[(5, 60.0), (5, 60.0)], &[]);
        let mut rng = StdRng::seed_from_u64(6);
        let births = cell.breeding_cycle(&params, &mut rng);
        assert!(births <= 2);
        assert_eq!(cell.count(Species::Herbivore), 2 + births);
        for newborn in &cell.animals(Species::Herbivore)[2..] {
            assert_eq!(newborn.age(), 0);
            assert_eq!(newborn.coordinates(), Coord::new(1, 1));
        }
    }

    #[test]
    fn test_single_animal_never_breeds() {
        let params = Parameters::default();
        let mut cell = cell_with(Terrain::Jungle, &params, &[(5, 60.0)], &[(5, 60.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(cell.breeding_cycle(&params, &mut rng), 0);
        }
    }

    #[test]
    fn test_migration_intents_flag_once() {
        let mut params = Parameters::default();
        params
            .update_species(
                Species::Herbivore,
                &SpeciesParamsUpdate {
                    mu: Some(1.0),
                    a_half: Some(1000.0),
                    phi_age: Some(1.0),
                    w_half: Some(0.0),
                    phi_weight: Some(1.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let mut cell = cell_with(Terrain::Jungle, &params, &[(1, 50.0), (1, 50.0)], &[]);
        let mut rng = StdRng::seed_from_u64(8);
        let target = Coord::new(1, 2);
        let herbivore_params = params.species(Species::Herbivore).clone();

        let candidates = [(target, 1.0)];
        let intents =
            cell.migration_intents(Species::Herbivore, &candidates, &herbivore_params, &mut rng);
        assert_eq!(intents, vec![(0, Destination::Move(target)), (1, Destination::Move(target))]);
        // Collections untouched, animals flagged
        assert_eq!(cell.count(Species::Herbivore), 2);
        assert!(cell.animals(Species::Herbivore).iter().all(Animal::has_moved));

        let again =
            cell.migration_intents(Species::Herbivore, &candidates, &herbivore_params, &mut rng);
        assert!(again.is_empty());

        let leaving = cell.take_migrants(Species::Herbivore, &intents);
        assert_eq!(leaving.len(), 2);
        assert_eq!(cell.count(Species::Herbivore), 0);
    }

    #[test]
    fn test_stay_intent_keeps_animal() {
        let params = Parameters::default();
        let mut cell = cell_with(Terrain::Jungle, &params, &[(1, 20.0), (1, 20.0)], &[]);
        let leaving = cell.take_migrants(
            Species::Herbivore,
            &[(0, Destination::Stay), (1, Destination::Move(Coord::new(0, 1)))],
        );
        assert_eq!(leaving.len(), 1);
        assert_eq!(leaving[0].0, Coord::new(0, 1));
        assert_eq!(cell.count(Species::Herbivore), 1);
    }

    #[test]
    fn test_age_and_weight_loss_cycles() {
        let params = Parameters::default();
        let mut cell = cell_with(Terrain::Jungle, &params, &[(5, 20.0)], &[(7, 16.0)]);
        cell.age_cycle();
        cell.weight_loss_cycle(&params);
        let h = &cell.animals(Species::Herbivore)[0];
        let c = &cell.animals(Species::Carnivore)[0];
        assert_eq!(h.age(), 6);
        assert_eq!(c.age(), 8);
        assert!((h.weight() - 19.0).abs() < 1e-12);
        assert!((c.weight() - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_death_cycle() {
        let mut params = Parameters::default();
        let mut rng = StdRng::seed_from_u64(9);
        let herbs: Vec<(u32, f64)> = (0..50).map(|_| (5, 20.0)).collect();

        let mut immortal = params.clone();
        immortal
            .update_species(
                Species::Herbivore,
                &SpeciesParamsUpdate {
                    omega: Some(0.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let mut cell = cell_with(Terrain::Jungle, &immortal, &herbs, &[]);
        assert_eq!(cell.death_cycle(&immortal, &mut rng), 0);
        assert_eq!(cell.count(Species::Herbivore), 50);

        params
            .update_species(
                Species::Herbivore,
                &SpeciesParamsUpdate {
                    omega: Some(1.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let old: Vec<(u32, f64)> = (0..50).map(|_| (200, 1.0)).collect();
        let mut cell = cell_with(Terrain::Jungle, &params, &old, &[]);
        let deaths = cell.death_cycle(&params, &mut rng);
        assert!(deaths > 40);
        assert_eq!(cell.count(Species::Herbivore), 50 - deaths);
    }

    #[test]
    fn test_relative_food() {
        let params = Parameters::default();
        let herbs = [(5, 20.0), (5, 30.0), (5, 50.0)];
        let cell = cell_with(Terrain::Jungle, &params, &herbs, &[(5, 20.0)]);
        // 800 / (4 * 10)
        assert!((cell.relative_food(Species::Herbivore, &params) - 20.0).abs() < 1e-12);
        // 100 / (2 * 50)
        assert!((cell.relative_food(Species::Carnivore, &params) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_averages() {
        let params = Parameters::default();
        let cell = cell_with(Terrain::Jungle, &params, &[(4, 20.0), (6, 20.0)], &[]);
        assert_eq!(cell.average_age(Species::Herbivore), Some(5.0));
        assert_eq!(cell.average_age(Species::Carnivore), None);
        assert_eq!(cell.average_fitness(Species::Carnivore), None);
        let phi = cell.average_fitness(Species::Herbivore).unwrap();
        assert!((0.0..=1.0).contains(&phi));
    }
}
