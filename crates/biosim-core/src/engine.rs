//! Simulation engine - main entry point for running the island

use biosim_logic::landscape::{FoodParamsUpdate, Terrain};
use biosim_logic::species::{Species, SpeciesParamsUpdate};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cell::CellCount;
use crate::error::SimError;
use crate::generation::{default_population, PopulationEntry, DEFAULT_MAP};
use crate::island::{Island, YearStats, YearSummary};
use crate::params::Parameters;

/// Main simulation engine
pub struct SimulationEngine {
    island: Island,
    /// Single generator for every stochastic decision
    rng: ChaCha8Rng,
    seed: u64,
    /// Years simulated so far
    year: u32,
    /// Island totals after each simulated year
    history: Vec<CellCount>,
    last_stats: YearStats,
}

impl SimulationEngine {
    /// Create an engine for `map` with default parameters and no animals.
    pub fn new(map: &str, seed: u64) -> Result<Self, SimError> {
        let island = Island::from_map(map, Parameters::default())?;
        Ok(Self {
            island,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            year: 0,
            history: Vec::new(),
            last_stats: YearStats::default(),
        })
    }

    /// The small default island stocked with the default population.
    pub fn default_island(seed: u64) -> Result<Self, SimError> {
        let mut engine = Self::new(DEFAULT_MAP, seed)?;
        engine.add_population(&default_population())?;
        Ok(engine)
    }

    /// Insert animals. Allowed between years as well as before the first.
    pub fn add_population(&mut self, entries: &[PopulationEntry]) -> Result<usize, SimError> {
        let added = self.island.add_population(entries, &mut self.rng)?;
        log::info!("Added {} animals before year {}", added, self.year + 1);
        Ok(added)
    }

    pub fn set_species_params(
        &mut self,
        species: Species,
        update: &SpeciesParamsUpdate,
    ) -> Result<(), SimError> {
        self.island.set_species_params(species, update)?;
        log::debug!("Updated {} parameters ({} keys)", species, update.len());
        Ok(())
    }

    pub fn set_food_params(
        &mut self,
        terrain: Terrain,
        update: &FoodParamsUpdate,
    ) -> Result<(), SimError> {
        self.island.set_food_params(terrain, update)?;
        log::debug!("Updated {} food parameters", terrain);
        Ok(())
    }

    /// Simulate one year.
    pub fn run_year(&mut self) -> YearSummary {
        let (summary, stats) = self.island.one_year(&mut self.rng);
        self.year += 1;

        let totals = summary.totals();
        log::debug!(
            "Year {}: {} kills, {} births, {} migrations, {} deaths",
            self.year,
            stats.kills,
            stats.births,
            stats.migrations,
            stats.deaths
        );
        log::info!(
            "Year {}: {} herbivores, {} carnivores",
            self.year,
            totals.herbivores,
            totals.carnivores
        );

        self.history.push(totals);
        self.last_stats = stats;
        summary
    }

    /// Run up to `years` years, stopping once both species are gone.
    /// Returns the number of years actually simulated.
    pub fn simulate(&mut self, years: u32) -> u32 {
        let mut run = 0;
        while run < years {
            if self.is_extinct() {
                log::warn!("Both species extinct after year {}, stopping", self.year);
                break;
            }
            self.run_year();
            run += 1;
        }
        run
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn island(&self) -> &Island {
        &self.island
    }

    pub fn params(&self) -> &Parameters {
        self.island.params()
    }

    /// Species totals right now.
    pub fn animal_counts(&self) -> CellCount {
        self.per_cell_counts().totals()
    }

    pub fn total_animals(&self) -> usize {
        self.island.animal_count()
    }

    pub fn per_cell_counts(&self) -> YearSummary {
        self.island.year_summary()
    }

    pub fn heatmap(&self, species: Species) -> Vec<Vec<usize>> {
        self.per_cell_counts().heatmap(species)
    }

    pub fn history(&self) -> &[CellCount] {
        &self.history
    }

    /// Phase counters of the most recent year.
    pub fn last_stats(&self) -> YearStats {
        self.last_stats
    }

    pub fn is_extinct(&self) -> bool {
        self.total_animals() == 0
    }
}
