//! Island-wide parameter tables.
//!
//! One table per species and one fodder table per food-growing terrain.
//! Every animal and cell reads from here; nothing keeps a private copy.
//! The version counter moves on every accepted update.

use biosim_logic::landscape::{FoodParams, FoodParamsUpdate, Terrain};
use biosim_logic::species::{Species, SpeciesParams, SpeciesParamsUpdate};
use biosim_logic::ParamError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    herbivore: SpeciesParams,
    carnivore: SpeciesParams,
    jungle: FoodParams,
    savannah: FoodParams,
    #[serde(skip)]
    version: u64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            herbivore: SpeciesParams::herbivore(),
            carnivore: SpeciesParams::carnivore(),
            jungle: FoodParams::jungle(),
            savannah: FoodParams::savannah(),
            version: 0,
        }
    }
}

impl Parameters {
    pub fn species(&self, species: Species) -> &SpeciesParams {
        match species {
            Species::Herbivore => &self.herbivore,
            Species::Carnivore => &self.carnivore,
        }
    }

    /// Fodder table, `None` for terrain that grows nothing.
    pub fn food(&self, terrain: Terrain) -> Option<&FoodParams> {
        match terrain {
            Terrain::Jungle => Some(&self.jungle),
            Terrain::Savannah => Some(&self.savannah),
            Terrain::Desert | Terrain::Mountain | Terrain::Ocean => None,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn update_species(
        &mut self,
        species: Species,
        update: &SpeciesParamsUpdate,
    ) -> Result<(), ParamError> {
        let table = match species {
            Species::Herbivore => &mut self.herbivore,
            Species::Carnivore => &mut self.carnivore,
        };
        table.apply(update)?;
        self.version += 1;
        Ok(())
    }

    pub fn update_food(
        &mut self,
        terrain: Terrain,
        update: &FoodParamsUpdate,
    ) -> Result<(), ParamError> {
        let table = match terrain {
            Terrain::Jungle => &mut self.jungle,
            Terrain::Savannah => &mut self.savannah,
            Terrain::Desert | Terrain::Mountain | Terrain::Ocean => {
                return Err(ParamError::NoFoodParameters(terrain));
            }
        };
        table.apply(update)?;
        self.version += 1;
        Ok(())
    }
}
