//! Declarative initial populations.
//!
//! ```json
//! [{"loc": [3, 3], "pop": [{"species": "Herbivore", "age": 5, "weight": 20, "count": 150}]}]
//! ```
//!
//! Locations are one-based `(row, col)`. An omitted weight is drawn from the
//! species' birth-weight distribution.

use biosim_logic::species::Species;
use serde::{Deserialize, Serialize};

use crate::common::Coord;
use crate::error::SimError;

/// Animals to insert into one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationEntry {
    pub loc: (usize, usize),
    pub pop: Vec<AnimalSpec>,
}

impl PopulationEntry {
    pub fn coord(&self) -> Result<Coord, SimError> {
        let (row, col) = self.loc;
        Coord::from_one_based(row, col).ok_or(SimError::InvalidLocation { row, col })
    }

    pub fn animal_count(&self) -> usize {
        self.pop.iter().map(|spec| spec.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalSpec {
    pub species: Species,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Number of identical animals.
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

impl AnimalSpec {
    pub fn new(species: Species, age: u32, weight: f64) -> Self {
        Self {
            species,
            age,
            weight: Some(weight),
            count: 1,
        }
    }

    pub fn times(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// 150 herbivores and 40 carnivores, age 5 and weight 20, in cell (3, 3).
pub fn default_population() -> Vec<PopulationEntry> {
    vec![
        PopulationEntry {
            loc: (3, 3),
            pop: vec![AnimalSpec::new(Species::Herbivore, 5, 20.0).times(150)],
        },
        PopulationEntry {
            loc: (3, 3),
            pop: vec![AnimalSpec::new(Species::Carnivore, 5, 20.0).times(40)],
        },
    ]
}

pub fn parse_population(json: &str) -> Result<Vec<PopulationEntry>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_population() {
        let entries = parse_population(
            r#"[
                {"loc": [10, 10], "pop": [
                    {"species": "Herbivore", "age": 5, "weight": 20, "count": 3},
                    {"species": "Carnivore", "age": 2}
                ]}
            ]"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].coord().unwrap(), Coord::new(9, 9));
        assert_eq!(entries[0].animal_count(), 4);
        assert_eq!(entries[0].pop[1].weight, None);
        assert_eq!(entries[0].pop[1].count, 1);
    }

    #[test]
    fn test_unknown_species_rejected() {
        let result = parse_population(r#"[{"loc": [1, 1], "pop": [{"species": "Wolf"}]}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_location_rejected() {
        let entry = PopulationEntry {
            loc: (0, 2),
            pop: Vec::new(),
        };
        assert_eq!(entry.coord(), Err(SimError::InvalidLocation { row: 0, col: 2 }));
    }

    #[test]
    fn test_default_population() {
        let total: usize = default_population().iter().map(PopulationEntry::animal_count).sum();
        assert_eq!(total, 190);
    }
}
