//! Terrain kinds and fodder regrowth.
//!
//! | Kind | Map letter | Passable | Fodder |
//! |------|------------|----------|--------|
//! | Jungle | `J` | yes | reset to `f_max` every year |
//! | Savannah | `S` | yes | grows by `alpha * (f_max - current)` |
//! | Desert | `D` | yes | none |
//! | Mountain | `M` | no | none |
//! | Ocean | `O` | no | none |

use serde::{Deserialize, Serialize};

use crate::error::{check_value, ParamError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Jungle,
    Savannah,
    Desert,
    Mountain,
    Ocean,
}

impl Terrain {
    pub const ALL: [Terrain; 5] = [
        Terrain::Jungle,
        Terrain::Savannah,
        Terrain::Desert,
        Terrain::Mountain,
        Terrain::Ocean,
    ];

    /// Map letter to terrain. Letters are case sensitive.
    pub fn from_char(symbol: char) -> Option<Self> {
        match symbol {
            'J' => Some(Terrain::Jungle),
            'S' => Some(Terrain::Savannah),
            'D' => Some(Terrain::Desert),
            'M' => Some(Terrain::Mountain),
            'O' => Some(Terrain::Ocean),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Terrain::Jungle => 'J',
            Terrain::Savannah => 'S',
            Terrain::Desert => 'D',
            Terrain::Mountain => 'M',
            Terrain::Ocean => 'O',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Terrain::Jungle => "Jungle",
            Terrain::Savannah => "Savannah",
            Terrain::Desert => "Desert",
            Terrain::Mountain => "Mountain",
            Terrain::Ocean => "Ocean",
        }
    }

    pub fn is_passable(self) -> bool {
        !matches!(self, Terrain::Mountain | Terrain::Ocean)
    }

    pub fn growth_rule(self) -> GrowthRule {
        match self {
            Terrain::Jungle => GrowthRule::Reset,
            Terrain::Savannah => GrowthRule::Regrow,
            Terrain::Desert | Terrain::Mountain | Terrain::Ocean => GrowthRule::Barren,
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a terrain kind replenishes fodder once a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthRule {
    /// Fodder is set back to `f_max`.
    Reset,
    /// Fodder approaches `f_max` by a fraction `alpha` of the gap.
    Regrow,
    /// No fodder ever.
    Barren,
}

/// Fodder table for one terrain kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodParams {
    /// Maximum fodder in a cell.
    #[serde(rename = "fmax")]
    pub f_max: f64,
    /// Regrowth fraction. Unused by `Reset` terrain.
    pub alpha: f64,
}

impl FoodParams {
    pub fn jungle() -> Self {
        Self {
            f_max: 800.0,
            alpha: 0.0,
        }
    }

    pub fn savannah() -> Self {
        Self {
            f_max: 300.0,
            alpha: 0.3,
        }
    }

    pub fn apply(&mut self, update: &FoodParamsUpdate) -> Result<(), ParamError> {
        update.validate()?;
        if let Some(v) = update.f_max {
            self.f_max = v;
        }
        if let Some(v) = update.alpha {
            self.alpha = v;
        }
        Ok(())
    }
}

/// Partial update of a fodder table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoodParamsUpdate {
    #[serde(rename = "fmax")]
    pub f_max: Option<f64>,
    pub alpha: Option<f64>,
}

impl FoodParamsUpdate {
    pub fn validate(&self) -> Result<(), ParamError> {
        if let Some(v) = self.f_max {
            check_value("fmax", v, false)?;
        }
        if let Some(v) = self.alpha {
            check_value("alpha", v, true)?;
        }
        Ok(())
    }
}

/// Fodder available after one year of growth.
pub fn grow_food(rule: GrowthRule, current: f64, params: &FoodParams) -> f64 {
    match rule {
        GrowthRule::Reset => params.f_max,
        // Stock left above a lowered f_max is cut back to it.
        GrowthRule::Regrow => {
            (current + params.alpha * (params.f_max - current)).min(params.f_max)
        }
        GrowthRule::Barren => 0.0,
    }
}
