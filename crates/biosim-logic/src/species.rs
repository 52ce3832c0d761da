//! Species tags and their shared parameter tables.
//!
//! One `SpeciesParams` table exists per species and is read by every animal
//! of that species. Tables change only through [`SpeciesParams::apply`],
//! which validates the whole update before merging any of it.
//!
//! ```
//! use biosim_logic::species::{SpeciesParams, SpeciesParamsUpdate};
//!
//! let mut params = SpeciesParams::herbivore();
//! let update = SpeciesParamsUpdate { mu: Some(0.5), ..Default::default() };
//! params.apply(&update).unwrap();
//! assert_eq!(params.mu, 0.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{check_value, ParamError};

/// The two competing species on the island.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Grazer: eats fodder from the cell.
    Herbivore,
    /// Predator: eats herbivores.
    Carnivore,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Herbivore, Species::Carnivore];

    pub fn name(self) -> &'static str {
        match self {
            Species::Herbivore => "Herbivore",
            Species::Carnivore => "Carnivore",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters bounded to [0, 1] in addition to being non-negative.
pub const UNIT_BOUNDED: [&str; 5] = ["omega", "mu", "phi_age", "phi_weight", "gamma"];

/// Per-species constant table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Mean birth weight.
    pub w_birth: f64,
    /// Standard deviation of birth weight.
    pub sigma_birth: f64,
    /// Fraction of eaten mass converted to own weight.
    pub beta: f64,
    /// Fraction of weight lost each year.
    pub eta: f64,
    /// Age at which the age term of fitness is one half.
    pub a_half: f64,
    pub phi_age: f64,
    /// Weight at which the weight term of fitness is one half.
    pub w_half: f64,
    pub phi_weight: f64,
    /// Migration propensity scale.
    pub mu: f64,
    /// Preference for food-rich destinations.
    pub lambda: f64,
    /// Birth probability scale.
    pub gamma: f64,
    /// Minimum breeding weight, in units of `w_birth + sigma_birth`.
    pub zeta: f64,
    /// Weight lost by the parent per unit of birth weight.
    pub xi: f64,
    /// Death probability scale.
    pub omega: f64,
    /// Feeding capacity per year.
    #[serde(rename = "F")]
    pub f: f64,
    /// Largest fitness advantage at which a kill can still happen.
    /// Only predators carry this.
    #[serde(rename = "DeltaPhiMax", default)]
    pub delta_phi_max: Option<f64>,
}

impl SpeciesParams {
    pub fn herbivore() -> Self {
        Self {
            w_birth: 8.0,
            sigma_birth: 1.5,
            beta: 0.9,
            eta: 0.05,
            a_half: 40.0,
            phi_age: 0.2,
            w_half: 10.0,
            phi_weight: 0.1,
            mu: 0.25,
            lambda: 1.0,
            gamma: 0.2,
            zeta: 3.5,
            xi: 1.2,
            omega: 0.4,
            f: 10.0,
            delta_phi_max: None,
        }
    }

    pub fn carnivore() -> Self {
        Self {
            w_birth: 6.0,
            sigma_birth: 1.0,
            beta: 0.75,
            eta: 0.125,
            a_half: 60.0,
            phi_age: 0.4,
            w_half: 4.0,
            phi_weight: 0.4,
            mu: 0.4,
            lambda: 1.0,
            gamma: 0.8,
            zeta: 3.5,
            xi: 1.1,
            omega: 0.9,
            f: 50.0,
            delta_phi_max: Some(10.0),
        }
    }

    pub fn default_for(species: Species) -> Self {
        match species {
            Species::Herbivore => Self::herbivore(),
            Species::Carnivore => Self::carnivore(),
        }
    }

    /// Validate `update` and merge the supplied keys. On error nothing is changed.
    pub fn apply(&mut self, update: &SpeciesParamsUpdate) -> Result<(), ParamError> {
        update.validate()?;

        if let Some(v) = update.w_birth {
            self.w_birth = v;
        }
        if let Some(v) = update.sigma_birth {
            self.sigma_birth = v;
        }
        if let Some(v) = update.beta {
            self.beta = v;
        }
        if let Some(v) = update.eta {
            self.eta = v;
        }
        if let Some(v) = update.a_half {
            self.a_half = v;
        }
        if let Some(v) = update.phi_age {
            self.phi_age = v;
        }
        if let Some(v) = update.w_half {
            self.w_half = v;
        }
        if let Some(v) = update.phi_weight {
            self.phi_weight = v;
        }
        if let Some(v) = update.mu {
            self.mu = v;
        }
        if let Some(v) = update.lambda {
            self.lambda = v;
        }
        if let Some(v) = update.gamma {
            self.gamma = v;
        }
        if let Some(v) = update.zeta {
            self.zeta = v;
        }
        if let Some(v) = update.xi {
            self.xi = v;
        }
        if let Some(v) = update.omega {
            self.omega = v;
        }
        if let Some(v) = update.f {
            self.f = v;
        }
        if let Some(v) = update.delta_phi_max {
            self.delta_phi_max = Some(v);
        }
        Ok(())
    }

    /// Weight below which an animal never breeds.
    pub fn breeding_threshold(&self) -> f64 {
        self.zeta * (self.w_birth + self.sigma_birth)
    }
}

/// Partial update of a species table; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesParamsUpdate {
    pub w_birth: Option<f64>,
    pub sigma_birth: Option<f64>,
    pub beta: Option<f64>,
    pub eta: Option<f64>,
    pub a_half: Option<f64>,
    pub phi_age: Option<f64>,
    pub w_half: Option<f64>,
    pub phi_weight: Option<f64>,
    pub mu: Option<f64>,
    pub lambda: Option<f64>,
    pub gamma: Option<f64>,
    pub zeta: Option<f64>,
    pub xi: Option<f64>,
    pub omega: Option<f64>,
    #[serde(rename = "F")]
    pub f: Option<f64>,
    #[serde(rename = "DeltaPhiMax")]
    pub delta_phi_max: Option<f64>,
}

impl SpeciesParamsUpdate {
    fn entries(&self) -> [(&'static str, Option<f64>); 16] {
        [
            ("w_birth", self.w_birth),
            ("sigma_birth", self.sigma_birth),
            ("beta", self.beta),
            ("eta", self.eta),
            ("a_half", self.a_half),
            ("phi_age", self.phi_age),
            ("w_half", self.w_half),
            ("phi_weight", self.phi_weight),
            ("mu", self.mu),
            ("lambda", self.lambda),
            ("gamma", self.gamma),
            ("zeta", self.zeta),
            ("xi", self.xi),
            ("omega", self.omega),
            ("F", self.f),
            ("DeltaPhiMax", self.delta_phi_max),
        ]
    }

    /// Check every supplied value without applying anything.
    pub fn validate(&self) -> Result<(), ParamError> {
        for (key, value) in self.entries() {
            if let Some(value) = value {
                check_value(key, value, UNIT_BOUNDED.contains(&key))?;
            }
        }
        Ok(())
    }

    /// Number of keys this update would change.
    pub fn len(&self) -> usize {
        self.entries().iter().filter(|(_, v)| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for species in Species::ALL {
            let p = SpeciesParams::default_for(species);
            assert!(p.w_birth > 0.0);
            assert!(p.omega <= 1.0 && p.mu <= 1.0 && p.gamma <= 1.0);
        }
        assert!(SpeciesParams::herbivore().delta_phi_max.is_none());
        assert_eq!(SpeciesParams::carnivore().delta_phi_max, Some(10.0));
    }

    #[test]
    fn test_apply_replaces_only_supplied_keys() {
        let mut p = SpeciesParams::herbivore();
        let update = SpeciesParamsUpdate {
            f: Some(15.0),
            eta: Some(0.1),
            ..Default::default()
        };
        assert_eq!(update.len(), 2);
        p.apply(&update).unwrap();
        assert_eq!(p.f, 15.0);
        assert_eq!(p.eta, 0.1);
        assert_eq!(p.w_birth, 8.0);
        assert_eq!(p.omega, 0.4);
    }

    #[test]
    fn test_negative_value_rejected_without_partial_apply() {
        let mut p = SpeciesParams::carnivore();
        let before = p.clone();
        let update = SpeciesParamsUpdate {
            f: Some(70.0),
            zeta: Some(-1.0),
            ..Default::default()
        };
        let err = p.apply(&update).unwrap_err();
        assert_eq!(err, ParamError::Negative { key: "zeta", value: -1.0 });
        assert_eq!(p, before);
    }

    #[test]
    fn test_unit_bounded_keys() {
        for key in UNIT_BOUNDED {
            let mut update = SpeciesParamsUpdate::default();
            match key {
                "omega" => update.omega = Some(1.2),
                "mu" => update.mu = Some(1.2),
                "phi_age" => update.phi_age = Some(1.2),
                "phi_weight" => update.phi_weight = Some(1.2),
                "gamma" => update.gamma = Some(1.2),
                _ => unreachable!(),
            }
            assert!(matches!(
                update.validate(),
                Err(ParamError::OutOfUnitRange { .. })
            ));
        }

        // Unbounded keys may exceed one.
        let update = SpeciesParamsUpdate {
            lambda: Some(3.0),
            xi: Some(1.5),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_from_json_uses_short_keys() {
        let update: SpeciesParamsUpdate =
            serde_json::from_str(r#"{"F": 20.0, "DeltaPhiMax": 5.0}"#).unwrap();
        assert_eq!(update.f, Some(20.0));
        assert_eq!(update.delta_phi_max, Some(5.0));

        let unknown = serde_json::from_str::<SpeciesParamsUpdate>(r#"{"speed": 1.0}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn test_breeding_threshold() {
        let p = SpeciesParams::herbivore();
        assert!((p.breeding_threshold() - 3.5 * 9.5).abs() < 1e-12);
    }
}
