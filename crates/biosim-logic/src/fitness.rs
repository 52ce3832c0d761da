//! Pure lifecycle formulas.
//!
//! Every stochastic decision in the engine is "probability > uniform draw";
//! the probabilities live here so they can be tested without an RNG.

use crate::species::SpeciesParams;

/// Logistic term `1 / (1 + e^(sign * phi * (x - x_half)))`.
fn q(sign: f64, x: f64, x_half: f64, phi: f64) -> f64 {
    1.0 / (1.0 + (sign * phi * (x - x_half)).exp())
}

/// Fitness in [0, 1]: falls with age, rises with weight.
///
/// An animal with no weight left has fitness 0.
pub fn fitness(age: u32, weight: f64, params: &SpeciesParams) -> f64 {
    if weight <= 0.0 {
        return 0.0;
    }
    q(1.0, age as f64, params.a_half, params.phi_age)
        * q(-1.0, weight, params.w_half, params.phi_weight)
}

/// Yearly death probability. Zero or negative weight is certain death.
pub fn death_probability(fitness: f64, weight: f64, params: &SpeciesParams) -> f64 {
    if weight <= 0.0 {
        return 1.0;
    }
    params.omega * (1.0 - fitness)
}

/// Probability of giving birth this year when `same_species` animals,
/// including this one, share the cell.
pub fn birth_probability(
    weight: f64,
    fitness: f64,
    same_species: usize,
    params: &SpeciesParams,
) -> f64 {
    if weight < params.breeding_threshold() || same_species < 2 {
        return 0.0;
    }
    (params.gamma * fitness * (same_species - 1) as f64).min(1.0)
}

pub fn migration_probability(fitness: f64, params: &SpeciesParams) -> f64 {
    params.mu * fitness
}

/// Probability that a predator kills a given prey.
///
/// Zero when the predator is not fitter than the prey, and zero when its
/// advantage reaches `delta_phi_max`.
pub fn predation_probability(predator_fitness: f64, prey_fitness: f64, delta_phi_max: f64) -> f64 {
    let diff = predator_fitness - prey_fitness;
    if diff <= 0.0 || diff >= delta_phi_max {
        return 0.0;
    }
    diff / delta_phi_max
}

/// Normalized destination weights proportional to `e^(lambda * relative_food)`.
///
/// Shifted by the largest exponent before exponentiating; the shift cancels
/// in the normalization.
pub fn migration_weights(relative_food: &[f64], lambda: f64) -> Vec<f64> {
    if relative_food.is_empty() {
        return Vec::new();
    }
    let max = relative_food
        .iter()
        .map(|rf| lambda * rf)
        .fold(f64::NEG_INFINITY, f64::max);
    let raw: Vec<f64> = relative_food
        .iter()
        .map(|rf| (lambda * rf - max).exp())
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Food per prospective eater: `food / ((count + 1) * capacity)`.
///
/// The `+ 1` stands for the animal considering moving in.
pub fn relative_food(food: f64, count: usize, capacity: f64) -> f64 {
    let denominator = (count + 1) as f64 * capacity;
    if denominator <= 0.0 {
        return 0.0;
    }
    food / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitness_reference_value() {
        let p = SpeciesParams::herbivore();
        // At a_half and w_half both terms are one half.
        let phi = fitness(40, 10.0, &p);
        assert!((phi - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_fitness_bounds_and_monotonicity() {
        for params in [SpeciesParams::herbivore(), SpeciesParams::carnivore()] {
            for age in 0..120u32 {
                let mut previous = 0.0;
                for w in 1..200 {
                    let phi = fitness(age, w as f64 * 0.5, &params);
                    assert!((0.0..=1.0).contains(&phi));
                    assert!(phi >= previous, "weight increase lowered fitness");
                    previous = phi;
                }
            }
            for w in 1..100 {
                let weight = w as f64;
                let mut previous = 1.0;
                for age in 0..150u32 {
                    let phi = fitness(age, weight, &params);
                    assert!(phi <= previous, "age increase raised fitness");
                    previous = phi;
                }
            }
        }
    }

    #[test]
    fn test_fitness_zero_weight() {
        let p = SpeciesParams::carnivore();
        assert_eq!(fitness(3, 0.0, &p), 0.0);
        assert_eq!(fitness(3, -1.0, &p), 0.0);
    }

    #[test]
    fn test_death_probability() {
        let p = SpeciesParams::herbivore();
        assert!((death_probability(0.5, 20.0, &p) - 0.2).abs() < 1e-12);
        assert_eq!(death_probability(1.0, 20.0, &p), 0.0);
        assert_eq!(death_probability(0.9, 0.0, &p), 1.0);
    }

    #[test]
    fn test_birth_probability() {
        let p = SpeciesParams::herbivore();
        // Below zeta * (w_birth + sigma_birth) = 33.25
        assert_eq!(birth_probability(30.0, 1.0, 10, &p), 0.0);
        // Alone in the cell
        assert_eq!(birth_probability(50.0, 1.0, 1, &p), 0.0);
        assert!((birth_probability(50.0, 0.5, 3, &p) - 0.2).abs() < 1e-12);
        assert_eq!(birth_probability(50.0, 1.0, 100, &p), 1.0);
    }

    #[test]
    fn test_predation_probability() {
        assert_eq!(predation_probability(0.4, 0.6, 10.0), 0.0);
        assert_eq!(predation_probability(0.5, 0.5, 10.0), 0.0);
        assert!((predation_probability(0.9, 0.4, 10.0) - 0.05).abs() < 1e-12);
        assert!((predation_probability(0.9, 0.4, 1.0) - 0.5).abs() < 1e-12);
        // Advantage at or above the threshold never kills
        assert_eq!(predation_probability(0.9, 0.1, 0.5), 0.0);
    }

    #[test]
    fn test_migration_weights() {
        assert!(migration_weights(&[], 1.0).is_empty());

        let w = migration_weights(&[1.0, 1.0, 1.0, 1.0], 1.0);
        for x in &w {
            assert!((x - 0.25).abs() < 1e-12);
        }

        let w = migration_weights(&[0.0, 2.0], 1.0);
        let expected = 1.0 / (1.0 + 2f64.exp());
        assert!((w[0] - expected).abs() < 1e-12);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);

        // Huge exponents stay finite
        let w = migration_weights(&[1000.0, 999.0], 10.0);
        assert!(w.iter().all(|x| x.is_finite()));
        assert!(w[0] > w[1]);
    }

    #[test]
    fn test_relative_food() {
        assert!((relative_food(100.0, 4, 10.0) - 2.0).abs() < 1e-12);
        assert!((relative_food(100.0, 0, 10.0) - 10.0).abs() < 1e-12);
        assert_eq!(relative_food(100.0, 3, 0.0), 0.0);
    }
}
