//! BioSim Headless Simulation Harness
//!
//! Runs the demonstration island for a number of years, prints the yearly
//! totals and checks engine invariants along the way.
//!
//! Usage:
//!   cargo run -p biosim-simtest
//!   cargo run -p biosim-simtest -- --years 200 --seed 1 --verbose
//!   cargo run -p biosim-simtest -- --map island.txt --json
//!
//! `RUST_LOG=debug` shows per-phase counts from the engine.

use biosim_core::generation::{parse_population, PopulationEntry};
use biosim_core::prelude::*;
use serde::Serialize;

// ── Demonstration data ──────────────────────────────────────────────────
const ISLAND_MAP: &str = include_str!("../../../data/default_island.txt");
const POPULATION_JSON: &str = include_str!("../../../data/default_population.json");

// ── Command line ────────────────────────────────────────────────────────

struct Options {
    years: u32,
    seed: u64,
    map_path: Option<String>,
    json: bool,
    verbose: bool,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options {
        years: 100,
        seed: 656412,
        map_path: None,
        json: false,
        verbose: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--years" => opts.years = parse_value(&arg, args.next())?,
            "--seed" => opts.seed = parse_value(&arg, args.next())?,
            "--map" => opts.map_path = Some(args.next().ok_or("--map needs a path")?),
            "--json" => opts.json = true,
            "--verbose" => opts.verbose = true,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(opts)
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{}: invalid value {:?}", flag, value))
}

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    years: u32,
    history: &'a [CellCount],
    final_counts: CellCount,
    results: &'a [TestResult],
}

fn main() {
    env_logger::init();

    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let map = match &opts.map_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("error: cannot read {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => ISLAND_MAP.to_string(),
    };

    if !opts.json {
        println!("=== BioSim Simulation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Island and population setup
    let Some((mut engine, population)) = setup(&map, opts.seed, &mut results) else {
        finish(&opts, None, &results);
    };

    // 2. Yearly run, carnivores re-released halfway
    results.extend(run_years(&mut engine, &population, &opts));

    // 3. Same seed, same island
    results.extend(validate_determinism(&map, &population, &engine, &opts));

    finish(&opts, Some(&engine), &results);
}

fn finish(opts: &Options, engine: Option<&SimulationEngine>, results: &[TestResult]) -> ! {
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if opts.json {
        let report = Report {
            seed: opts.seed,
            years: engine.map(SimulationEngine::year).unwrap_or(0),
            history: engine.map(SimulationEngine::history).unwrap_or(&[]),
            final_counts: engine.map(SimulationEngine::animal_counts).unwrap_or_default(),
            results,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("error: cannot encode report: {}", e),
        }
    } else {
        println!();
        for r in results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || opts.verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    std::process::exit(if failed > 0 { 1 } else { 0 });
}

// ── 1. Setup ────────────────────────────────────────────────────────────

fn setup(
    map: &str,
    seed: u64,
    results: &mut Vec<TestResult>,
) -> Option<(SimulationEngine, Vec<PopulationEntry>)> {
    let mut engine = match SimulationEngine::new(map, seed) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "island_map".into(),
                passed: false,
                detail: e.to_string(),
            });
            return None;
        }
    };
    let island = engine.island();
    results.push(TestResult {
        name: "island_map".into(),
        passed: true,
        detail: format!("{}x{} cells", island.rows(), island.cols()),
    });

    let population = match parse_population(POPULATION_JSON) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "population_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return None;
        }
    };

    let expected: usize = population.iter().map(PopulationEntry::animal_count).sum();
    match engine.add_population(&population) {
        Ok(added) => results.push(TestResult {
            name: "population_placed".into(),
            passed: added == expected && engine.total_animals() == expected,
            detail: format!("{} of {} animals placed", added, expected),
        }),
        Err(e) => {
            results.push(TestResult {
                name: "population_placed".into(),
                passed: false,
                detail: e.to_string(),
            });
            return None;
        }
    }

    Some((engine, population))
}

// ── 2. Yearly run ───────────────────────────────────────────────────────

fn run_years(
    engine: &mut SimulationEngine,
    population: &[PopulationEntry],
    opts: &Options,
) -> Vec<TestResult> {
    let mut results = Vec::new();
    let carnivores: Vec<PopulationEntry> = population
        .iter()
        .filter(|e| e.pop.iter().all(|a| a.species == Species::Carnivore))
        .cloned()
        .collect();

    let mut violations: Vec<String> = Vec::new();
    for _ in 0..opts.years {
        if engine.year() == opts.years / 2 && !carnivores.is_empty() {
            if let Err(e) = engine.add_population(&carnivores) {
                violations.push(format!("re-release failed: {}", e));
            }
        }

        let counts_before = engine.animal_counts();
        engine.run_year();
        let counts = engine.animal_counts();
        if !opts.json {
            println!(
                "  year {:4}: {:6} herbivores {:6} carnivores",
                engine.year(),
                counts.herbivores,
                counts.carnivores
            );
        }

        let stats = engine.last_stats();
        let expected = counts_before.total() + stats.births - stats.kills - stats.deaths;
        if counts.total() != expected {
            violations.push(format!(
                "year {}: {} animals, bookkeeping says {}",
                engine.year(),
                counts.total(),
                expected
            ));
        }
        violations.extend(check_island(engine));
    }

    results.push(TestResult {
        name: "years_simulated".into(),
        passed: engine.year() == opts.years,
        detail: format!("{} of {} years", engine.year(), opts.years),
    });
    results.push(TestResult {
        name: "history_length".into(),
        passed: engine.history().len() == engine.year() as usize,
        detail: format!("{} entries", engine.history().len()),
    });
    results.push(TestResult {
        name: "yearly_invariants".into(),
        passed: violations.is_empty(),
        detail: if violations.is_empty() {
            "fitness, weight, placement and fodder bounds held every year".into()
        } else {
            format!("{} violations, first: {}", violations.len(), violations[0])
        },
    });

    if opts.verbose && !opts.json {
        let counts = engine.animal_counts();
        println!("  Final population: {:?}", counts);
        for species in Species::ALL {
            let occupied = engine
                .heatmap(species)
                .iter()
                .flatten()
                .filter(|&&n| n > 0)
                .count();
            println!("    {:10}: {} occupied cells", species.name(), occupied);
        }
    }

    results
}

fn check_island(engine: &SimulationEngine) -> Vec<String> {
    let mut problems = Vec::new();
    let params = engine.params();
    for (coord, cell) in engine.island().cells() {
        if !cell.is_passable() && cell.counts().total() > 0 {
            problems.push(format!("animals on {} at {}", cell.terrain(), coord));
        }
        if let Some(food) = params.food(cell.terrain()) {
            if cell.food() < 0.0 || cell.food() > food.f_max {
                problems.push(format!("fodder {} out of range at {}", cell.food(), coord));
            }
        }
        for species in Species::ALL {
            for animal in cell.animals(species) {
                if !(0.0..=1.0).contains(&animal.fitness()) || animal.weight() <= 0.0 {
                    problems.push(format!(
                        "{} at {}: weight {}, fitness {}",
                        species,
                        coord,
                        animal.weight(),
                        animal.fitness()
                    ));
                }
                if animal.coordinates() != coord || animal.has_moved() {
                    problems.push(format!("{} at {} has stale migration state", species, coord));
                }
            }
        }
    }
    problems
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(
    map: &str,
    population: &[PopulationEntry],
    reference: &SimulationEngine,
    opts: &Options,
) -> Vec<TestResult> {
    // Years before the carnivore re-release only.
    let years = (opts.years / 2).min(reference.year()).min(10);
    let seed = opts.seed;
    let replay = || -> Result<Vec<CellCount>, SimError> {
        let mut engine = SimulationEngine::new(map, seed)?;
        engine.add_population(population)?;
        for _ in 0..years {
            engine.run_year();
        }
        Ok(engine.history().to_vec())
    };

    let detail;
    let passed = match (replay(), replay()) {
        (Ok(a), Ok(b)) => {
            let prefix = &reference.history()[..years as usize];
            detail = format!("{} years replayed twice with seed {}", years, seed);
            a == b && a == prefix
        }
        (Err(e), _) | (_, Err(e)) => {
            detail = e.to_string();
            false
        }
    };

    vec![TestResult {
        name: "deterministic_replay".into(),
        passed,
        detail,
    }]
}
