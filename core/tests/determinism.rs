//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two runs, same seed, same configuration.
//! They must produce byte-identical datasets.
//! Any divergence is a blocker — do not merge until fixed.

use mfasynth_core::{
    config::{OutputFormat, SynthConfig},
    engine::SynthEngine,
    output,
    population::PopulationBuilder,
    rng::{RngBank, StageSlot},
};

fn run_to_csv(seed: u64) -> Vec<u8> {
    let mut config = SynthConfig::default_test();
    config.seed = Some(seed);
    let run = SynthEngine::run(&config).expect("pipeline run");
    let mut buffer = Vec::new();
    output::write_records(&run.records, OutputFormat::Csv, &mut buffer).expect("csv write");
    buffer
}

#[test]
fn same_seed_produces_byte_identical_datasets() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let csv_a = run_to_csv(SEED);
    let csv_b = run_to_csv(SEED);

    assert_eq!(
        csv_a.len(),
        csv_b.len(),
        "Dataset lengths differ: {} vs {}",
        csv_a.len(),
        csv_b.len()
    );
    assert!(csv_a == csv_b, "Datasets diverged under identical seed");
}

#[test]
fn different_seeds_produce_different_datasets() {
    let csv_a = run_to_csv(42);
    let csv_b = run_to_csv(99);

    assert!(
        csv_a != csv_b,
        "Different seeds produced identical datasets — seed is not being used"
    );
}

#[test]
fn generated_pools_are_identical_across_independent_runs() {
    // 100 employees, 10 applications, fixed seed: the built population
    // must match element-for-element between two independent builds.
    let mut config = SynthConfig::default_test();
    config.employee_count = 100;
    config.application_count = 10;

    let mut rng_a = RngBank::new(7).for_stage(StageSlot::Population);
    let pop_a = PopulationBuilder::build(&config, &mut rng_a).expect("build a");

    let mut rng_b = RngBank::new(7).for_stage(StageSlot::Population);
    let pop_b = PopulationBuilder::build(&config, &mut rng_b).expect("build b");

    assert_eq!(pop_a.employees, pop_b.employees, "Employee pools diverged");
    assert_eq!(
        pop_a.applications, pop_b.applications,
        "Application pools diverged"
    );
}

#[test]
fn correction_is_reproducible_under_fixed_seed() {
    // The correction pass draws from the seeded stream too; flipped
    // record ids must match across runs.
    const SEED: u64 = 1234;

    let mut config = SynthConfig::default_test();
    config.seed = Some(SEED);

    let run_a = SynthEngine::run(&config).expect("run a");
    let run_b = SynthEngine::run(&config).expect("run b");

    let flipped_a: Vec<&str> = run_a
        .records
        .iter()
        .zip(run_b.records.iter())
        .filter(|(a, b)| a != b)
        .map(|(a, _)| a.event_id.as_str())
        .collect();
    assert!(
        flipped_a.is_empty(),
        "Corrected record sets diverged at: {flipped_a:?}"
    );

    match (&run_a.correction, &run_b.correction) {
        (Some(a), Some(b)) => {
            assert_eq!(a.records_flipped, b.records_flipped);
            assert_eq!(a.rate_after.to_bits(), b.rate_after.to_bits());
        }
        _ => panic!("correction enabled in default_test but report missing"),
    }
}
