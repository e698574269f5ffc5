//! The pipeline driver.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Population build   — employees and applications
//!   2. Event synthesis    — record_count sequential draws
//!   3. Target correction  — current-period compliance steering
//!   4. Aggregation        — summary statistics + validation checks
//!
//! RULES:
//!   - Config is validated before anything is drawn.
//!   - All randomness flows through the RngBank stage streams.
//!   - The record set is owned here, lent mutably to the correction
//!     engine for exactly one pass, then read-only for reporting.
//!   - A missing seed resolves from the wall clock and is logged so the
//!     run can be replayed.

use crate::{
    config::SynthConfig,
    correction::{CorrectionEngine, CorrectionReport},
    error::SynthResult,
    population::{Population, PopulationBuilder},
    report::{Reporter, SummaryStats, ValidationOutcome},
    rng::{RngBank, StageSlot},
    synthesizer::{EventSynthesizer, SignInRecord},
};

/// Everything one pipeline run produces.
pub struct RunOutput {
    /// The seed actually used (resolved when config.seed was None).
    pub seed: u64,
    pub records: Vec<SignInRecord>,
    pub population: Population,
    pub correction: Option<CorrectionReport>,
    pub stats: SummaryStats,
    pub validation: Option<ValidationOutcome>,
}

pub struct SynthEngine;

impl SynthEngine {
    /// Run the full pipeline to completion.
    pub fn run(config: &SynthConfig) -> SynthResult<RunOutput> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(wall_clock_seed);
        log::info!(
            "engine: seed={seed} records={} employees={} applications={} current_date={}",
            config.record_count,
            config.employee_count,
            config.application_count,
            config.current_date
        );
        let bank = RngBank::new(seed);

        let mut rng = bank.for_stage(StageSlot::Population);
        let population = PopulationBuilder::build(config, &mut rng)?;

        let mut rng = bank.for_stage(StageSlot::Events);
        let mut synthesizer =
            EventSynthesizer::new(config, &population.employees, &population.applications);
        let mut records = Vec::with_capacity(config.record_count);
        for _ in 0..config.record_count {
            records.push(synthesizer.draw(&mut rng)?);
        }
        log::info!("engine: synthesized {} records", records.len());

        let correction = if config.correction_enabled {
            let mut rng = bank.for_stage(StageSlot::Correction);
            Some(CorrectionEngine::apply(&mut records, config, &mut rng))
        } else {
            None
        };

        let stats = Reporter::summarize(&records, &population.applications, config);
        let validation = if config.validation_enabled {
            Some(Reporter::validate(&stats, config))
        } else {
            None
        };

        Ok(RunOutput {
            seed,
            records,
            population,
            correction,
            stats,
            validation,
        })
    }
}

/// Unix-seconds fallback seed for non-reproducible runs.
fn wall_clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
