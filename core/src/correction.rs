//! Target correction engine.
//!
//! Post-processes the full record set: isolates the current calendar
//! month, and if its realized compliance rate misses the configured
//! target by more than the tolerance, flips the minimum number of
//! randomly selected records to hit the target count exactly.
//!
//! RULES:
//!   - Period membership is decided by (year, month) integer equality on
//!     the month bucket — never by full-date comparison.
//!   - Selection is without replacement: a shrinking index list, one
//!     swap-remove per pick. No record is flipped twice.
//!   - A flip keeps the derived-field relation intact: when the record's
//!     application requires MFA, mfa_used follows the new compliance
//!     state. Records compliant only because their application does not
//!     require MFA are excluded from the lowering pool — they cannot be
//!     made non-compliant without breaking the relation.
//!   - Candidate exhaustion is a warning, not an error. The report
//!     carries whatever rate was actually achieved.

use crate::{
    config::SynthConfig,
    rng::StageRng,
    synthesizer::SignInRecord,
    types::year_month,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionReport {
    /// Target period, "YYYY-MM".
    pub period: String,
    /// Records whose month bucket fell in the target period.
    pub period_records: usize,
    pub rate_before: f64,
    pub target: f64,
    pub tolerance: f64,
    pub records_flipped: usize,
    pub rate_after: f64,
    pub within_tolerance: bool,
}

pub struct CorrectionEngine;

impl CorrectionEngine {
    /// Run one correction pass over the record set. Mutates at most
    /// `need` records in place; every other record is untouched.
    pub fn apply(
        records: &mut [SignInRecord],
        config: &SynthConfig,
        rng: &mut StageRng,
    ) -> CorrectionReport {
        let period = year_month(config.current_date);
        let period_label = format!("{:04}-{:02}", period.0, period.1);
        let target = config.target_compliance_rate;
        let tolerance = config.correction_tolerance;

        let in_period: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| year_month(r.month_bucket) == period)
            .map(|(i, _)| i)
            .collect();

        if in_period.is_empty() {
            log::warn!(
                "correction: no records found for target period {period_label}; nothing to adjust"
            );
            return CorrectionReport {
                period: period_label,
                period_records: 0,
                rate_before: 0.0,
                target,
                tolerance,
                records_flipped: 0,
                rate_after: 0.0,
                within_tolerance: false,
            };
        }

        let total = in_period.len();
        let compliant_before = in_period
            .iter()
            .filter(|&&i| records[i].compliant)
            .count();
        let rate_before = compliant_before as f64 / total as f64;

        if (rate_before - target).abs() <= tolerance {
            log::info!(
                "correction: {period_label} rate {rate_before:.4} already within {tolerance} of {target}; no flips"
            );
            return CorrectionReport {
                period: period_label,
                period_records: total,
                rate_before,
                target,
                tolerance,
                records_flipped: 0,
                rate_after: rate_before,
                within_tolerance: true,
            };
        }

        let target_compliant = (total as f64 * target).round() as i64;
        let raising = (compliant_before as i64) < target_compliant;
        let need = (target_compliant - compliant_before as i64).unsigned_abs() as usize;

        // Candidate pool of the required polarity. When lowering, only
        // records whose application requires MFA are flippable.
        let mut pool: Vec<usize> = in_period
            .iter()
            .copied()
            .filter(|&i| {
                let r = &records[i];
                if raising {
                    !r.compliant
                } else {
                    r.compliant && r.app_mfa_required
                }
            })
            .collect();

        let to_flip = need.min(pool.len());
        if to_flip < need {
            log::warn!(
                "correction: {period_label} needs {need} flips but only {} candidates exist; applying best-effort partial correction",
                pool.len()
            );
        }

        for _ in 0..to_flip {
            let pick = rng.int_range(0, pool.len() as i64 - 1) as usize;
            let idx = pool.swap_remove(pick);
            let record = &mut records[idx];
            record.compliant = raising;
            if record.app_mfa_required {
                record.mfa_used = raising;
            }
        }

        let compliant_after = in_period
            .iter()
            .filter(|&&i| records[i].compliant)
            .count();
        let rate_after = compliant_after as f64 / total as f64;
        let within_tolerance = (rate_after - target).abs() <= tolerance;

        log::info!(
            "correction: {period_label} rate {rate_before:.4} -> {rate_after:.4} (target {target}, {to_flip} flips)"
        );

        CorrectionReport {
            period: period_label,
            period_records: total,
            rate_before,
            target,
            tolerance,
            records_flipped: to_flip,
            rate_after,
            within_tolerance,
        }
    }
}
