//! Aggregation and validation reporter.
//!
//! Read-only consumer of the corrected record set. Computes summary
//! statistics and runs the tolerance checks against configuration
//! targets. Makes no mutations — correction truth is whatever the
//! record set says by the time it gets here.

use crate::{
    config::SynthConfig,
    population::Application,
    synthesizer::SignInRecord,
    types::year_month,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// How many worst offenders to surface.
const TOP_OFFENDERS: usize = 10;

/// Sampling tolerances for population-level checks. The population draws
/// are binomial; these bands sit near two standard deviations for the
/// baseline counts.
const COVERAGE_TOLERANCE: f64 = 0.15;
const ADMIN_SHARE_TOLERANCE: f64 = 0.05;
const TIER_SHARE_TOLERANCE: f64 = 0.15;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthTrend {
    /// "YYYY-MM".
    pub month: String,
    pub events: usize,
    pub mfa_rate: f64,
    pub compliance_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppBreakdown {
    pub app_id: u32,
    pub app_name: String,
    pub tier: String,
    pub mfa_required: bool,
    pub events: usize,
    pub compliance_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffenderEntry {
    pub employee_email: String,
    pub non_mfa_events: usize,
    pub total_events: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub mfa_usage_rate: f64,
    pub compliance_rate: f64,
    pub current_period: String,
    pub current_period_records: usize,
    pub current_period_compliance_rate: f64,
    /// In-scope applications with MFA required / in-scope applications.
    /// Vacuously 1.0 when no application is in scope.
    pub coverage: f64,
    pub in_scope_applications: usize,
    /// Distinct employees seen in the record set.
    pub distinct_employees: usize,
    pub admin_share: f64,
    /// Application count share per tier, ordered as RiskTier::ALL.
    pub tier_shares: [f64; 4],
    pub monthly_trend: Vec<MonthTrend>,
    pub app_breakdown: Vec<AppBreakdown>,
    /// Distinct-employee counts by personal MFA usage rate:
    /// [0,25), [25,50), [50,75), [75,100] percent.
    pub usage_buckets: [usize; 4],
    pub worst_offenders: Vec<OffenderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub expected: f64,
    pub actual: f64,
    pub tolerance: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub checks: Vec<ValidationCheck>,
    pub all_passed: bool,
}

pub struct Reporter;

impl Reporter {
    pub fn summarize(
        records: &[SignInRecord],
        applications: &[Application],
        config: &SynthConfig,
    ) -> SummaryStats {
        let total_records = records.len();
        let mfa_count = records.iter().filter(|r| r.mfa_used).count();
        let compliant_count = records.iter().filter(|r| r.compliant).count();

        // Monthly trend, keyed by bucket date so months sort naturally.
        let mut months: BTreeMap<chrono::NaiveDate, (usize, usize, usize)> = BTreeMap::new();
        for r in records {
            let entry = months.entry(r.month_bucket).or_default();
            entry.0 += 1;
            entry.1 += r.mfa_used as usize;
            entry.2 += r.compliant as usize;
        }
        let monthly_trend = months
            .iter()
            .map(|(bucket, (n, mfa, compliant))| MonthTrend {
                month: bucket.format("%Y-%m").to_string(),
                events: *n,
                mfa_rate: ratio(*mfa, *n),
                compliance_rate: ratio(*compliant, *n),
            })
            .collect();

        // Current-period slice, by (year, month) on the bucket.
        let period = year_month(config.current_date);
        let (period_n, period_compliant) = records
            .iter()
            .filter(|r| year_month(r.month_bucket) == period)
            .fold((0usize, 0usize), |(n, c), r| {
                (n + 1, c + r.compliant as usize)
            });

        // Per-application breakdown in catalog order.
        let mut per_app: HashMap<u32, (usize, usize)> = HashMap::new();
        for r in records {
            let entry = per_app.entry(r.app_id).or_default();
            entry.0 += 1;
            entry.1 += r.compliant as usize;
        }
        let app_breakdown = applications
            .iter()
            .map(|app| {
                let (events, compliant) = per_app.get(&app.app_id).copied().unwrap_or((0, 0));
                AppBreakdown {
                    app_id: app.app_id,
                    app_name: app.name.clone(),
                    tier: app.tier.as_str().to_string(),
                    mfa_required: app.mfa_required,
                    events,
                    compliance_rate: ratio(compliant, events),
                }
            })
            .collect();

        // Per-employee usage distribution and worst offenders.
        let mut per_employee: HashMap<&str, (usize, usize, bool)> = HashMap::new();
        for r in records {
            let entry = per_employee
                .entry(r.employee_email.as_str())
                .or_insert((0, 0, r.is_admin));
            entry.0 += 1;
            entry.1 += r.mfa_used as usize;
        }
        let mut usage_buckets = [0usize; 4];
        let mut offenders: Vec<OffenderEntry> = Vec::with_capacity(per_employee.len());
        for (email, (total, mfa, _)) in &per_employee {
            let rate = ratio(*mfa, *total);
            let bucket = ((rate * 4.0) as usize).min(3);
            usage_buckets[bucket] += 1;
            offenders.push(OffenderEntry {
                employee_email: (*email).to_string(),
                non_mfa_events: total - mfa,
                total_events: *total,
            });
        }
        offenders.sort_by(|a, b| {
            b.non_mfa_events
                .cmp(&a.non_mfa_events)
                .then_with(|| a.employee_email.cmp(&b.employee_email))
        });
        offenders.truncate(TOP_OFFENDERS);

        let admin_count = per_employee.values().filter(|(_, _, admin)| *admin).count();

        // Coverage and tier shares come from the catalog, not the events.
        let in_scope: Vec<&Application> =
            applications.iter().filter(|a| a.in_scope()).collect();
        let covered = in_scope.iter().filter(|a| a.mfa_required).count();
        let coverage = if in_scope.is_empty() {
            1.0
        } else {
            ratio(covered, in_scope.len())
        };
        let mut tier_shares = [0.0f64; 4];
        for (slot, tier) in crate::population::RiskTier::ALL.iter().enumerate() {
            let count = applications.iter().filter(|a| a.tier == *tier).count();
            tier_shares[slot] = ratio(count, applications.len());
        }

        SummaryStats {
            total_records,
            mfa_usage_rate: ratio(mfa_count, total_records),
            compliance_rate: ratio(compliant_count, total_records),
            current_period: format!("{:04}-{:02}", period.0, period.1),
            current_period_records: period_n,
            current_period_compliance_rate: ratio(period_compliant, period_n),
            coverage,
            in_scope_applications: in_scope.len(),
            distinct_employees: per_employee.len(),
            admin_share: ratio(admin_count, per_employee.len()),
            tier_shares,
            monthly_trend,
            app_breakdown,
            usage_buckets,
            worst_offenders: offenders,
        }
    }

    /// Tolerance checks against the configuration targets.
    pub fn validate(stats: &SummaryStats, config: &SynthConfig) -> ValidationOutcome {
        let mut checks = Vec::new();

        // Correction can only promise the target when it ran; without it
        // the realized rate is whatever the draws produced.
        let period_tolerance = if config.correction_enabled {
            // Rounding to a whole record bounds the residual by half a
            // record (plus float noise); the larger band applies.
            let rounding = 0.51 / stats.current_period_records.max(1) as f64;
            config.correction_tolerance.max(rounding)
        } else {
            0.05
        };
        checks.push(check(
            "current_month_compliance",
            config.target_compliance_rate,
            stats.current_period_compliance_rate,
            period_tolerance,
        ));
        checks.push(check(
            "mfa_coverage",
            config.critical_mfa_rate,
            stats.coverage,
            COVERAGE_TOLERANCE,
        ));
        checks.push(check(
            "admin_share",
            config.admin_rate,
            stats.admin_share,
            ADMIN_SHARE_TOLERANCE,
        ));
        for (slot, tier) in crate::population::RiskTier::ALL.iter().enumerate() {
            checks.push(check(
                &format!("tier_share_{}", tier.as_str().to_lowercase()),
                config.tier_percentages[slot],
                stats.tier_shares[slot],
                TIER_SHARE_TOLERANCE,
            ));
        }

        let all_passed = checks.iter().all(|c| c.passed);
        if !all_passed {
            let failed: Vec<&str> = checks
                .iter()
                .filter(|c| !c.passed)
                .map(|c| c.name.as_str())
                .collect();
            log::warn!("validation: {} check(s) failed: {}", failed.len(), failed.join(", "));
        }
        ValidationOutcome { checks, all_passed }
    }
}

fn check(name: &str, expected: f64, actual: f64, tolerance: f64) -> ValidationCheck {
    ValidationCheck {
        name: name.to_string(),
        expected,
        actual,
        tolerance,
        passed: (expected - actual).abs() <= tolerance,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
