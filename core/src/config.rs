//! Generation configuration.
//!
//! RULE: the config is constructed once, validated up front, and passed
//! by reference into every stage. No stage reads ambient process state.
//! Validation failures are fatal and happen before any generation.

use crate::error::{SynthError, SynthResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-event MFA usage rate when the application requires MFA.
pub const MFA_REQUIRED_USAGE_RATE: f64 = 0.95;

/// Per-event MFA usage rate for non-admin users on optional apps.
pub const BASELINE_USAGE_RATE: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn from_flag(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Number of sign-in events to synthesize.
    pub record_count: usize,
    pub employee_count: usize,
    pub application_count: usize,
    /// Events are timestamped within [current_date - range_days, current_date].
    pub range_days: i64,
    /// The simulation's reference date. The calendar month containing it
    /// is the current period for correction and reporting.
    pub current_date: NaiveDate,
    /// Population shares for CRITICAL, HIGH_RISK, MEDIUM_RISK, LOW_RISK.
    pub tier_percentages: [f64; 4],
    /// P(mfa_required) for CRITICAL / HIGH_RISK applications.
    pub critical_mfa_rate: f64,
    /// P(mfa_required) for MEDIUM_RISK / LOW_RISK applications.
    pub noncritical_mfa_rate: f64,
    /// Fraction of employees flagged admin.
    pub admin_rate: f64,
    /// Per-event MFA usage rate for admins on optional apps.
    pub admin_enforcement_rate: f64,
    /// Adoption multiplier per calendar month (index 0 = January).
    /// May exceed 1.0 in peak months; usage probabilities are clamped.
    pub monthly_adoption: [f64; 12],
    /// Current-month compliance rate the correction pass steers toward.
    pub target_compliance_rate: f64,
    pub correction_enabled: bool,
    pub correction_tolerance: f64,
    /// Probability that an event is pushed onto a weekday.
    pub weekday_rate: f64,
    /// Probability that an event lands inside business hours (07–19).
    pub business_hours_rate: f64,
    /// Probability that the load date trails the event date by one day.
    pub batch_lag_rate: f64,
    pub output_format: OutputFormat,
    pub summary_only: bool,
    pub validation_enabled: bool,
    /// None = non-reproducible; resolved from the wall clock at engine
    /// start. The resolved seed is logged so the run can be replayed.
    pub seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl SynthConfig {
    /// Production-shaped defaults.
    pub fn baseline() -> Self {
        Self {
            record_count: 50_000,
            employee_count: 500,
            application_count: 40,
            range_days: 180,
            current_date: NaiveDate::from_ymd_opt(2025, 6, 15)
                .expect("literal date"),
            tier_percentages: [0.15, 0.25, 0.35, 0.25],
            critical_mfa_rate: 0.92,
            noncritical_mfa_rate: 0.55,
            admin_rate: 0.08,
            admin_enforcement_rate: 0.85,
            monthly_adoption: [
                0.85, 0.87, 0.89, 0.91, 0.93, 0.95, 0.97, 0.99, 1.01, 1.03,
                1.05, 1.08,
            ],
            target_compliance_rate: 0.95,
            correction_enabled: true,
            correction_tolerance: 0.001,
            weekday_rate: 0.80,
            business_hours_rate: 0.85,
            batch_lag_rate: 0.05,
            output_format: OutputFormat::Csv,
            summary_only: false,
            validation_enabled: true,
            seed: None,
        }
    }

    /// Config with small counts and a fixed seed for unit tests.
    pub fn default_test() -> Self {
        Self {
            record_count: 2_000,
            employee_count: 50,
            application_count: 10,
            range_days: 90,
            seed: Some(42),
            ..Self::baseline()
        }
    }

    /// Load from a JSON file. Omitted fields fall back to baseline().
    pub fn load(path: &str) -> SynthResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Reject invalid generation parameters before anything is drawn.
    pub fn validate(&self) -> SynthResult<()> {
        if self.record_count == 0 {
            return Self::fatal("record_count must be > 0");
        }
        if self.employee_count == 0 {
            return Self::fatal("employee_count must be > 0");
        }
        if self.application_count == 0 {
            return Self::fatal("application_count must be > 0");
        }
        if self.range_days < 0 {
            return Self::fatal("range_days must be >= 0");
        }
        for (name, p) in [
            ("critical_mfa_rate", self.critical_mfa_rate),
            ("noncritical_mfa_rate", self.noncritical_mfa_rate),
            ("admin_rate", self.admin_rate),
            ("admin_enforcement_rate", self.admin_enforcement_rate),
            ("weekday_rate", self.weekday_rate),
            ("business_hours_rate", self.business_hours_rate),
            ("batch_lag_rate", self.batch_lag_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Self::fatal(&format!("{name} must be in [0,1], got {p}"));
            }
        }
        if !(self.target_compliance_rate > 0.0 && self.target_compliance_rate < 1.0) {
            return Self::fatal(&format!(
                "target_compliance_rate must be in (0,1), got {}",
                self.target_compliance_rate
            ));
        }
        if self.correction_tolerance < 0.0 {
            return Self::fatal("correction_tolerance must be >= 0");
        }
        let tier_sum: f64 = self.tier_percentages.iter().sum();
        if self.tier_percentages.iter().any(|w| *w < 0.0) || tier_sum <= 0.0 {
            return Self::fatal("tier_percentages must be non-negative with a positive sum");
        }
        if self.monthly_adoption.iter().any(|m| *m < 0.0) {
            return Self::fatal("monthly_adoption multipliers must be >= 0");
        }
        Ok(())
    }

    fn fatal(reason: &str) -> SynthResult<()> {
        Err(SynthError::FatalConfig {
            reason: reason.into(),
        })
    }
}
