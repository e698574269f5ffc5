//! Event synthesizer — one sign-in record per draw.
//!
//! RULES:
//!   - Employee and application picks are uniform and independent.
//!   - Timestamp biasing is bounded: the weekday re-draw gives up after a
//!     fixed number of attempts and keeps the last draw.
//!   - Usage probabilities are clamped to [0,1] before the Bernoulli
//!     draw — adoption multipliers may exceed 1.0 in peak months.
//!   - Event ids come from the monotonic record counter, never from
//!     random bits.

use crate::{
    config::{SynthConfig, BASELINE_USAGE_RATE, MFA_REQUIRED_USAGE_RATE},
    error::SynthResult,
    population::{Application, Employee, RiskTier},
    reference::Directory,
    rng::StageRng,
    types::{month_floor, EventSeq},
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Give up pushing an event onto a weekday after this many re-draws.
const WEEKDAY_RETRY_LIMIT: u32 = 5;

/// Business window: hours 07:00 through 18:59.
const BUSINESS_HOUR_START: i64 = 7;
const BUSINESS_HOUR_END: i64 = 18;

/// A single synthesized sign-in event. Employee and application
/// attributes are copied at creation — records hold no live references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRecord {
    pub event_id: String,
    pub employee_email: String,
    pub employee_id: String,
    pub employee_name: String,
    pub job_title: String,
    pub manager_id: String,
    pub manager_name: String,
    pub manager_email: String,
    pub company: String,
    pub business_unit: String,
    pub division: String,
    pub department: String,
    pub team: String,
    pub subteam: String,
    pub is_admin: bool,
    pub app_id: u32,
    pub app_name: String,
    pub app_tier: RiskTier,
    pub app_mfa_required: bool,
    pub signin_timestamp: NaiveDateTime,
    pub signin_source: String,
    pub mfa_used: bool,
    pub compliant: bool,
    pub month_bucket: NaiveDate,
    pub load_date: NaiveDate,
    pub report_date: NaiveDate,
}

pub struct EventSynthesizer<'a> {
    config: &'a SynthConfig,
    employees: &'a [Employee],
    applications: &'a [Application],
    next_seq: EventSeq,
}

impl<'a> EventSynthesizer<'a> {
    pub fn new(
        config: &'a SynthConfig,
        employees: &'a [Employee],
        applications: &'a [Application],
    ) -> Self {
        Self {
            config,
            employees,
            applications,
            next_seq: 0,
        }
    }

    /// Draw one sign-in record from the shared stage stream.
    pub fn draw(&mut self, rng: &mut StageRng) -> SynthResult<SignInRecord> {
        let employee = rng.choice(self.employees)?;
        let app = rng.choice(self.applications)?;

        let date = self.draw_event_date(rng);
        let timestamp = self.draw_time_of_day(rng, date);

        let multiplier = self.adoption_multiplier(date.month());
        let usage_rate = if app.mfa_required {
            MFA_REQUIRED_USAGE_RATE * multiplier
        } else if employee.is_admin {
            self.config.admin_enforcement_rate * multiplier
        } else {
            BASELINE_USAGE_RATE * multiplier
        };
        let mfa_used = rng.chance(usage_rate.clamp(0.0, 1.0));
        let compliant = !app.mfa_required || mfa_used;

        let load_date = if rng.chance(self.config.batch_lag_rate) {
            date + Duration::days(1)
        } else {
            date
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        let event_id = format!(
            "{}-{}-{}-{seq:07}",
            date.format("%Y%m%d"),
            app.app_id,
            employee.employee_id
        );

        let signin_source = Directory::signin_source(rng)?.to_string();

        let (manager_id, manager_name, manager_email) = match &employee.manager {
            Some(m) => (m.employee_id.clone(), m.name.clone(), m.email.clone()),
            None => (String::new(), String::new(), String::new()),
        };

        Ok(SignInRecord {
            event_id,
            employee_email: employee.email.clone(),
            employee_id: employee.employee_id.clone(),
            employee_name: employee.display_name.clone(),
            job_title: employee.job_title.clone(),
            manager_id,
            manager_name,
            manager_email,
            company: employee.org.company.clone(),
            business_unit: employee.org.business_unit.clone(),
            division: employee.org.division.clone(),
            department: employee.org.department.clone(),
            team: employee.org.team.clone(),
            subteam: employee.org.subteam.clone().unwrap_or_default(),
            is_admin: employee.is_admin,
            app_id: app.app_id,
            app_name: app.name.clone(),
            app_tier: app.tier,
            app_mfa_required: app.mfa_required,
            signin_timestamp: timestamp,
            signin_source,
            mfa_used,
            compliant,
            month_bucket: month_floor(date),
            load_date,
            report_date: self.config.current_date,
        })
    }

    /// Uniform date in [current_date - range_days, current_date], with a
    /// bounded weekday re-draw.
    fn draw_event_date(&self, rng: &mut StageRng) -> NaiveDate {
        let offset = rng.int_range(0, self.config.range_days);
        let mut date = self.config.current_date - Duration::days(offset);

        if rng.chance(self.config.weekday_rate) {
            let mut attempts = 0;
            while is_weekend(date) && attempts < WEEKDAY_RETRY_LIMIT {
                let offset = rng.int_range(0, self.config.range_days);
                date = self.config.current_date - Duration::days(offset);
                attempts += 1;
            }
        }
        date
    }

    /// Force the hour into the business window or its complement, then
    /// draw minutes and seconds uniformly.
    fn draw_time_of_day(&self, rng: &mut StageRng, date: NaiveDate) -> NaiveDateTime {
        let hour = if rng.chance(self.config.business_hours_rate) {
            rng.int_range(BUSINESS_HOUR_START, BUSINESS_HOUR_END)
        } else {
            // Off-hours: 00–06 and 19–23, twelve hours total.
            let pick = rng.int_range(0, 11);
            if pick < BUSINESS_HOUR_START {
                pick
            } else {
                pick + (BUSINESS_HOUR_END - BUSINESS_HOUR_START + 1)
            }
        };
        let minute = rng.int_range(0, 59);
        let second = rng.int_range(0, 59);
        date.and_hms_opt(hour as u32, minute as u32, second as u32)
            .expect("clock fields drawn in range")
    }

    /// Calendar-month adoption multiplier; 1.0 for out-of-range indices.
    fn adoption_multiplier(&self, month: u32) -> f64 {
        self.config
            .monthly_adoption
            .get((month as usize).wrapping_sub(1))
            .copied()
            .unwrap_or(1.0)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::PopulationBuilder;
    use crate::rng::{RngBank, StageSlot};

    fn fixture() -> (SynthConfig, crate::population::Population) {
        let config = SynthConfig::default_test();
        let bank = RngBank::new(42);
        let mut rng = bank.for_stage(StageSlot::Population);
        let population = PopulationBuilder::build(&config, &mut rng).unwrap();
        (config, population)
    }

    #[test]
    fn hours_always_land_in_one_of_the_two_windows() {
        let (config, population) = fixture();
        let mut synth =
            EventSynthesizer::new(&config, &population.employees, &population.applications);
        let mut rng = RngBank::new(42).for_stage(StageSlot::Events);
        for _ in 0..500 {
            let record = synth.draw(&mut rng).unwrap();
            let hour = record.signin_timestamp.format("%H").to_string();
            let hour: i64 = hour.parse().unwrap();
            assert!((0..24).contains(&hour));
        }
    }

    #[test]
    fn multiplier_defaults_to_one_out_of_range() {
        let (config, population) = fixture();
        let synth =
            EventSynthesizer::new(&config, &population.employees, &population.applications);
        assert_eq!(synth.adoption_multiplier(0), 1.0);
        assert_eq!(synth.adoption_multiplier(13), 1.0);
        assert_eq!(synth.adoption_multiplier(1), config.monthly_adoption[0]);
    }

    #[test]
    fn weekend_detection() {
        // 2025-06-14 is a Saturday, 2025-06-16 a Monday.
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()));
    }
}
