//! Population builder — the employee roster and application catalog.
//!
//! RULES:
//!   - Built exactly once, before any event generation.
//!   - Identity collisions are disambiguated deterministically (appended
//!     counter), never by re-drawing — a re-draw would desynchronize the
//!     seeded stream.
//!   - An application's mfa_required flag is drawn once at creation and
//!     is immutable afterward. It is a policy decision, not a per-event
//!     draw.
//!   - Every 8th employee (by creation position) is manager-less; those
//!     are the managers. The manager graph is a forest by construction.

use crate::{
    config::SynthConfig,
    error::SynthResult,
    reference::Directory,
    rng::StageRng,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Probability that an employee sits in a named subteam (deepest org
/// level); otherwise the level is empty.
const SUBTEAM_RATE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Critical,
    HighRisk,
    MediumRisk,
    LowRisk,
}

impl RiskTier {
    /// Ordered as configured in tier_percentages.
    pub const ALL: [RiskTier; 4] = [
        RiskTier::Critical,
        RiskTier::HighRisk,
        RiskTier::MediumRisk,
        RiskTier::LowRisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::HighRisk => "HIGH_RISK",
            Self::MediumRisk => "MEDIUM_RISK",
            Self::LowRisk => "LOW_RISK",
        }
    }

    /// In scope for the coverage metric: CRITICAL and HIGH_RISK only.
    pub fn in_scope(&self) -> bool {
        matches!(self, Self::Critical | Self::HighRisk)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerRef {
    pub employee_id: String,
    pub name: String,
    pub email: String,
}

/// Six-level organizational path. Only the deepest level is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgPath {
    pub company: String,
    pub business_unit: String,
    pub division: String,
    pub department: String,
    pub team: String,
    pub subteam: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub display_name: String,
    pub email: String,
    pub job_title: String,
    pub org: OrgPath,
    pub is_admin: bool,
    pub manager: Option<ManagerRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub app_id: u32,
    pub name: String,
    pub tier: RiskTier,
    pub mfa_required: bool,
}

impl Application {
    pub fn in_scope(&self) -> bool {
        self.tier.in_scope()
    }
}

pub struct Population {
    pub employees: Vec<Employee>,
    pub applications: Vec<Application>,
}

pub struct PopulationBuilder;

impl PopulationBuilder {
    /// Build the full population. Pure function of (config, rng stream).
    pub fn build(config: &SynthConfig, rng: &mut StageRng) -> SynthResult<Population> {
        let employees = Self::build_employees(config, rng)?;
        let applications = Self::build_applications(config, rng)?;
        log::info!(
            "population: built {} employees, {} applications",
            employees.len(),
            applications.len()
        );
        Ok(Population {
            employees,
            applications,
        })
    }

    fn build_employees(
        config: &SynthConfig,
        rng: &mut StageRng,
    ) -> SynthResult<Vec<Employee>> {
        let n = config.employee_count;
        let mut employees: Vec<Employee> = Vec::with_capacity(n);
        let mut taken_emails: HashSet<String> = HashSet::with_capacity(n);
        // Manager bookkeeping: nearest preceding manager-eligible employee,
        // per department and overall.
        let mut last_eligible_by_dept: HashMap<&'static str, usize> = HashMap::new();
        let mut last_eligible_global: Option<usize> = None;

        for i in 0..n {
            let (display_name, first, last) = Directory::full_name(rng);
            let mut email = Directory::email(first, last);
            let mut suffix = 2u32;
            while taken_emails.contains(&email) {
                email = format!(
                    "{}.{}{}@{}",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    suffix,
                    Directory::MAIL_DOMAIN
                );
                suffix += 1;
            }
            taken_emails.insert(email.clone());

            let job_title = Directory::job_title(rng).to_string();
            let business_unit = *rng.choice(Directory::business_units())?;
            let division = *rng.choice(Directory::divisions(business_unit))?;
            let department = *rng.choice(Directory::departments(division))?;
            let team = *rng.choice(Directory::teams())?;
            let subteam = if rng.chance(SUBTEAM_RATE) {
                Some((*rng.choice(Directory::subteams())?).to_string())
            } else {
                None
            };
            let is_admin = rng.chance(config.admin_rate);

            let manager_eligible = i % 8 == 0;
            let manager = if manager_eligible {
                None
            } else {
                last_eligible_by_dept
                    .get(department)
                    .copied()
                    .or(last_eligible_global)
                    .map(|m| {
                        let mgr = &employees[m];
                        ManagerRef {
                            employee_id: mgr.employee_id.clone(),
                            name: mgr.display_name.clone(),
                            email: mgr.email.clone(),
                        }
                    })
            };

            if manager_eligible {
                last_eligible_by_dept.insert(department, i);
                last_eligible_global = Some(i);
            }

            employees.push(Employee {
                employee_id: format!("u-{i:05}"),
                display_name,
                email,
                job_title,
                org: OrgPath {
                    company: Directory::COMPANY.to_string(),
                    business_unit: business_unit.to_string(),
                    division: division.to_string(),
                    department: department.to_string(),
                    team: team.to_string(),
                    subteam,
                },
                is_admin,
                manager,
            });
        }
        Ok(employees)
    }

    fn build_applications(
        config: &SynthConfig,
        rng: &mut StageRng,
    ) -> SynthResult<Vec<Application>> {
        let names = Directory::application_names();
        let mut applications = Vec::with_capacity(config.application_count);

        for i in 0..config.application_count {
            let app_id = (i + 1) as u32;
            let base = names[i % names.len()];
            // The catalog pool wraps for large counts; the sequential id
            // keeps wrapped names unique.
            let name = if i < names.len() {
                base.to_string()
            } else {
                format!("{base} {app_id}")
            };
            let tier = *rng.weighted_choice(&RiskTier::ALL, &config.tier_percentages)?;
            let mfa_required = if tier.in_scope() {
                rng.chance(config.critical_mfa_rate)
            } else {
                rng.chance(config.noncritical_mfa_rate)
            };
            applications.push(Application {
                app_id,
                name,
                tier,
                mfa_required,
            });
        }
        Ok(applications)
    }
}
