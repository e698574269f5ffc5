//! Static reference tables for identity and catalog generation.
//!
//! Curated name, title, org-unit, and application pools. All draws are
//! deterministic (same RNG seed = same identities). The lists are data,
//! not logic — edit freely, but never reorder entries between releases
//! of a dataset, since indices feed from the seeded stream.

use crate::error::SynthResult;
use crate::rng::StageRng;

/// Deterministic directory generator backed by the curated pools.
pub struct Directory;

impl Directory {
    /// Generate a full name (first + last) deterministically.
    pub fn full_name(rng: &mut StageRng) -> (String, &'static str, &'static str) {
        let first = Self::first_name(rng);
        let last = Self::last_name(rng);
        (format!("{} {}", first, last), first, last)
    }

    pub fn first_name(rng: &mut StageRng) -> &'static str {
        let names = Self::first_names();
        names[rng.next_u64_below(names.len() as u64) as usize]
    }

    pub fn last_name(rng: &mut StageRng) -> &'static str {
        let names = Self::last_names();
        names[rng.next_u64_below(names.len() as u64) as usize]
    }

    pub fn job_title(rng: &mut StageRng) -> &'static str {
        let titles = Self::job_titles();
        titles[rng.next_u64_below(titles.len() as u64) as usize]
    }

    /// Corporate email from first/last name. Uniqueness is the caller's
    /// concern (collisions are disambiguated, never re-drawn).
    pub fn email(first: &str, last: &str) -> String {
        format!(
            "{}.{}@{}",
            first.to_lowercase(),
            last.to_lowercase(),
            Self::MAIL_DOMAIN
        )
    }

    /// Weighted sign-in source draw.
    pub fn signin_source(rng: &mut StageRng) -> SynthResult<&'static str> {
        let (sources, weights) = Self::signin_sources();
        Ok(*rng.weighted_choice(sources, weights)?)
    }

    pub const MAIL_DOMAIN: &'static str = "meridianops.example.com";

    /// Fixed top org level.
    pub const COMPANY: &'static str = "Meridian Operations";

    fn first_names() -> &'static [&'static str] {
        &[
            "Aaron", "Alice", "Amelia", "Andre", "Angela", "Anita", "Arjun",
            "Astrid", "Benjamin", "Bianca", "Brendan", "Carla", "Cedric",
            "Chloe", "Colin", "Dana", "Dario", "Deepa", "Dmitri", "Elena",
            "Elliot", "Emiko", "Erik", "Fatima", "Felix", "Fiona", "Gavin",
            "Greta", "Hassan", "Hazel", "Hugo", "Imani", "Ingrid", "Ivan",
            "Jasmine", "Joel", "Jonas", "Julia", "Kamal", "Katrin", "Kenji",
            "Lara", "Leona", "Liam", "Lucia", "Magnus", "Mara", "Marcus",
            "Mei", "Milan", "Mireille", "Nadia", "Nathan", "Nina", "Noor",
            "Oskar", "Paloma", "Pavel", "Priya", "Quentin", "Rafael",
            "Renata", "Rohan", "Rosa", "Sanjay", "Selma", "Simone", "Soren",
            "Tamar", "Tobias", "Uma", "Viktor", "Wanda", "Xavier", "Yara",
            "Yusuf", "Zofia",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Abrams", "Ahmadi", "Albrecht", "Almeida", "Antonov", "Baptiste",
            "Barros", "Becker", "Bergstrom", "Bianchi", "Borg", "Calloway",
            "Castellanos", "Chandra", "Cho", "Claesson", "Dawson", "Deng",
            "Dubois", "Eklund", "Farrell", "Fontaine", "Fujimoto", "Galvan",
            "Grimaldi", "Haddad", "Hartley", "Hirsch", "Holloway", "Iversen",
            "Jansen", "Kapoor", "Keller", "Kowalski", "Lindqvist", "Lucero",
            "Maddox", "Marchetti", "Mbeki", "Mercer", "Moreau", "Nakamura",
            "Novak", "Obi", "Okafor", "Olsen", "Ortega", "Oyelaran",
            "Pellegrini", "Petrov", "Quintero", "Rahman", "Reinholt",
            "Rowley", "Saarinen", "Sandoval", "Sato", "Schreiber", "Seo",
            "Sheridan", "Singh", "Sorensen", "Takahashi", "Tan", "Thibault",
            "Ueda", "Varga", "Vidal", "Voss", "Whitfield", "Winters",
            "Yamada", "Zielinski",
        ]
    }

    fn job_titles() -> &'static [&'static str] {
        &[
            "Account Executive", "Business Analyst", "Cloud Engineer",
            "Compliance Analyst", "Customer Success Manager", "Data Analyst",
            "Data Engineer", "Database Administrator", "DevOps Engineer",
            "Finance Manager", "HR Generalist", "IT Support Specialist",
            "Marketing Specialist", "Network Engineer", "Operations Manager",
            "Payroll Specialist", "Procurement Analyst", "Product Manager",
            "Program Coordinator", "QA Engineer", "Sales Engineer",
            "Security Engineer", "Software Engineer", "Solutions Architect",
            "Systems Administrator", "Technical Writer",
        ]
    }

    pub fn business_units() -> &'static [&'static str] {
        &[
            "Corporate Services",
            "Engineering & Technology",
            "Field Operations",
            "Revenue",
        ]
    }

    /// Divisions available under a business unit.
    pub fn divisions(business_unit: &str) -> &'static [&'static str] {
        match business_unit {
            "Corporate Services" => &["Finance", "Human Resources", "Legal & Compliance"],
            "Engineering & Technology" => &["Platform", "Product Engineering", "IT & Security"],
            "Field Operations" => &["Logistics", "Regional Operations", "Facilities"],
            _ => &["Sales", "Marketing", "Customer Success"],
        }
    }

    /// Departments available under a division.
    pub fn departments(division: &str) -> &'static [&'static str] {
        match division {
            "Finance" => &["Accounting", "Treasury", "Payroll"],
            "Human Resources" => &["Talent", "People Operations"],
            "Legal & Compliance" => &["Contracts", "Regulatory Affairs"],
            "Platform" => &["Infrastructure", "Data Platform", "Reliability"],
            "Product Engineering" => &["Web", "Mobile", "Integrations"],
            "IT & Security" => &["Helpdesk", "Identity & Access", "Security Operations"],
            "Logistics" => &["Fleet", "Warehousing"],
            "Regional Operations" => &["North Region", "South Region", "Central Region"],
            "Facilities" => &["Maintenance", "Site Services"],
            "Sales" => &["Enterprise Sales", "Mid-Market Sales"],
            "Marketing" => &["Demand Generation", "Brand"],
            _ => &["Onboarding", "Renewals", "Support"],
        }
    }

    pub fn teams() -> &'static [&'static str] {
        &[
            "Team Alpha", "Team Bravo", "Team Delta", "Team Echo",
            "Team Foxtrot", "Team Kilo", "Team Lima", "Team Sierra",
        ]
    }

    pub fn subteams() -> &'static [&'static str] {
        &["Pod 1", "Pod 2", "Pod 3", "Pod 4"]
    }

    /// Base application names. Sequential ids keep instances unique even
    /// when the requested catalog is larger than this pool.
    pub fn application_names() -> &'static [&'static str] {
        &[
            "Payroll Portal", "Expense Desk", "VPN Gateway", "Code Vault",
            "Ledger Prime", "Contract Hub", "Fleet Tracker", "Helpdesk Console",
            "Identity Console", "Data Warehouse Studio", "Email Gateway",
            "CRM Workbench", "Build Pipeline", "Secrets Manager",
            "Benefits Center", "Travel Booking", "Asset Registry",
            "Incident Bridge", "Wiki Central", "Analytics Canvas",
            "Procurement Desk", "Badge Office", "Release Console",
            "Customer Portal", "Billing Engine", "Monitoring Grid",
            "Document Vault", "Training Campus",
        ]
    }

    fn signin_sources() -> (&'static [&'static str], &'static [f64]) {
        (
            &["Web Portal", "Mobile App", "Desktop Client", "Legacy VPN"],
            &[0.45, 0.25, 0.20, 0.10],
        )
    }
}
