//! Synthetic value generation boundary

use rand::Rng;

/// Interface to the synthetic-value collaborator
///
/// Implementations are side-effect free and safe for concurrent use. No
/// consistency is expected across calls; the [`Replacer`](super::Replacer)
/// enforces consistency where requested.
pub trait ValueGenerator: Send + Sync {
    /// Produce a plausible fake value for the given label/category
    fn generate(&self, label: &str) -> String;
}

/// Built-in generator with small per-category pools
///
/// Covers the common entity categories; unknown labels fall back to a
/// generic tagged token.
#[derive(Debug, Clone, Default)]
pub struct SyntheticGenerator;

const PERSONS: &[&str] = &[
    "James Carter",
    "Maria Lopez",
    "Wei Chen",
    "Fatima Hassan",
    "Oliver Novak",
    "Priya Sharma",
    "Lucas Moreau",
    "Elena Petrova",
    "Daniel Kim",
    "Amara Okafor",
];

const LOCATIONS: &[&str] = &[
    "United States",
    "Canada",
    "United Kingdom",
    "Germany",
    "France",
    "Japan",
    "Brazil",
    "Australia",
    "Netherlands",
    "South Korea",
    "Spain",
    "Sweden",
];

const ORGANIZATIONS: &[&str] = &[
    "Northwind Group",
    "Acme Industries",
    "Globex Corporation",
    "Initech Systems",
    "Vertex Labs",
    "Pioneer Holdings",
    "Summit Partners",
    "Cascade Works",
];

const JOBS: &[&str] = &[
    "Engineer",
    "Accountant",
    "Architect",
    "Consultant",
    "Designer",
    "Analyst",
    "Technician",
    "Researcher",
];

const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl SyntheticGenerator {
    fn pick(pool: &[&str]) -> String {
        pool[rand::thread_rng().gen_range(0..pool.len())].to_string()
    }

    fn date() -> String {
        let mut rng = rand::thread_rng();
        format!(
            "{} {}, {}",
            MONTHS[rng.gen_range(0..MONTHS.len())],
            rng.gen_range(1..=28),
            rng.gen_range(1950..=2020)
        )
    }

    fn email() -> String {
        let mut rng = rand::thread_rng();
        format!("user{}@example.com", rng.gen_range(100..10_000))
    }

    fn phone() -> String {
        let mut rng = rand::thread_rng();
        format!(
            "+1-555-{:03}-{:04}",
            rng.gen_range(100..1000),
            rng.gen_range(0..10_000)
        )
    }

    fn fallback(label: &str) -> String {
        let mut rng = rand::thread_rng();
        format!("{}-{:04}", label.to_lowercase(), rng.gen_range(0..10_000))
    }
}

impl ValueGenerator for SyntheticGenerator {
    fn generate(&self, label: &str) -> String {
        match label.to_lowercase().as_str() {
            "person" | "name" | "first_name" | "last_name" => Self::pick(PERSONS),
            "location" | "city" | "country" | "place" | "nationality" => Self::pick(LOCATIONS),
            "organization" | "company" | "employer" => Self::pick(ORGANIZATIONS),
            "job" | "profession" | "occupation" => Self::pick(JOBS),
            "date" | "birthday" | "date_of_birth" => Self::date(),
            "email" => Self::email(),
            "phone" | "phone_number" => Self::phone(),
            "age" => rand::thread_rng().gen_range(18..=80).to_string(),
            other => Self::fallback(other),
        }
    }
}
