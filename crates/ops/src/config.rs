use agency_core::relative_date::MonthPolicy;
use anyhow::{anyhow, Context};

/// Operations configuration loaded from environment variables.
///
/// | Env Var               | Default              |
/// |-----------------------|----------------------|
/// | `DATABASE_URL`        | none                 |
/// | `DB_MAX_CONNECTIONS`  | `5`                  |
/// | `MONTH_OFFSET_POLICY` | `fixed`              |
/// | `SEED_ADMIN_EMAIL`    | `admin@agency.test`  |
#[derive(Debug, Clone)]
pub struct OpsConfig {
    /// Postgres connection string. Only required by commands that touch the database.
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// How `"N months"` offsets resolve.
    pub month_policy: MonthPolicy,
    /// Profile recorded as creator of seeded templates, clients and services.
    pub seed_admin_email: String,
}

pub const DEFAULT_SEED_ADMIN_EMAIL: &str = "admin@agency.test";

impl OpsConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("DB_MAX_CONNECTIONS must be a positive integer, got '{raw}'"))?,
            None => agency_db::DEFAULT_MAX_CONNECTIONS,
        };

        let month_policy = match lookup("MONTH_OFFSET_POLICY") {
            Some(raw) => raw
                .parse::<MonthPolicy>()
                .context("Invalid MONTH_OFFSET_POLICY")?,
            None => MonthPolicy::default(),
        };

        let seed_admin_email = lookup("SEED_ADMIN_EMAIL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SEED_ADMIN_EMAIL.to_string());

        Ok(Self {
            database_url,
            max_connections,
            month_policy,
            seed_admin_email,
        })
    }

    /// The database URL, or an error naming the missing variable.
    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL must be set for this command"))
    }
}
