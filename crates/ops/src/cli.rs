//! Command-line surface of `agency-ops`.

use std::path::PathBuf;

use agency_core::types::{CalendarDate, DbId};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "agency-ops", version, about = "Seed and verify agency service data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Insert fixture data
    #[command(subcommand)]
    Seed(SeedCommand),
    /// Re-check stored data against template invariants
    #[command(subcommand)]
    Verify(VerifyCommand),
    /// Resolve a relative offset such as "2 weeks" against a start date
    Resolve(ResolveArgs),
    /// Print the dated plan a template would produce
    Preview(PreviewArgs),
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Upsert admin/team/client test profiles
    Users {
        /// JSON fixture file (defaults to the bundled users)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Insert service templates, skipping names that already exist
    Templates {
        /// JSON fixture file (defaults to the bundled templates)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Create a test client (if missing) and a service from a template
    Service(SeedServiceArgs),
}

#[derive(Debug, Args)]
pub struct SeedServiceArgs {
    /// Client name; created when it does not exist
    #[arg(long)]
    pub client: String,
    /// Template name
    #[arg(long)]
    pub template: String,
    /// Service name (defaults to "<client> - <template>")
    #[arg(long)]
    pub name: Option<String>,
    /// Service start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: CalendarDate,
    #[arg(long)]
    pub budget: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum VerifyCommand {
    /// Validate every stored template tree
    Templates,
    /// Compare a service's live dates with its template plan
    Service {
        id: DbId,
    },
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Start date (YYYY-MM-DD)
    pub start: CalendarDate,
    /// Offset text, e.g. "same day", "3 days", "1 month"
    pub offset: String,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Stored template name
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub template: Option<String>,
    /// Template blueprint JSON file
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Service start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: CalendarDate,
}
