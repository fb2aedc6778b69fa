//! Subcommand implementations.
//!
//! Each command returns a process exit code: `0` when every check passed,
//! `1` otherwise. Setup failures (no database, unreadable fixtures) are
//! returned as errors instead.

pub mod migrate;
pub mod preview;
pub mod resolve;
pub mod seed;
pub mod verify;

use agency_core::check::CheckReport;
use agency_db::DbPool;
use anyhow::Context;

use crate::cli::{Command, SeedCommand, VerifyCommand};
use crate::config::OpsConfig;

/// Dispatch a parsed command.
pub async fn run(command: Command, config: &OpsConfig) -> anyhow::Result<i32> {
    match command {
        Command::Migrate => {
            let pool = connect(config).await?;
            migrate::run(&pool).await?;
            Ok(0)
        }
        Command::Resolve(args) => Ok(resolve::run(&args, config.month_policy)),
        Command::Preview(args) => {
            let pool = match args.template {
                Some(_) => Some(connect(config).await?),
                None => None,
            };
            preview::run(pool.as_ref(), &args).await
        }
        Command::Seed(seed) => {
            let pool = connect(config).await?;
            let report = match seed {
                SeedCommand::Users { file } => seed::users(&pool, file.as_deref()).await?,
                SeedCommand::Templates { file } => {
                    seed::templates(&pool, &config.seed_admin_email, file.as_deref()).await?
                }
                SeedCommand::Service(args) => {
                    seed::service(&pool, &config.seed_admin_email, &args).await
                }
            };
            Ok(finish(&report))
        }
        Command::Verify(verify) => {
            let pool = connect(config).await?;
            let report = match verify {
                VerifyCommand::Templates => verify::templates(&pool).await?,
                VerifyCommand::Service { id } => verify::service(&pool, id).await?,
            };
            Ok(finish(&report))
        }
    }
}

async fn connect(config: &OpsConfig) -> anyhow::Result<DbPool> {
    let url = config.require_database_url()?;
    let pool = agency_db::create_pool_with(url, config.max_connections)
        .await
        .context("Failed to connect to database")?;
    agency_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database connection pool created");
    Ok(pool)
}

fn finish(report: &CheckReport) -> i32 {
    if report.all_passed() {
        tracing::info!(summary = %report.summary(), "All checks passed");
    } else {
        for failure in report.failures() {
            tracing::warn!(check = failure.name(), "Failed");
        }
        tracing::warn!(summary = %report.summary(), "Some checks failed");
    }
    println!("{}", report.summary());
    report.exit_code()
}
