use agency_db::DbPool;
use anyhow::Context;

/// Apply the bundled schema migrations. Already-applied migrations are skipped.
pub async fn run(pool: &DbPool) -> anyhow::Result<()> {
    agency_db::run_migrations(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}
