//! Repository for the live `milestones` table.

use agency_core::service_template::MilestoneStatus;
use agency_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::milestone::{CreateMilestone, Milestone};

const COLUMNS: &str = "id, service_id, name, description, position, start_date, due_date, \
     status, created_at, updated_at";

/// Provides CRUD operations for live milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateMilestone,
    ) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestones \
                (service_id, name, description, position, start_date, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(input.service_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.position)
            .bind(input.start_date)
            .bind(input.due_date)
            .fetch_one(&mut **tx)
            .await
    }

    /// List a service's milestones ordered by position.
    pub async fn list_by_service(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones \
             WHERE service_id = $1 \
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(service_id)
            .fetch_all(pool)
            .await
    }

    /// Set a milestone's status. Returns `true` if the row exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: MilestoneStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE milestones SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
