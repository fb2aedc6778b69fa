//! Repository for the live `tasks` table.

use agency_core::service_template::TaskStatus;
use agency_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::task::{CreateTask, Task};

const COLUMNS: &str = "t.id, t.milestone_id, t.title, t.description, t.position, t.priority, \
     t.visibility, t.estimated_hours, t.due_date, t.status, t.created_at, t.updated_at";

/// Provides CRUD operations for live tasks.
pub struct TaskRepo;

impl TaskRepo {
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks AS t \
                (milestone_id, title, description, position, priority, visibility, \
                 estimated_hours, due_date) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'medium'), COALESCE($6, 'internal'), $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.milestone_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.position)
            .bind(&input.priority)
            .bind(&input.visibility)
            .bind(input.estimated_hours)
            .bind(input.due_date)
            .fetch_one(&mut **tx)
            .await
    }

    /// List a milestone's tasks ordered by position.
    pub async fn list_by_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks t \
             WHERE t.milestone_id = $1 \
             ORDER BY t.position ASC, t.id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(milestone_id)
            .fetch_all(pool)
            .await
    }

    /// List every task of a service, ordered by milestone then task position.
    pub async fn list_by_service(pool: &PgPool, service_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks t \
             JOIN milestones m ON m.id = t.milestone_id \
             WHERE m.service_id = $1 \
             ORDER BY m.position ASC, t.position ASC, t.id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(service_id)
            .fetch_all(pool)
            .await
    }

    /// Set a task's status. Returns `true` if the row exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: TaskStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
