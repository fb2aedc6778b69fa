//! Repository for the `template_tasks` table.

use agency_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::template_task::{CreateTemplateTask, TemplateTask};

const COLUMNS: &str = "id, template_milestone_id, title, description, position, \
     priority, visibility, estimated_hours, relative_due_days, created_at, updated_at";

fn insert_query() -> String {
    format!(
        "INSERT INTO template_tasks \
            (template_milestone_id, title, description, position, priority, visibility, \
             estimated_hours, relative_due_days) \
         VALUES ($1, $2, $3, $4, COALESCE($5, 'medium'), COALESCE($6, 'internal'), $7, $8) \
         RETURNING {COLUMNS}"
    )
}

/// Provides CRUD operations for template tasks.
pub struct TemplateTaskRepo;

impl TemplateTaskRepo {
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateTemplateTask,
    ) -> Result<TemplateTask, sqlx::Error> {
        let query = insert_query();
        sqlx::query_as::<_, TemplateTask>(&query)
            .bind(input.template_milestone_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.position)
            .bind(&input.priority)
            .bind(&input.visibility)
            .bind(input.estimated_hours)
            .bind(input.relative_due_days)
            .fetch_one(&mut **tx)
            .await
    }

    /// List a milestone's tasks ordered by position.
    pub async fn list_by_milestone(
        pool: &PgPool,
        template_milestone_id: DbId,
    ) -> Result<Vec<TemplateTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_tasks \
             WHERE template_milestone_id = $1 \
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, TemplateTask>(&query)
            .bind(template_milestone_id)
            .fetch_all(pool)
            .await
    }

    /// List every task of a template, ordered by milestone then task position.
    pub async fn list_by_template(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<TemplateTask>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM template_tasks t \
             JOIN template_milestones m ON m.id = t.template_milestone_id \
             WHERE m.template_id = $1 \
             ORDER BY m.position ASC, t.position ASC, t.id ASC",
            prefixed_columns("t")
        );
        sqlx::query_as::<_, TemplateTask>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }
}

fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
