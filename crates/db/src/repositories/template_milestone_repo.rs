//! Repository for the `template_milestones` table.

use agency_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::template_milestone::{CreateTemplateMilestone, TemplateMilestone};

const COLUMNS: &str = "id, template_id, name, description, position, \
     relative_start_days, relative_due_days, created_at, updated_at";

fn insert_query() -> String {
    format!(
        "INSERT INTO template_milestones \
            (template_id, name, description, position, relative_start_days, relative_due_days) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {COLUMNS}"
    )
}

/// Provides CRUD operations for template milestones.
pub struct TemplateMilestoneRepo;

impl TemplateMilestoneRepo {
    pub(crate) async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateTemplateMilestone,
    ) -> Result<TemplateMilestone, sqlx::Error> {
        let query = insert_query();
        sqlx::query_as::<_, TemplateMilestone>(&query)
            .bind(input.template_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.position)
            .bind(input.relative_start_days)
            .bind(input.relative_due_days)
            .fetch_one(&mut **tx)
            .await
    }

    /// List a template's milestones ordered by position.
    pub async fn list_by_template(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Vec<TemplateMilestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM template_milestones \
             WHERE template_id = $1 \
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, TemplateMilestone>(&query)
            .bind(template_id)
            .fetch_all(pool)
            .await
    }
}
