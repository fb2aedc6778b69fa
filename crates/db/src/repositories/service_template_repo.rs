//! Repository for the `service_templates` table and its milestone/task tree.

use agency_core::error::CoreError;
use agency_core::service_template::{
    validate_blueprint, validate_color, validate_name, MilestoneBlueprint, TaskBlueprint,
    TemplateBlueprint,
};
use agency_core::types::DbId;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::service_template::{
    ServiceTemplate, ServiceTemplateSummary, UpdateServiceTemplate,
};
use crate::models::template_milestone::CreateTemplateMilestone;
use crate::models::template_task::CreateTemplateTask;
use crate::repositories::{TemplateMilestoneRepo, TemplateTaskRepo};

const COLUMNS: &str = "id, name, description, color, created_by, is_default, created_at, updated_at";

fn insert_query() -> String {
    format!(
        "INSERT INTO service_templates (name, description, color, created_by, is_default) \
         VALUES ($1, $2, COALESCE($3, '#3B82F6'), $4, COALESCE($5, false)) \
         RETURNING {COLUMNS}"
    )
}

/// Provides CRUD operations for service templates.
pub struct ServiceTemplateRepo;

impl ServiceTemplateRepo {
    /// Validate a blueprint and insert the template with all of its
    /// milestones and tasks in a single transaction.
    ///
    /// An existing template with the same name yields `CoreError::Conflict`.
    pub async fn create_from_blueprint(
        pool: &PgPool,
        created_by: Option<DbId>,
        blueprint: &TemplateBlueprint,
    ) -> Result<ServiceTemplate, DbError> {
        validate_blueprint(blueprint)?;

        let mut tx = pool.begin().await?;

        let query = insert_query();
        let template = sqlx::query_as::<_, ServiceTemplate>(&query)
            .bind(&blueprint.name)
            .bind(&blueprint.description)
            .bind(&blueprint.color)
            .bind(created_by)
            .bind(blueprint.is_default)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::Core(
                    CoreError::Conflict(format!("Template '{}' already exists", blueprint.name)),
                ),
                other => DbError::Database(other),
            })?;

        for milestone in &blueprint.milestones {
            let row = TemplateMilestoneRepo::create_in_tx(
                &mut tx,
                &CreateTemplateMilestone {
                    template_id: template.id,
                    name: milestone.name.clone(),
                    description: milestone.description.clone(),
                    position: milestone.position,
                    relative_start_days: milestone.relative_start_days,
                    relative_due_days: milestone.relative_due_days,
                },
            )
            .await?;

            for task in &milestone.tasks {
                TemplateTaskRepo::create_in_tx(
                    &mut tx,
                    &CreateTemplateTask {
                        template_milestone_id: row.id,
                        title: task.title.clone(),
                        description: task.description.clone(),
                        position: task.position,
                        priority: Some(task.priority.as_str().to_string()),
                        visibility: Some(task.visibility.as_str().to_string()),
                        estimated_hours: task.estimated_hours,
                        relative_due_days: task.relative_due_days,
                    },
                )
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            template_id = template.id,
            name = %template.name,
            milestones = blueprint.milestones.len(),
            tasks = blueprint.task_count(),
            "Created service template"
        );
        Ok(template)
    }

    /// Find a template by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_templates WHERE id = $1");
        sqlx::query_as::<_, ServiceTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a template by its unique name.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<ServiceTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_templates WHERE name = $1");
        sqlx::query_as::<_, ServiceTemplate>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all templates, defaults first, then by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<ServiceTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_templates ORDER BY is_default DESC, name ASC"
        );
        sqlx::query_as::<_, ServiceTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    /// List templates with milestone and task counts.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<ServiceTemplateSummary>, sqlx::Error> {
        sqlx::query_as::<_, ServiceTemplateSummary>(
            "SELECT st.id, st.name, st.color, st.is_default, \
                    COUNT(DISTINCT tm.id) AS milestone_count, \
                    COUNT(tt.id) AS task_count \
             FROM service_templates st \
             LEFT JOIN template_milestones tm ON tm.template_id = st.id \
             LEFT JOIN template_tasks tt ON tt.template_milestone_id = tm.id \
             GROUP BY st.id \
             ORDER BY st.is_default DESC, st.name ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a template. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateServiceTemplate,
    ) -> Result<Option<ServiceTemplate>, DbError> {
        if let Some(name) = &input.name {
            validate_name("Template", name)?;
        }
        if let Some(color) = &input.color {
            validate_color(color)?;
        }

        let query = format!(
            "UPDATE service_templates SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                color = COALESCE($4, color), \
                is_default = COALESCE($5, is_default) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ServiceTemplate>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(input.is_default)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Delete a template; milestones and tasks cascade. Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM service_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Read a stored template back as a blueprint tree.
    ///
    /// Returns `Ok(None)` when the template does not exist. Stored enum text
    /// that does not parse surfaces as `CoreError::Validation`.
    pub async fn load_blueprint(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TemplateBlueprint>, DbError> {
        let Some(template) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let milestones = TemplateMilestoneRepo::list_by_template(pool, id).await?;
        let tasks = TemplateTaskRepo::list_by_template(pool, id).await?;

        let mut blueprints = Vec::with_capacity(milestones.len());
        for milestone in milestones {
            let mut task_blueprints = Vec::new();
            for task in tasks.iter().filter(|t| t.template_milestone_id == milestone.id) {
                task_blueprints.push(TaskBlueprint {
                    title: task.title.clone(),
                    description: task.description.clone(),
                    position: task.position,
                    priority: task.priority.parse()?,
                    visibility: task.visibility.parse()?,
                    estimated_hours: task.estimated_hours,
                    relative_due_days: task.relative_due_days,
                });
            }
            blueprints.push(MilestoneBlueprint {
                name: milestone.name,
                description: milestone.description,
                position: milestone.position,
                relative_start_days: milestone.relative_start_days,
                relative_due_days: milestone.relative_due_days,
                tasks: task_blueprints,
            });
        }

        Ok(Some(TemplateBlueprint {
            name: template.name,
            description: template.description,
            color: Some(template.color),
            is_default: template.is_default,
            milestones: blueprints,
        }))
    }

    /// Look a template up by name and load its blueprint.
    pub async fn load_blueprint_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<(ServiceTemplate, TemplateBlueprint), DbError> {
        let template = Self::find_by_name(pool, name).await?.ok_or_else(|| {
            CoreError::NotFoundByName {
                entity: "service_template",
                name: name.to_string(),
            }
        })?;
        let blueprint = Self::load_blueprint(pool, template.id).await?.ok_or(
            CoreError::NotFound {
                entity: "service_template",
                id: template.id,
            },
        )?;
        Ok((template, blueprint))
    }
}
