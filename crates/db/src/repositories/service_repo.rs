//! Repository for the `services` table, including creating a service from a
//! template.

use agency_core::error::CoreError;
use agency_core::service_plan::{plan_service, ServicePlan};
use agency_core::service_template::{validate_name, ServiceStatus, TemplateBlueprint};
use agency_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::models::milestone::{CreateMilestone, Milestone};
use crate::models::service::{CreateService, Service, ServiceWithStructure};
use crate::models::task::{CreateTask, Task};
use crate::repositories::{MilestoneRepo, ServiceTemplateRepo, TaskRepo};

const COLUMNS: &str = "id, client_id, template_id, name, description, start_date, budget, \
     status, created_by, created_at, updated_at";

/// Provides CRUD operations for services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service without any structure, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: Option<DbId>,
        input: &CreateService,
    ) -> Result<Service, DbError> {
        validate_service_input(input)?;
        let mut tx = pool.begin().await?;
        let service = Self::insert_inner(&mut tx, created_by, None, input).await?;
        tx.commit().await?;
        Ok(service)
    }

    /// Create a service from a stored template.
    ///
    /// The template is loaded and planned against `input.start_date`, then
    /// the service, its milestones and its tasks are inserted in a single
    /// transaction.
    pub async fn create_from_template(
        pool: &PgPool,
        created_by: Option<DbId>,
        template_id: DbId,
        input: &CreateService,
    ) -> Result<ServiceWithStructure, DbError> {
        let blueprint = ServiceTemplateRepo::load_blueprint(pool, template_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "service_template",
                id: template_id,
            })?;
        Self::create_from_blueprint(pool, created_by, Some(template_id), &blueprint, input).await
    }

    /// Create a service from an in-memory blueprint. `template_id` records
    /// the originating template, if any.
    pub async fn create_from_blueprint(
        pool: &PgPool,
        created_by: Option<DbId>,
        template_id: Option<DbId>,
        blueprint: &TemplateBlueprint,
        input: &CreateService,
    ) -> Result<ServiceWithStructure, DbError> {
        validate_service_input(input)?;
        let plan = plan_service(blueprint, input.start_date)?;

        let mut tx = pool.begin().await?;
        let service = Self::insert_inner(&mut tx, created_by, template_id, input).await?;
        let (milestones, tasks) = Self::insert_plan_inner(&mut tx, service.id, &plan).await?;
        tx.commit().await?;

        tracing::info!(
            service_id = service.id,
            client_id = service.client_id,
            template = %plan.template_name,
            start_date = %plan.start_date,
            end_date = %plan.end_date(),
            milestones = milestones.len(),
            tasks = tasks.len(),
            "Created service from template"
        );

        Ok(ServiceWithStructure {
            service,
            milestones,
            tasks,
        })
    }

    /// Find a service by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a client's service by name. The oldest match wins if the name is
    /// not unique.
    pub async fn find_by_client_and_name(
        pool: &PgPool,
        client_id: DbId,
        name: &str,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM services \
             WHERE client_id = $1 AND name = $2 \
             ORDER BY id ASC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(client_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Load a service with its milestones and tasks.
    pub async fn find_with_structure(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceWithStructure>, sqlx::Error> {
        let Some(service) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let milestones = MilestoneRepo::list_by_service(pool, id).await?;
        let tasks = TaskRepo::list_by_service(pool, id).await?;
        Ok(Some(ServiceWithStructure {
            service,
            milestones,
            tasks,
        }))
    }

    /// List a client's services, most recent start first.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM services \
             WHERE client_id = $1 \
             ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Set a service's status. Returns `true` if the row exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: ServiceStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE services SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a service; milestones and tasks cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_inner(
        tx: &mut Transaction<'_, Postgres>,
        created_by: Option<DbId>,
        template_id: Option<DbId>,
        input: &CreateService,
    ) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services \
                (client_id, template_id, name, description, start_date, budget, status, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'planning'), $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(input.client_id)
            .bind(template_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.budget)
            .bind(&input.status)
            .bind(created_by)
            .fetch_one(&mut **tx)
            .await
    }

    async fn insert_plan_inner(
        tx: &mut Transaction<'_, Postgres>,
        service_id: DbId,
        plan: &ServicePlan,
    ) -> Result<(Vec<Milestone>, Vec<Task>), sqlx::Error> {
        let mut milestones = Vec::with_capacity(plan.milestones.len());
        let mut tasks = Vec::with_capacity(plan.task_count());

        for planned in &plan.milestones {
            let milestone = MilestoneRepo::create_in_tx(
                tx,
                &CreateMilestone {
                    service_id,
                    name: planned.name.clone(),
                    description: planned.description.clone(),
                    position: planned.position,
                    start_date: planned.start_date,
                    due_date: planned.due_date,
                },
            )
            .await?;

            for planned_task in &planned.tasks {
                let task = TaskRepo::create_in_tx(
                    tx,
                    &CreateTask {
                        milestone_id: milestone.id,
                        title: planned_task.title.clone(),
                        description: planned_task.description.clone(),
                        position: planned_task.position,
                        priority: Some(planned_task.priority.as_str().to_string()),
                        visibility: Some(planned_task.visibility.as_str().to_string()),
                        estimated_hours: planned_task.estimated_hours,
                        due_date: Some(planned_task.due_date),
                    },
                )
                .await?;
                tasks.push(task);
            }

            milestones.push(milestone);
        }

        Ok((milestones, tasks))
    }
}

fn validate_service_input(input: &CreateService) -> Result<(), CoreError> {
    validate_name("Service", &input.name)?;
    if let Some(status) = &input.status {
        status.parse::<ServiceStatus>()?;
    }
    if let Some(budget) = input.budget {
        if !budget.is_finite() || budget < 0.0 {
            return Err(CoreError::Validation(format!(
                "budget must be a non-negative number, got {budget}"
            )));
        }
    }
    Ok(())
}
