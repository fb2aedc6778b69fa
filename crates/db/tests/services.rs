//! Integration tests for creating live services from templates.

use agency_core::error::CoreError;
use agency_core::service_template::{
    MilestoneBlueprint, MilestoneStatus, ServiceStatus, TaskBlueprint, TaskPriority, TaskStatus,
    TaskVisibility, TemplateBlueprint,
};
use agency_core::types::CalendarDate;
use agency_db::models::client::CreateClient;
use agency_db::models::service::CreateService;
use agency_db::repositories::{
    ClientRepo, MilestoneRepo, ServiceRepo, ServiceTemplateRepo, TaskRepo,
};
use agency_db::DbError;
use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> CalendarDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seo_blueprint() -> TemplateBlueprint {
    TemplateBlueprint {
        name: "SEO Campaign".to_string(),
        description: None,
        color: None,
        is_default: false,
        milestones: vec![
            MilestoneBlueprint {
                name: "Audit".to_string(),
                description: None,
                position: 0,
                relative_start_days: 0,
                relative_due_days: 14,
                tasks: vec![TaskBlueprint {
                    title: "Technical crawl".to_string(),
                    description: None,
                    position: 0,
                    priority: TaskPriority::High,
                    visibility: TaskVisibility::Internal,
                    estimated_hours: Some(6.0),
                    relative_due_days: 3,
                }],
            },
            MilestoneBlueprint {
                name: "Reporting".to_string(),
                description: None,
                position: 1,
                relative_start_days: 44,
                relative_due_days: 90,
                tasks: vec![TaskBlueprint {
                    title: "Monthly report".to_string(),
                    description: None,
                    position: 0,
                    priority: TaskPriority::Medium,
                    visibility: TaskVisibility::Client,
                    estimated_hours: None,
                    relative_due_days: 16,
                }],
            },
        ],
    }
}

async fn client_id(pool: &PgPool) -> i64 {
    ClientRepo::find_or_create(
        pool,
        None,
        &CreateClient {
            name: "Acme Corp".to_string(),
            company: Some("Acme".to_string()),
            email: Some("ops@acme.test".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_service(client_id: i64, start: CalendarDate) -> CreateService {
    CreateService {
        client_id,
        name: "Acme SEO".to_string(),
        description: None,
        start_date: start,
        budget: Some(4500.0),
        status: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_from_template_resolves_dates(pool: PgPool) {
    let template = ServiceTemplateRepo::create_from_blueprint(&pool, None, &seo_blueprint())
        .await
        .unwrap();
    let client = client_id(&pool).await;

    let created = ServiceRepo::create_from_template(
        &pool,
        None,
        template.id,
        &new_service(client, date(2024, 3, 1)),
    )
    .await
    .unwrap();

    assert_eq!(created.service.template_id, Some(template.id));
    assert_eq!(created.service.status, "planning");
    assert_eq!(created.milestones.len(), 2);
    assert_eq!(created.milestones[0].start_date, date(2024, 3, 1));
    assert_eq!(created.milestones[0].due_date, date(2024, 3, 15));
    assert_eq!(created.milestones[1].start_date, date(2024, 4, 14));
    assert_eq!(created.milestones[1].due_date, date(2024, 5, 30));

    assert_eq!(created.tasks.len(), 2);
    assert_eq!(created.tasks[0].due_date, Some(date(2024, 3, 4)));
    assert_eq!(created.tasks[1].due_date, Some(date(2024, 4, 30)));
    assert_eq!(created.tasks[1].visibility, "client");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_with_structure_matches_created(pool: PgPool) {
    let template = ServiceTemplateRepo::create_from_blueprint(&pool, None, &seo_blueprint())
        .await
        .unwrap();
    let client = client_id(&pool).await;
    let created = ServiceRepo::create_from_template(
        &pool,
        None,
        template.id,
        &new_service(client, date(2025, 1, 6)),
    )
    .await
    .unwrap();

    let loaded = ServiceRepo::find_with_structure(&pool, created.service.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.milestones.len(), 2);
    assert_eq!(loaded.tasks.len(), 2);
    assert_eq!(loaded.tasks[0].title, "Technical crawl");

    let per_milestone = TaskRepo::list_by_milestone(&pool, loaded.milestones[1].id)
        .await
        .unwrap();
    assert_eq!(per_milestone.len(), 1);
    assert_eq!(per_milestone[0].title, "Monthly report");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_template_is_not_found(pool: PgPool) {
    let client = client_id(&pool).await;
    let err = ServiceRepo::create_from_template(
        &pool,
        None,
        424_242,
        &new_service(client, date(2024, 1, 1)),
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_status_is_rejected_before_insert(pool: PgPool) {
    let client = client_id(&pool).await;
    let mut input = new_service(client, date(2024, 1, 1));
    input.status = Some("paused".to_string());

    let err = ServiceRepo::create(&pool, None, &input).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
    assert!(ServiceRepo::list_by_client(&pool, client).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_blueprint_creates_no_service(pool: PgPool) {
    let client = client_id(&pool).await;
    let mut blueprint = seo_blueprint();
    blueprint.milestones[0].tasks[0].estimated_hours = Some(-1.0);

    let err = ServiceRepo::create_from_blueprint(
        &pool,
        None,
        None,
        &blueprint,
        &new_service(client, date(2024, 1, 1)),
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));
    assert!(ServiceRepo::list_by_client(&pool, client).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_updates(pool: PgPool) {
    let client = client_id(&pool).await;
    let service = ServiceRepo::create(&pool, None, &new_service(client, date(2024, 1, 1)))
        .await
        .unwrap();

    assert!(ServiceRepo::update_status(&pool, service.id, ServiceStatus::Active)
        .await
        .unwrap());
    let reloaded = ServiceRepo::find_by_id(&pool, service.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, "active");
    assert!(MilestoneRepo::list_by_service(&pool, service.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_find_or_create_is_idempotent(pool: PgPool) {
    let first = client_id(&pool).await;
    let second = client_id(&pool).await;
    assert_eq!(first, second);
    let found = ClientRepo::find_by_name(&pool, "Acme Corp").await.unwrap().unwrap();
    assert_eq!(found.id, first);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_milestone_and_task_status_updates(pool: PgPool) {
    let client = client_id(&pool).await;
    let created = ServiceRepo::create_from_blueprint(
        &pool,
        None,
        None,
        &seo_blueprint(),
        &new_service(client, date(2024, 3, 1)),
    )
    .await
    .unwrap();
    assert_eq!(created.milestones[0].status, "upcoming");
    assert_eq!(created.tasks[0].status, "todo");

    let milestone = created.milestones[0].id;
    let task = created.tasks[0].id;
    assert!(MilestoneRepo::update_status(&pool, milestone, MilestoneStatus::InProgress)
        .await
        .unwrap());
    assert!(TaskRepo::update_status(&pool, task, TaskStatus::Done)
        .await
        .unwrap());

    let loaded = ServiceRepo::find_with_structure(&pool, created.service.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.milestones[0].status, "in_progress");
    assert_eq!(loaded.milestones[1].status, "upcoming");
    assert_eq!(loaded.tasks[0].status, "done");

    assert!(!MilestoneRepo::update_status(&pool, 999_999, MilestoneStatus::Completed)
        .await
        .unwrap());
    assert!(!TaskRepo::update_status(&pool, 999_999, TaskStatus::InProgress)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_service_cascades(pool: PgPool) {
    let template = ServiceTemplateRepo::create_from_blueprint(&pool, None, &seo_blueprint())
        .await
        .unwrap();
    let client = client_id(&pool).await;
    let created = ServiceRepo::create_from_template(
        &pool,
        None,
        template.id,
        &new_service(client, date(2024, 3, 1)),
    )
    .await
    .unwrap();
    let milestone = created.milestones[0].id;

    assert!(ServiceRepo::delete(&pool, created.service.id).await.unwrap());
    assert!(!ServiceRepo::delete(&pool, created.service.id).await.unwrap());
    assert!(ServiceRepo::find_by_id(&pool, created.service.id)
        .await
        .unwrap()
        .is_none());
    assert!(TaskRepo::list_by_milestone(&pool, milestone)
        .await
        .unwrap()
        .is_empty());

    // The template is untouched.
    assert!(ServiceTemplateRepo::load_blueprint(&pool, template.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_client_and_name(pool: PgPool) {
    let client = client_id(&pool).await;
    assert!(ServiceRepo::find_by_client_and_name(&pool, client, "Acme SEO")
        .await
        .unwrap()
        .is_none());

    let service = ServiceRepo::create(&pool, None, &new_service(client, date(2024, 1, 1)))
        .await
        .unwrap();
    let found = ServiceRepo::find_by_client_and_name(&pool, client, "Acme SEO")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, service.id);

    let found_client = ClientRepo::find_by_id(&pool, client).await.unwrap().unwrap();
    assert_eq!(found_client.name, "Acme Corp");
    assert!(ClientRepo::find_by_id(&pool, client + 1000).await.unwrap().is_none());
}
