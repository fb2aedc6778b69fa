//! Integration tests for service template persistence.
//!
//! Exercises the repository layer against a real database:
//! - Creating a template tree from a blueprint in one transaction
//! - Reading the tree back as a blueprint
//! - Duplicate names and invalid blueprints
//! - Cascade delete of milestones and tasks

use agency_core::error::CoreError;
use agency_core::service_template::{
    MilestoneBlueprint, TaskBlueprint, TaskPriority, TaskVisibility, TemplateBlueprint,
};
use agency_db::models::profile::CreateProfile;
use agency_db::models::service_template::UpdateServiceTemplate;
use agency_db::repositories::{
    ProfileRepo, ServiceTemplateRepo, TemplateMilestoneRepo, TemplateTaskRepo,
};
use agency_db::DbError;
use assert_matches::assert_matches;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn task(title: &str, position: i32, due: i32) -> TaskBlueprint {
    TaskBlueprint {
        title: title.to_string(),
        description: None,
        position,
        priority: TaskPriority::High,
        visibility: TaskVisibility::Client,
        estimated_hours: Some(1.5),
        relative_due_days: due,
    }
}

fn blueprint(name: &str) -> TemplateBlueprint {
    TemplateBlueprint {
        name: name.to_string(),
        description: Some("Seeded by tests".to_string()),
        color: Some("#10B981".to_string()),
        is_default: false,
        milestones: vec![
            MilestoneBlueprint {
                name: "Discovery".to_string(),
                description: None,
                position: 0,
                relative_start_days: 0,
                relative_due_days: 7,
                tasks: vec![task("Kickoff", 0, 1), task("Audit", 1, 5)],
            },
            MilestoneBlueprint {
                name: "Delivery".to_string(),
                description: Some("Ship it".to_string()),
                position: 1,
                relative_start_days: 7,
                relative_due_days: 30,
                tasks: vec![task("Launch", 0, 20)],
            },
        ],
    }
}

async fn admin_id(pool: &PgPool) -> i64 {
    ProfileRepo::upsert(
        pool,
        &CreateProfile {
            email: "admin@agency.test".to_string(),
            full_name: "Avery Admin".to_string(),
            role: "admin".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_from_blueprint_inserts_tree(pool: PgPool) {
    let admin = admin_id(&pool).await;
    let template =
        ServiceTemplateRepo::create_from_blueprint(&pool, Some(admin), &blueprint("Web Build"))
            .await
            .unwrap();

    assert_eq!(template.name, "Web Build");
    assert_eq!(template.color, "#10B981");
    assert_eq!(template.created_by, Some(admin));

    let milestones = TemplateMilestoneRepo::list_by_template(&pool, template.id)
        .await
        .unwrap();
    assert_eq!(milestones.len(), 2);
    assert_eq!(milestones[0].name, "Discovery");
    assert_eq!(milestones[1].relative_due_days, 30);

    let tasks = TemplateTaskRepo::list_by_milestone(&pool, milestones[0].id)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].priority, "high");
    assert_eq!(tasks[0].visibility, "client");
    assert_eq!(tasks[1].estimated_hours, Some(1.5));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_load_blueprint_round_trips(pool: PgPool) {
    let original = blueprint("Round Trip");
    let template = ServiceTemplateRepo::create_from_blueprint(&pool, None, &original)
        .await
        .unwrap();

    let loaded = ServiceTemplateRepo::load_blueprint(&pool, template.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded, original);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_load_missing_blueprint_is_none(pool: PgPool) {
    let loaded = ServiceTemplateRepo::load_blueprint(&pool, 999_999).await.unwrap();
    assert!(loaded.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_name_is_conflict(pool: PgPool) {
    ServiceTemplateRepo::create_from_blueprint(&pool, None, &blueprint("Twice"))
        .await
        .unwrap();
    let err = ServiceTemplateRepo::create_from_blueprint(&pool, None, &blueprint("Twice"))
        .await
        .unwrap_err();
    assert_matches!(&err, DbError::Core(CoreError::Conflict(_)));
    assert!(err.is_unique_violation());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_blueprint_writes_nothing(pool: PgPool) {
    let mut bad = blueprint("Broken");
    bad.milestones[1].relative_due_days = 7;

    let err = ServiceTemplateRepo::create_from_blueprint(&pool, None, &bad)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    let found = ServiceTemplateRepo::find_by_name(&pool, "Broken").await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_window_check_constraint_rejects_direct_insert(pool: PgPool) {
    let template = ServiceTemplateRepo::create_from_blueprint(&pool, None, &blueprint("Direct"))
        .await
        .unwrap();

    let result = sqlx::query(
        "INSERT INTO template_milestones \
            (template_id, name, position, relative_start_days, relative_due_days) \
         VALUES ($1, 'Backwards', 5, 10, 3)",
    )
    .bind(template.id)
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_summaries_counts_children(pool: PgPool) {
    let mut default = blueprint("Default One");
    default.is_default = true;
    ServiceTemplateRepo::create_from_blueprint(&pool, None, &default)
        .await
        .unwrap();
    ServiceTemplateRepo::create_from_blueprint(&pool, None, &blueprint("Another"))
        .await
        .unwrap();

    let summaries = ServiceTemplateRepo::list_summaries(&pool).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name, "Default One");
    assert_eq!(summaries[0].milestone_count, 2);
    assert_eq!(summaries[0].task_count, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_validates_color(pool: PgPool) {
    let template = ServiceTemplateRepo::create_from_blueprint(&pool, None, &blueprint("Recolor"))
        .await
        .unwrap();

    let err = ServiceTemplateRepo::update(
        &pool,
        template.id,
        &UpdateServiceTemplate {
            color: Some("red".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::Validation(_)));

    let updated = ServiceTemplateRepo::update(
        &pool,
        template.id,
        &UpdateServiceTemplate {
            color: Some("#EF4444".to_string()),
            is_default: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.color, "#EF4444");
    assert!(updated.is_default);
    assert_eq!(updated.name, "Recolor");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_to_milestones_and_tasks(pool: PgPool) {
    let template = ServiceTemplateRepo::create_from_blueprint(&pool, None, &blueprint("Doomed"))
        .await
        .unwrap();

    assert!(ServiceTemplateRepo::delete(&pool, template.id).await.unwrap());
    assert!(!ServiceTemplateRepo::delete(&pool, template.id).await.unwrap());

    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM template_tasks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
