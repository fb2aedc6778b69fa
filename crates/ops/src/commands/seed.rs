//! Fixture seeding: test users, service templates and a test service.
//!
//! Every item is attempted independently; failures are logged and counted.

use std::path::Path;

use agency_core::check::CheckReport;
use agency_core::error::CoreError;
use agency_core::types::DbId;
use agency_db::models::client::CreateClient;
use agency_db::models::profile::CreateProfile;
use agency_db::models::service::CreateService;
use agency_db::repositories::{ClientRepo, ProfileRepo, ServiceRepo, ServiceTemplateRepo};
use agency_db::{DbError, DbPool};

use crate::cli::SeedServiceArgs;
use crate::fixtures;

/// Upsert the admin/team/client fixture profiles.
pub async fn users(pool: &DbPool, file: Option<&Path>) -> anyhow::Result<CheckReport> {
    let users = fixtures::load_users(file)?;
    let mut report = CheckReport::new();

    for user in &users {
        let name = format!("user {} ({})", user.email, user.role);
        match ProfileRepo::upsert(pool, &CreateProfile::from(user)).await {
            Ok(profile) => {
                tracing::info!(profile_id = profile.id, email = %profile.email, "Seeded profile");
                report.pass(name);
            }
            Err(e) => report.fail(name, e.to_string()),
        }
    }

    Ok(report)
}

/// Insert fixture templates, skipping any whose name is already taken.
pub async fn templates(
    pool: &DbPool,
    creator_email: &str,
    file: Option<&Path>,
) -> anyhow::Result<CheckReport> {
    let blueprints = fixtures::load_templates(file)?;
    let creator = creator_id(pool, creator_email).await;
    let mut report = CheckReport::new();

    for blueprint in &blueprints {
        let name = format!("template '{}'", blueprint.name);

        match ServiceTemplateRepo::find_by_name(pool, &blueprint.name).await {
            Ok(Some(existing)) => {
                tracing::info!(template_id = existing.id, name = %existing.name, "Template already exists, skipping");
                report.pass(name);
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                report.fail(name, e.to_string());
                continue;
            }
        }

        let result = ServiceTemplateRepo::create_from_blueprint(pool, creator, blueprint).await;
        report.record(name, result);
    }

    Ok(report)
}

/// Create the named client if needed, then a service from the named template.
pub async fn service(pool: &DbPool, creator_email: &str, args: &SeedServiceArgs) -> CheckReport {
    let mut report = CheckReport::new();
    let creator = creator_id(pool, creator_email).await;

    let client = ClientRepo::find_or_create(
        pool,
        creator,
        &CreateClient {
            name: args.client.clone(),
            company: None,
            email: None,
        },
    )
    .await;
    let Some(client) = report.record(format!("client '{}'", args.client), client) else {
        return report;
    };

    let template = ServiceTemplateRepo::find_by_name(pool, &args.template)
        .await
        .map_err(DbError::from)
        .and_then(|found| {
            found.ok_or_else(|| {
                DbError::Core(CoreError::NotFoundByName {
                    entity: "service_template",
                    name: args.template.clone(),
                })
            })
        });
    let Some(template) = report.record(format!("template '{}'", args.template), template) else {
        return report;
    };

    let service_name = args
        .name
        .clone()
        .unwrap_or_else(|| format!("{} - {}", args.client, args.template));
    let name = format!("service '{service_name}'");

    match ServiceRepo::find_by_client_and_name(pool, client.id, &service_name).await {
        Ok(Some(existing)) => {
            tracing::info!(service_id = existing.id, name = %existing.name, "Service already exists, skipping");
            report.pass(name);
            return report;
        }
        Ok(None) => {}
        Err(e) => {
            report.fail(name, e.to_string());
            return report;
        }
    }

    let input = CreateService {
        client_id: client.id,
        name: service_name,
        description: template.description.clone(),
        start_date: args.start,
        budget: args.budget,
        status: None,
    };

    let created = ServiceRepo::create_from_template(pool, creator, template.id, &input).await;
    if let Some(created) = report.record(name, created) {
        println!(
            "Created service {} with {} milestones and {} tasks",
            created.service.id,
            created.milestones.len(),
            created.tasks.len()
        );
    }

    report
}

/// Resolve the seeding admin's profile ID. A missing admin is logged and
/// seeding proceeds with no creator recorded.
async fn creator_id(pool: &DbPool, email: &str) -> Option<DbId> {
    match ProfileRepo::find_by_email(pool, email).await {
        Ok(Some(profile)) => Some(profile.id),
        Ok(None) => {
            tracing::warn!(%email, "Seed admin profile not found; run `seed users` first");
            None
        }
        Err(e) => {
            tracing::warn!(%email, error = %e, "Failed to look up seed admin profile");
            None
        }
    }
}
