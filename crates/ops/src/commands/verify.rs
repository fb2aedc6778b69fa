//! Verification of stored templates and live services.

use agency_core::check::CheckReport;
use agency_core::service_plan::{plan_service, ServicePlan};
use agency_core::service_template::blueprint_violations;
use agency_core::types::DbId;
use agency_db::models::service::ServiceWithStructure;
use agency_db::repositories::{ServiceRepo, ServiceTemplateRepo};
use agency_db::DbPool;
use anyhow::anyhow;

/// Re-validate every stored template tree.
pub async fn templates(pool: &DbPool) -> anyhow::Result<CheckReport> {
    let stored = ServiceTemplateRepo::list(pool).await?;
    let mut report = CheckReport::new();

    if stored.is_empty() {
        report.fail("templates", "no service templates found; run `seed templates` first");
    }

    for template in stored {
        let name = format!("template '{}'", template.name);
        match ServiceTemplateRepo::load_blueprint(pool, template.id).await {
            Ok(Some(blueprint)) => {
                let mut violations = blueprint_violations(&blueprint);
                if blueprint.milestones.is_empty() {
                    violations.push("template has no milestones".to_string());
                }
                if violations.is_empty() {
                    report.pass(name);
                } else {
                    report.fail(name, violations.join("; "));
                }
            }
            Ok(None) => report.fail(name, "template disappeared during verification"),
            Err(e) => report.fail(name, e.to_string()),
        }
    }

    Ok(report)
}

/// Check a live service's dates, and compare them with its template plan
/// when it was created from one.
pub async fn service(pool: &DbPool, id: DbId) -> anyhow::Result<CheckReport> {
    let structure = ServiceRepo::find_with_structure(pool, id)
        .await?
        .ok_or_else(|| anyhow!("Service {id} not found"))?;

    let mut report = live_checks(&structure);

    if let Some(template_id) = structure.service.template_id {
        match ServiceTemplateRepo::load_blueprint(pool, template_id).await {
            Ok(Some(blueprint)) => {
                match plan_service(&blueprint, structure.service.start_date) {
                    Ok(plan) => report.merge(compare_with_plan(&structure, &plan)),
                    Err(e) => report.fail(format!("template {template_id} plan"), e.to_string()),
                }
            }
            Ok(None) => tracing::info!(template_id, "Template no longer exists; skipping plan comparison"),
            Err(e) => report.fail(format!("template {template_id}"), e.to_string()),
        }
    }

    Ok(report)
}

/// Ordering invariants on stored rows: each milestone is due after it starts
/// and no task is due before its milestone starts.
pub fn live_checks(structure: &ServiceWithStructure) -> CheckReport {
    let mut report = CheckReport::new();

    for milestone in &structure.milestones {
        let name = format!("milestone '{}' window", milestone.name);
        if milestone.due_date > milestone.start_date {
            report.pass(name);
        } else {
            report.fail(
                name,
                format!(
                    "due {} is not after start {}",
                    milestone.due_date, milestone.start_date
                ),
            );
        }

        for task in structure.tasks.iter().filter(|t| t.milestone_id == milestone.id) {
            let Some(due) = task.due_date else { continue };
            let name = format!("task '{}' due date", task.title);
            if due >= milestone.start_date {
                report.pass(name);
            } else {
                report.fail(
                    name,
                    format!(
                        "due {due} precedes milestone '{}' start {}",
                        milestone.name, milestone.start_date
                    ),
                );
            }
        }
    }

    report
}

/// Compare stored milestones and tasks (matched by position) with a plan.
/// Stored rows with no planned counterpart are reported as failures.
pub fn compare_with_plan(structure: &ServiceWithStructure, plan: &ServicePlan) -> CheckReport {
    let mut report = CheckReport::new();

    for planned in &plan.milestones {
        let name = format!("milestone '{}' matches template", planned.name);
        let Some(live) = structure
            .milestones
            .iter()
            .find(|m| m.position == planned.position)
        else {
            report.fail(name, format!("no milestone at position {}", planned.position));
            continue;
        };

        if live.start_date == planned.start_date && live.due_date == planned.due_date {
            report.pass(name);
        } else {
            report.fail(
                name,
                format!(
                    "expected {}..{}, found {}..{}",
                    planned.start_date, planned.due_date, live.start_date, live.due_date
                ),
            );
        }

        for planned_task in &planned.tasks {
            let name = format!("task '{}' matches template", planned_task.title);
            let found = structure
                .tasks
                .iter()
                .find(|t| t.milestone_id == live.id && t.position == planned_task.position);
            match found {
                None => report.fail(
                    name,
                    format!(
                        "no task at position {} in milestone '{}'",
                        planned_task.position, live.name
                    ),
                ),
                Some(task) if task.due_date == Some(planned_task.due_date) => report.pass(name),
                Some(task) => report.fail(
                    name,
                    format!(
                        "expected due {}, found {}",
                        planned_task.due_date,
                        task.due_date
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| "none".to_string())
                    ),
                ),
            }
        }
    }

    for live in &structure.milestones {
        let Some(planned) = plan.milestones.iter().find(|m| m.position == live.position) else {
            report.fail(
                format!("milestone '{}' matches template", live.name),
                format!("position {} is not in the template", live.position),
            );
            continue;
        };

        let extra = structure.tasks.iter().filter(|t| {
            t.milestone_id == live.id && !planned.tasks.iter().any(|p| p.position == t.position)
        });
        for task in extra {
            report.fail(
                format!("task '{}' matches template", task.title),
                format!(
                    "position {} in milestone '{}' is not in the template",
                    task.position, live.name
                ),
            );
        }
    }

    report
}
