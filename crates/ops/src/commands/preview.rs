use agency_core::relative_date::describe_offset;
use agency_core::service_plan::{plan_service, ServicePlan};
use agency_db::repositories::ServiceTemplateRepo;
use agency_db::DbPool;
use anyhow::{anyhow, Context};
use serde::Serialize;

use crate::cli::PreviewArgs;
use crate::fixtures;

#[derive(Debug, Serialize)]
struct PreviewOutput<'a> {
    #[serde(flatten)]
    plan: &'a ServicePlan,
    end_date: String,
    duration: String,
    task_count: usize,
}

/// Render a plan as pretty JSON with its end date and duration.
pub fn render(plan: &ServicePlan) -> anyhow::Result<String> {
    let end = plan.end_date();
    let days = (end - plan.start_date).num_days();
    let duration = i32::try_from(days)
        .map(describe_offset)
        .unwrap_or_else(|_| format!("{days} days"));
    let output = PreviewOutput {
        plan,
        end_date: end.to_string(),
        duration,
        task_count: plan.task_count(),
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize plan")
}

/// Plan a template (stored or from a file) and print it. Returns `1` when the
/// template cannot be planned.
pub async fn run(pool: Option<&DbPool>, args: &PreviewArgs) -> anyhow::Result<i32> {
    let blueprint = match (&args.template, &args.file, pool) {
        (_, Some(path), _) => fixtures::load_template_file(path)?,
        (Some(name), None, Some(pool)) => {
            ServiceTemplateRepo::load_blueprint_by_name(pool, name)
                .await
                .with_context(|| format!("Failed to load template '{name}'"))?
                .1
        }
        _ => return Err(anyhow!("preview needs --template with a database, or --file")),
    };

    match plan_service(&blueprint, args.start) {
        Ok(plan) => {
            println!("{}", render(&plan)?);
            Ok(0)
        }
        Err(e) => {
            tracing::warn!(template = %blueprint.name, error = %e, "Template cannot be planned");
            eprintln!("{e}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn renders_bundled_template() {
        let templates = fixtures::load_templates(None).unwrap();
        let website = templates
            .iter()
            .find(|t| t.name == "Website Redesign")
            .unwrap();
        let plan = plan_service(website, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&render(&plan).unwrap()).unwrap();
        assert_eq!(json["template_name"], "Website Redesign");
        assert_eq!(json["start_date"], "2024-01-01");
        assert_eq!(json["end_date"], "2024-02-26");
        assert_eq!(json["duration"], "8 weeks");
        assert_eq!(json["task_count"], 9);
        assert_eq!(json["milestones"][1]["start_date"], "2024-01-08");
    }
}
