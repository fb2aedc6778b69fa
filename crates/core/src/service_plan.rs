//! Planning a live service from a template blueprint.
//!
//! Milestone windows resolve against the service start date; task due dates
//! resolve against their milestone's resolved start date. The resulting plan
//! is what gets inserted as live milestones and tasks.

use serde::Serialize;

use crate::error::CoreError;
use crate::relative_date::resolve_date;
use crate::service_template::{
    validate_blueprint, TaskPriority, TaskVisibility, TemplateBlueprint,
};
use crate::types::CalendarDate;

/// A milestone with absolute dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedMilestone {
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub start_date: CalendarDate,
    pub due_date: CalendarDate,
    pub tasks: Vec<PlannedTask>,
}

/// A task with an absolute due date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedTask {
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub priority: TaskPriority,
    pub visibility: TaskVisibility,
    pub estimated_hours: Option<f64>,
    pub due_date: CalendarDate,
}

/// The resolved structure of a service created from a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicePlan {
    pub template_name: String,
    pub start_date: CalendarDate,
    pub milestones: Vec<PlannedMilestone>,
}

impl ServicePlan {
    /// Latest date in the plan, or the start date for an empty template.
    pub fn end_date(&self) -> CalendarDate {
        self.milestones
            .iter()
            .flat_map(|m| std::iter::once(m.due_date).chain(m.tasks.iter().map(|t| t.due_date)))
            .max()
            .unwrap_or(self.start_date)
    }

    pub fn task_count(&self) -> usize {
        self.milestones.iter().map(|m| m.tasks.len()).sum()
    }
}

/// Resolve a template into a dated plan starting at `start_date`.
///
/// The blueprint is validated first; an invalid template never produces a
/// plan. Milestones and tasks come out ordered by position.
pub fn plan_service(
    blueprint: &TemplateBlueprint,
    start_date: CalendarDate,
) -> Result<ServicePlan, CoreError> {
    validate_blueprint(blueprint)?;

    let mut milestones = Vec::with_capacity(blueprint.milestones.len());
    for milestone in blueprint.ordered_milestones() {
        let m_start = resolve(start_date, milestone.relative_start_days)?;
        let m_due = resolve(start_date, milestone.relative_due_days)?;

        let mut tasks = Vec::with_capacity(milestone.tasks.len());
        for task in milestone.ordered_tasks() {
            tasks.push(PlannedTask {
                title: task.title.clone(),
                description: task.description.clone(),
                position: task.position,
                priority: task.priority,
                visibility: task.visibility,
                estimated_hours: task.estimated_hours,
                due_date: resolve(m_start, task.relative_due_days)?,
            });
        }

        milestones.push(PlannedMilestone {
            name: milestone.name.clone(),
            description: milestone.description.clone(),
            position: milestone.position,
            start_date: m_start,
            due_date: m_due,
            tasks,
        });
    }

    tracing::debug!(
        template = %blueprint.name,
        %start_date,
        milestones = milestones.len(),
        "Planned service from template"
    );

    Ok(ServicePlan {
        template_name: blueprint.name.clone(),
        start_date,
        milestones,
    })
}

fn resolve(start: CalendarDate, days: i32) -> Result<CalendarDate, CoreError> {
    resolve_date(start, days).ok_or_else(|| {
        CoreError::Validation(format!("{start} + {days} days is outside the supported date range"))
    })
}

/// Check the ordering invariants of dated milestones and tasks.
///
/// Returns one message per violation: a milestone due on or before its start,
/// or a task due before its milestone starts.
pub fn plan_violations(plan: &ServicePlan) -> Vec<String> {
    let mut violations = Vec::new();
    for m in &plan.milestones {
        if m.due_date <= m.start_date {
            violations.push(format!(
                "milestone '{}' is due {} but starts {}",
                m.name, m.due_date, m.start_date
            ));
        }
        for t in &m.tasks {
            if t.due_date < m.start_date {
                violations.push(format!(
                    "task '{}' is due {} before milestone '{}' starts {}",
                    t.title, t.due_date, m.name, m.start_date
                ));
            }
        }
    }
    violations
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
