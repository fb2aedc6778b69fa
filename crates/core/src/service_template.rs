//! Service template blueprints, enumerations and validation.
//!
//! A template is a tree: template -> milestones -> tasks. Milestones carry
//! start/due offsets relative to the service start date; tasks carry a due
//! offset relative to their milestone's start. The types here are what the
//! fixture files deserialize into and what the planner consumes.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a template, milestone or task name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a description.
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// Largest relative offset accepted in a template (roughly ten years).
pub const MAX_RELATIVE_DAYS: i32 = 3650;

/// Colour tag applied when a template does not specify one.
pub const DEFAULT_TEMPLATE_COLOR: &str = "#3B82F6";

// ---------------------------------------------------------------------------
// Text enumerations
// ---------------------------------------------------------------------------

/// Defines a lowercase TEXT-backed enum with `as_str`, `FromStr`, `Display`
/// and serde support.
macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The value stored in the database column.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{}'. Expected one of: {}",
                        stringify!($name),
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_text_enum! {
    /// Task priority.
    TaskPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

define_text_enum! {
    /// Who can see a task: agency staff only, or the client as well.
    TaskVisibility {
        Internal => "internal",
        Client => "client",
    }
}

define_text_enum! {
    /// Service lifecycle status.
    ServiceStatus {
        Planning => "planning",
        Active => "active",
        OnHold => "on_hold",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

define_text_enum! {
    /// Live milestone progress.
    MilestoneStatus {
        Upcoming => "upcoming",
        InProgress => "in_progress",
        Completed => "completed",
    }
}

define_text_enum! {
    /// Live task progress.
    TaskStatus {
        Todo => "todo",
        InProgress => "in_progress",
        Done => "done",
    }
}

define_text_enum! {
    /// Role of a user profile.
    ProfileRole {
        Admin => "admin",
        Team => "team",
        Client => "client",
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Default for TaskVisibility {
    fn default() -> Self {
        Self::Internal
    }
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self::Planning
    }
}

// ---------------------------------------------------------------------------
// Blueprint types
// ---------------------------------------------------------------------------

/// A complete template tree as authored in fixture files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateBlueprint {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub milestones: Vec<MilestoneBlueprint>,
}

/// A milestone inside a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneBlueprint {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub position: i32,
    pub relative_start_days: i32,
    pub relative_due_days: i32,
    #[serde(default)]
    pub tasks: Vec<TaskBlueprint>,
}

/// A task inside a template milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBlueprint {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub position: i32,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub visibility: TaskVisibility,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Days after the owning milestone's start.
    pub relative_due_days: i32,
}

impl TemplateBlueprint {
    /// Colour tag, falling back to [`DEFAULT_TEMPLATE_COLOR`].
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_TEMPLATE_COLOR)
    }

    /// Total number of tasks across all milestones.
    pub fn task_count(&self) -> usize {
        self.milestones.iter().map(|m| m.tasks.len()).sum()
    }

    /// Sum of estimated hours across all tasks that carry an estimate.
    pub fn estimated_hours(&self) -> f64 {
        self.milestones
            .iter()
            .flat_map(|m| m.tasks.iter())
            .filter_map(|t| t.estimated_hours)
            .sum()
    }

    /// Largest milestone due offset, i.e. the template's nominal duration.
    pub fn duration_days(&self) -> i32 {
        self.milestones
            .iter()
            .map(|m| m.relative_due_days)
            .max()
            .unwrap_or(0)
    }

    /// Milestones sorted by position.
    pub fn ordered_milestones(&self) -> Vec<&MilestoneBlueprint> {
        let mut milestones: Vec<_> = self.milestones.iter().collect();
        milestones.sort_by_key(|m| m.position);
        milestones
    }
}

impl MilestoneBlueprint {
    /// Tasks sorted by position.
    pub fn ordered_tasks(&self) -> Vec<&TaskBlueprint> {
        let mut tasks: Vec<_> = self.tasks.iter().collect();
        tasks.sort_by_key(|t| t.position);
        tasks
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate a display name: non-empty after trimming and within
/// [`MAX_NAME_LENGTH`].
pub fn validate_name(kind: &str, name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!(
            "{kind} name must not be empty"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{kind} name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional description length.
pub fn validate_description(kind: &str, description: Option<&str>) -> Result<(), CoreError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => {
            Err(CoreError::Validation(format!(
                "{kind} description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
            )))
        }
        _ => Ok(()),
    }
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("color pattern is a valid regex"))
}

/// Validate a colour tag in `#RRGGBB` form.
pub fn validate_color(color: &str) -> Result<(), CoreError> {
    if color_pattern().is_match(color) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Color '{color}' must be a hex colour in #RRGGBB form"
        )))
    }
}

fn validate_offset(what: &str, days: i32) -> Result<(), CoreError> {
    if days < 0 {
        return Err(CoreError::Validation(format!(
            "{what} must not be negative, got {days}"
        )));
    }
    if days > MAX_RELATIVE_DAYS {
        return Err(CoreError::Validation(format!(
            "{what} exceeds maximum of {MAX_RELATIVE_DAYS} days, got {days}"
        )));
    }
    Ok(())
}

/// Validate a milestone's relative window: both offsets in range and the
/// due offset strictly after the start offset.
pub fn validate_milestone_offsets(
    relative_start_days: i32,
    relative_due_days: i32,
) -> Result<(), CoreError> {
    validate_offset("relative_start_days", relative_start_days)?;
    validate_offset("relative_due_days", relative_due_days)?;
    if relative_due_days <= relative_start_days {
        return Err(CoreError::Validation(format!(
            "relative_due_days ({relative_due_days}) must exceed \
             relative_start_days ({relative_start_days})"
        )));
    }
    Ok(())
}

/// Validate a task's due offset (relative to its milestone's start).
pub fn validate_task_offset(relative_due_days: i32) -> Result<(), CoreError> {
    validate_offset("task relative_due_days", relative_due_days)
}

/// Validate an optional hours estimate: finite and non-negative.
pub fn validate_estimated_hours(hours: Option<f64>) -> Result<(), CoreError> {
    match hours {
        Some(h) if !h.is_finite() || h < 0.0 => Err(CoreError::Validation(format!(
            "estimated_hours must be a non-negative number, got {h}"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Blueprint validation
// ---------------------------------------------------------------------------

/// Validate a single milestone and its tasks.
pub fn validate_milestone(milestone: &MilestoneBlueprint) -> Result<(), CoreError> {
    validate_name("Milestone", &milestone.name)?;
    validate_description("Milestone", milestone.description.as_deref())?;
    validate_milestone_offsets(milestone.relative_start_days, milestone.relative_due_days)?;

    let mut positions = HashSet::new();
    for task in &milestone.tasks {
        validate_task(task)?;
        if !positions.insert(task.position) {
            return Err(CoreError::Validation(format!(
                "Milestone '{}' has more than one task at position {}",
                milestone.name, task.position
            )));
        }
    }
    Ok(())
}

/// Validate a single task.
pub fn validate_task(task: &TaskBlueprint) -> Result<(), CoreError> {
    validate_name("Task", &task.title)?;
    validate_description("Task", task.description.as_deref())?;
    validate_task_offset(task.relative_due_days)?;
    validate_estimated_hours(task.estimated_hours)
}

/// Collect every violation in a blueprint, prefixed with where it occurred.
///
/// Returns an empty vector for a valid blueprint.
pub fn blueprint_violations(blueprint: &TemplateBlueprint) -> Vec<String> {
    let mut violations = Vec::new();
    let mut push = |context: String, result: Result<(), CoreError>| {
        if let Err(e) = result {
            violations.push(format!("{context}: {}", strip_prefix(&e)));
        }
    };

    let template_ctx = format!("template '{}'", blueprint.name);
    push(template_ctx.clone(), validate_name("Template", &blueprint.name));
    push(
        template_ctx.clone(),
        validate_description("Template", blueprint.description.as_deref()),
    );
    if let Some(color) = &blueprint.color {
        push(template_ctx.clone(), validate_color(color));
    }

    let mut milestone_positions = HashSet::new();
    for milestone in &blueprint.milestones {
        let milestone_ctx = format!("{template_ctx} > milestone '{}'", milestone.name);
        push(milestone_ctx.clone(), validate_name("Milestone", &milestone.name));
        push(
            milestone_ctx.clone(),
            validate_description("Milestone", milestone.description.as_deref()),
        );
        push(
            milestone_ctx.clone(),
            validate_milestone_offsets(milestone.relative_start_days, milestone.relative_due_days),
        );
        if !milestone_positions.insert(milestone.position) {
            push(
                milestone_ctx.clone(),
                Err(CoreError::Validation(format!(
                    "duplicate milestone position {}",
                    milestone.position
                ))),
            );
        }

        let mut task_positions = HashSet::new();
        for task in &milestone.tasks {
            let task_ctx = format!("{milestone_ctx} > task '{}'", task.title);
            push(task_ctx.clone(), validate_task(task));
            if !task_positions.insert(task.position) {
                push(
                    task_ctx,
                    Err(CoreError::Validation(format!(
                        "duplicate task position {}",
                        task.position
                    ))),
                );
            }
        }
    }

    violations
}

/// Validate a whole blueprint, failing with every violation joined together.
pub fn validate_blueprint(blueprint: &TemplateBlueprint) -> Result<(), CoreError> {
    let violations = blueprint_violations(blueprint);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(violations.join("; ")))
    }
}

fn strip_prefix(error: &CoreError) -> String {
    match error {
        CoreError::Validation(msg) => msg.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
