//! Template task model and DTOs.

use agency_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `template_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateTask {
    pub id: DbId,
    pub template_milestone_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub priority: String,
    pub visibility: String,
    pub estimated_hours: Option<f64>,
    /// Days after the owning milestone's start.
    pub relative_due_days: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a template task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateTask {
    pub template_milestone_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub priority: Option<String>,
    pub visibility: Option<String>,
    pub estimated_hours: Option<f64>,
    pub relative_due_days: i32,
}
