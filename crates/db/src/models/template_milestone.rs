//! Template milestone model and DTOs.

use agency_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `template_milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TemplateMilestone {
    pub id: DbId,
    pub template_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub relative_start_days: i32,
    pub relative_due_days: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a template milestone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateMilestone {
    pub template_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub relative_start_days: i32,
    pub relative_due_days: i32,
}
