//! Service template model and DTOs.

use agency_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `service_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub created_by: Option<DbId>,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating an existing template. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateServiceTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub is_default: Option<bool>,
}

/// Row returned by the template summary listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceTemplateSummary {
    pub id: DbId,
    pub name: String,
    pub color: String,
    pub is_default: bool,
    pub milestone_count: i64,
    pub task_count: i64,
}
