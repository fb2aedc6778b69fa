//! Live milestone model.

use agency_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub service_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub start_date: CalendarDate,
    pub due_date: CalendarDate,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a live milestone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMilestone {
    pub service_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub start_date: CalendarDate,
    pub due_date: CalendarDate,
}
