//! Live task model.

use agency_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub milestone_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub priority: String,
    pub visibility: String,
    pub estimated_hours: Option<f64>,
    pub due_date: Option<CalendarDate>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a live task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub milestone_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub priority: Option<String>,
    pub visibility: Option<String>,
    pub estimated_hours: Option<f64>,
    pub due_date: Option<CalendarDate>,
}
