//! Service model and DTOs.

use agency_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::milestone::Milestone;
use super::task::Task;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub client_id: DbId,
    pub template_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub start_date: CalendarDate,
    pub budget: Option<f64>,
    pub status: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new service.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateService {
    pub client_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: CalendarDate,
    pub budget: Option<f64>,
    pub status: Option<String>,
}

/// A service together with the milestones and tasks created for it.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceWithStructure {
    pub service: Service,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
}
