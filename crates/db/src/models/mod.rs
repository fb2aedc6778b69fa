//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Where rows are patched, a `Deserialize` update DTO (all `Option` fields)

pub mod client;
pub mod milestone;
pub mod profile;
pub mod service;
pub mod service_template;
pub mod task;
pub mod template_milestone;
pub mod template_task;
