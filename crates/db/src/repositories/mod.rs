//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod client_repo;
pub mod milestone_repo;
pub mod profile_repo;
pub mod service_repo;
pub mod service_template_repo;
pub mod task_repo;
pub mod template_milestone_repo;
pub mod template_task_repo;

pub use client_repo::ClientRepo;
pub use milestone_repo::MilestoneRepo;
pub use profile_repo::ProfileRepo;
pub use service_repo::ServiceRepo;
pub use service_template_repo::ServiceTemplateRepo;
pub use task_repo::TaskRepo;
pub use template_milestone_repo::TemplateMilestoneRepo;
pub use template_task_repo::TemplateTaskRepo;
