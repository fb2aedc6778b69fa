//! Pure domain logic for agency service templates.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! database layer and the operations binary alike.

pub mod check;
pub mod error;
pub mod relative_date;
pub mod service_plan;
pub mod service_template;
pub mod types;
