//! Seeding and verification tooling for the agency database.

pub mod cli;
pub mod commands;
pub mod config;
pub mod fixtures;
