//! CLI subcommand implementations.

pub mod organizations;
pub mod repositories;
pub mod user;
