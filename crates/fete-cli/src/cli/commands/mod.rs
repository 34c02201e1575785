//! CLI command handlers.

pub mod config;
pub mod sections;
pub mod show;
