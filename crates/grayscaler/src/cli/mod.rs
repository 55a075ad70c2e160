//! Subcommand implementations.

pub mod config;
pub mod serve;
