//! CLI subcommands.

pub mod config;
pub mod quote;
pub mod zones;
