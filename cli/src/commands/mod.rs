//! CLI subcommands.

pub mod config;
pub mod parse;
pub mod scan;
