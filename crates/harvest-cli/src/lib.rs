//! Harvest CLI library.
//!
//! This library provides the core functionality for the `harvest` command-line
//! interface, including configuration management, taxpayer list loading,
//! command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod taxpayers;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
