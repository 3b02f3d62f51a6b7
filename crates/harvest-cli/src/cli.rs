//! CLI command definitions and argument parsing.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use harvest_domain::DocumentType;
use std::path::PathBuf;

/// Harvest - Download fiscal XML documents into a partitioned file tree.
#[derive(Debug, Parser)]
#[command(name = "harvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.harvest/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key, overriding the configuration file
    #[arg(long, global = true, env = "HARVEST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch documents for taxpayers over a date range
    Ingest(IngestArgs),

    /// Remove ledger records past the retention window
    Purge(PurgeArgs),

    /// Show ledger statistics
    Stats,

    /// Write a default configuration file
    InitConfig(InitConfigArgs),
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Taxpayer CNPJ (punctuation allowed), repeatable
    #[arg(long = "cnpj")]
    pub cnpjs: Vec<String>,

    /// Read CNPJs from file (one per line)
    #[arg(long)]
    pub cnpj_file: Option<PathBuf>,

    /// First issue date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "last_days")]
    pub from: Option<NaiveDate>,

    /// Last issue date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Number of days before the end date to start from
    #[arg(long, default_value = "5")]
    pub last_days: u32,

    /// Document types to fetch (default: both)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub types: Vec<TypeArg>,

    /// Output directory, overriding the configuration file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip the retention sweep after the run
    #[arg(long)]
    pub no_purge: bool,
}

/// Arguments for the purge command.
#[derive(Debug, Parser)]
pub struct PurgeArgs {
    /// Retention window in days, overriding the configuration file
    #[arg(short, long)]
    pub days: Option<u32>,
}

/// Arguments for the init-config command.
#[derive(Debug, Parser)]
pub struct InitConfigArgs {
    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// Document type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TypeArg {
    /// Electronic invoices (NF-e)
    #[value(alias = "nfe")]
    Invoice,
    /// Transport documents (CT-e)
    #[value(alias = "cte")]
    Transport,
}

impl From<TypeArg> for DocumentType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Invoice => DocumentType::Invoice,
            TypeArg::Transport => DocumentType::Transport,
        }
    }
}
