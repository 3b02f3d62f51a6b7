//! Harvest CLI - Download fiscal XML documents into a partitioned file tree.

use clap::Parser;
use harvest_cli::commands;
use harvest_cli::{config, Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log to stderr so progress output on stdout stays clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let formatter = Formatter::new(!cli.no_color);
    if let Err(e) = run(cli, &formatter).await {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> harvest_cli::Result<()> {
    let config_path = config::resolve_path(cli.config.as_deref())?;
    let api_key = cli.api_key.as_deref();
    let load = || config::load(&config_path, api_key);

    match cli.command {
        Command::Ingest(args) => commands::execute_ingest(args, load()?, formatter).await,
        Command::Purge(args) => commands::execute_purge(args, &load()?, formatter),
        Command::Stats => commands::execute_stats(&load()?, formatter),
        // Works without a valid configuration file
        Command::InitConfig(args) => {
            commands::execute_init_config(args, &config_path, formatter)
        }
    }
}
