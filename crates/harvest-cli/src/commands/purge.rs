//! Purge command implementation.

use super::open_ledger;
use crate::cli::PurgeArgs;
use crate::error::Result;
use crate::output::Formatter;
use harvest_ingest::{IngestConfig, Maintenance};

/// Execute the purge command.
pub fn execute_purge(args: PurgeArgs, config: &IngestConfig, formatter: &Formatter) -> Result<()> {
    let mut ledger = open_ledger(config)?;
    let days = args.days.unwrap_or(config.ledger.retention_days);

    let report = Maintenance::sweep(&mut ledger, days);
    println!("{}", formatter.sweep(&report));
    Ok(())
}
