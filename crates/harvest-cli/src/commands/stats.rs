//! Stats command implementation.

use super::open_ledger;
use crate::error::Result;
use crate::output::Formatter;
use harvest_ingest::IngestConfig;

/// Execute the stats command.
pub fn execute_stats(config: &IngestConfig, formatter: &Formatter) -> Result<()> {
    let ledger = open_ledger(config)?;
    let records = ledger.count()?;

    println!(
        "{}",
        formatter.stats(
            &config.ledger.path.display().to_string(),
            records,
            config.ledger.retention_days
        )
    );
    Ok(())
}
