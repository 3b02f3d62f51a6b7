//! Command implementations.

pub mod ingest;
pub mod init_config;
pub mod purge;
pub mod stats;

pub use self::ingest::execute_ingest;
pub use self::init_config::execute_init_config;
pub use self::purge::execute_purge;
pub use self::stats::execute_stats;

use crate::error::Result;
use harvest_ingest::IngestConfig;
use harvest_store::SqliteLedger;
use std::fs;

/// Open the ledger named in the configuration, creating its directory.
pub(crate) fn open_ledger(config: &IngestConfig) -> Result<SqliteLedger> {
    if let Some(parent) = config.ledger.path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(SqliteLedger::new(&config.ledger.path)?)
}
