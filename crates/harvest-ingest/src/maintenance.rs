//! Ledger retention sweep

use harvest_domain::traits::DocumentStore;
use std::time::Instant;

/// Result of one retention sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Records deleted
    pub removed: usize,

    /// Retention window that was applied
    pub retention_days: u32,
}

impl SweepReport {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Removed {} ledger record(s) older than {} day(s)",
            self.removed, self.retention_days
        )
    }
}

/// Periodic ledger upkeep
///
/// Files on disk are never touched; only ledger rows age out. A document
/// whose record has been purged is fetched and written again if it is still
/// in an ingested date range.
pub struct Maintenance;

impl Maintenance {
    /// Delete ledger records older than `retention_days`
    ///
    /// Never fails: store errors are logged by the store and reported as
    /// zero removals.
    pub fn sweep<D: DocumentStore>(store: &mut D, retention_days: u32) -> SweepReport {
        let start = Instant::now();
        let removed = store.purge_older_than(retention_days);

        tracing::info!(
            removed,
            retention_days,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Retention sweep complete"
        );

        SweepReport {
            removed,
            retention_days,
        }
    }
}
