//! Output formatting for the CLI.

use colored::*;
use harvest_ingest::{IngestSummary, KeyOutcome, ProgressEvent, SweepReport};
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// One line per finished key.
    pub fn progress(&self, event: &ProgressEvent) -> String {
        let line = format!("{}: {}", event.key, event.outcome);
        match &event.outcome {
            KeyOutcome::Completed { .. } if event.documents_saved > 0 => {
                self.success(&format!("{} ({} saved)", line, event.documents_saved))
            }
            KeyOutcome::Completed { .. } | KeyOutcome::NoDocuments => self.info(&line),
            KeyOutcome::Unavailable { .. } | KeyOutcome::DecodeFailed { .. } => {
                self.warning(&line)
            }
        }
    }

    /// Run totals as a table.
    pub fn summary(&self, summary: &IngestSummary) -> String {
        let rows = [
            ("Keys processed", summary.keys_processed),
            ("Documents saved", summary.documents_saved),
            ("Duplicates skipped", summary.duplicates),
            ("Failures", summary.failures),
            ("Files replaced", summary.replaced),
            ("Unavailable keys", summary.unavailable_keys),
        ];

        let table = key_value_table(rows.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        if summary.cancelled {
            format!("{}\n{}", table, self.warning("Run cancelled before all keys were processed"))
        } else {
            table
        }
    }

    /// Retention sweep result.
    pub fn sweep(&self, report: &SweepReport) -> String {
        self.info(&report.summary())
    }

    /// Ledger statistics as a table.
    pub fn stats(&self, ledger_path: &str, records: usize, retention_days: u32) -> String {
        key_value_table([
            ("Ledger".to_string(), ledger_path.to_string()),
            ("Records".to_string(), records.to_string()),
            ("Retention (days)".to_string(), retention_days.to_string()),
        ])
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn key_value_table<I>(rows: I) -> String
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut builder = Builder::default();
    for (key, value) in rows {
        builder.push_record([key, value]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::last()).with(Alignment::right()));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use harvest_domain::{DocumentType, TaxpayerId};
    use harvest_ingest::IngestKey;

    fn event(outcome: KeyOutcome, saved: usize) -> ProgressEvent {
        ProgressEvent {
            key: IngestKey {
                taxpayer_id: TaxpayerId::parse("09240049000196").unwrap(),
                date: NaiveDate::from_ymd_opt(2025, 2, 25).unwrap(),
                document_type: DocumentType::Invoice,
            },
            outcome,
            documents_saved: saved,
            duplicates: 0,
            failures: 0,
            replaced: 0,
        }
    }

    #[test]
    fn test_progress_lines() {
        let formatter = Formatter::new(false);

        let line = formatter.progress(&event(KeyOutcome::NoDocuments, 0));
        assert_eq!(line, "ℹ 09240049000196 2025-02-25 NF-e: no documents");

        let line = formatter.progress(&event(
            KeyOutcome::Unavailable {
                attempts: 5,
                reason: "HTTP 503".to_string(),
            },
            0,
        ));
        assert!(line.starts_with("⚠ "));
        assert!(line.contains("unavailable after 5 attempt(s)"));

        let line = formatter.progress(&event(
            KeyOutcome::Completed {
                pages: 1,
                documents_seen: 2,
                duplicates: 0,
                failures: 0,
                replaced: 0,
            },
            2,
        ));
        assert!(line.starts_with("✓ "));
        assert!(line.ends_with("(2 saved)"));
    }

    #[test]
    fn test_summary_table() {
        let formatter = Formatter::new(false);
        let summary = IngestSummary {
            keys_processed: 4,
            documents_saved: 12,
            ..IngestSummary::default()
        };

        let output = formatter.summary(&summary);
        assert!(output.contains("Documents saved"));
        assert!(output.contains("12"));
        assert!(!output.contains("cancelled"));

        let cancelled = IngestSummary {
            cancelled: true,
            ..summary
        };
        assert!(formatter.summary(&cancelled).contains("cancelled"));
    }

    #[test]
    fn test_stats_table() {
        let formatter = Formatter::new(false);
        let output = formatter.stats("harvest.db", 42, 90);
        assert!(output.contains("harvest.db"));
        assert!(output.contains("42"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
