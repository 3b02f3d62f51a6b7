//! Ingest command implementation.

use super::open_ledger;
use crate::cli::IngestArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::taxpayers;
use chrono::{Days, Local, NaiveDate};
use harvest_archive::FilePlacer;
use harvest_client::ApiClient;
use harvest_domain::DocumentType;
use harvest_ingest::{IngestConfig, IngestRequest, Ingestor, Maintenance};
use std::sync::atomic::Ordering;
use tracing::warn;

/// Execute the ingest command.
pub async fn execute_ingest(
    args: IngestArgs,
    mut config: IngestConfig,
    formatter: &Formatter,
) -> Result<()> {
    // Collect IDs from the command line and the optional file
    let mut raw = args.cnpjs.clone();
    if let Some(path) = &args.cnpj_file {
        raw.extend(taxpayers::read_file(path)?);
    }

    let list = taxpayers::parse(&raw);
    for (entry, reason) in &list.rejected {
        warn!(entry = %entry, reason = %reason, "Ignoring invalid CNPJ");
        println!("{}", formatter.warning(&format!("Ignoring '{}': {}", entry, reason)));
    }
    if list.valid.is_empty() {
        return Err(CliError::InvalidInput("No valid CNPJ provided".to_string()));
    }

    let (start, end) = resolve_window(args.from, args.to, args.last_days, Local::now().date_naive())?;
    let document_types: Vec<DocumentType> = if args.types.is_empty() {
        DocumentType::ALL.to_vec()
    } else {
        args.types.iter().copied().map(Into::into).collect()
    };

    if let Some(output) = args.output {
        config.output.base_dir = output;
    }
    if config.api.api_key.trim().is_empty() {
        return Err(CliError::Config(
            "No API key configured (set api.api_key or HARVEST_API_KEY)".to_string(),
        ));
    }

    let retention_days = config.ledger.retention_days;
    let store = open_ledger(&config)?;
    let client = ApiClient::new(&config.api)?;
    let placer = FilePlacer::new(&config.output.base_dir);
    let mut ingestor = Ingestor::new(config, client, store, placer);

    // Ctrl+C stops the run between keys
    let cancel = ingestor.cancel_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current key");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let request = IngestRequest::new(list.valid, start, end).with_document_types(document_types);
    let result = ingestor
        .ingest(request, |event| println!("{}", formatter.progress(event)))
        .await;
    watcher.abort();
    let summary = result?;

    println!("{}", formatter.summary(&summary));

    if !args.no_purge {
        let report = Maintenance::sweep(ingestor.store_mut(), retention_days);
        println!("{}", formatter.sweep(&report));
    }

    Ok(())
}

/// Work out the inclusive date window.
///
/// Without `--from`, the window starts `last_days` before the end date.
fn resolve_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    last_days: u32,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let end = to.unwrap_or(today);
    let start = match from {
        Some(start) => start,
        None => end
            .checked_sub_days(Days::new(u64::from(last_days)))
            .ok_or_else(|| CliError::InvalidInput(format!("--last-days {} is out of range", last_days)))?,
    };

    if start > end {
        return Err(CliError::InvalidInput(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_window_is_last_five_days() {
        let today = date(2025, 3, 2);
        let (start, end) = resolve_window(None, None, 5, today).unwrap();
        assert_eq!(start, date(2025, 2, 25));
        assert_eq!(end, today);
    }

    #[test]
    fn test_explicit_window() {
        let (start, end) =
            resolve_window(Some(date(2025, 2, 1)), Some(date(2025, 2, 3)), 5, date(2025, 3, 2))
                .unwrap();
        assert_eq!(start, date(2025, 2, 1));
        assert_eq!(end, date(2025, 2, 3));
    }

    #[test]
    fn test_last_days_counts_back_from_end() {
        let (start, _) = resolve_window(None, Some(date(2025, 2, 10)), 0, date(2025, 3, 2)).unwrap();
        assert_eq!(start, date(2025, 2, 10));
    }

    #[test]
    fn test_reversed_window_rejected() {
        let result = resolve_window(Some(date(2025, 2, 10)), Some(date(2025, 2, 1)), 5, date(2025, 3, 2));
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
