// One acquisition-then-synchronization pass
use crate::acquire::PriceAcquirer;
use crate::model::{DestinationDescriptor, SyncError};
use crate::storage::{SheetSynchronizer, SheetsService};
use tracing::{info, warn};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    pub fetched: usize,
    pub failed: usize,
    pub appended: usize,
}

/// Acquires one batch and appends it. Only synchronization errors are fatal.
pub async fn run_once<S: SheetsService>(
    acquirer: &dyn PriceAcquirer,
    synchronizer: &SheetSynchronizer<S>,
    destination: &DestinationDescriptor,
) -> Result<RunSummary, SyncError> {
    info!("Acquiring prices ({} strategy)", acquirer.name());
    let batch = acquirer.acquire().await;

    let mut summary = RunSummary {
        fetched: batch.len(),
        failed: batch.failed_count(),
        appended: 0,
    };

    if batch.is_empty() {
        warn!("No products fetched");
    }

    let report = synchronizer.sync(destination, &batch).await?;
    summary.appended = report.rows_appended;

    info!(
        "Run finished: {} records, {} failed, {} rows appended",
        summary.fetched, summary.failed, summary.appended
    );
    Ok(summary)
}
