// Append-only synchronization of an acquisition batch into a worksheet
use crate::model::{AcquisitionBatch, DestinationDescriptor, SyncError};
use crate::storage::SheetsService;
use tracing::info;

pub const DEFAULT_ROWS: u32 = 1000;
pub const DEFAULT_COLS: u32 = 10;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncReport {
    pub worksheet_created: bool,
    pub header_written: bool,
    pub rows_appended: usize,
}

pub struct SheetSynchronizer<S: SheetsService> {
    service: S,
}

impl<S: SheetsService> SheetSynchronizer<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Appends every record as a new row, creating the worksheet and header when missing.
    ///
    /// Rows are appended one call at a time; a failure part-way through leaves the
    /// rows already written in place.
    pub async fn sync(
        &self,
        destination: &DestinationDescriptor,
        batch: &AcquisitionBatch,
    ) -> Result<SyncReport, SyncError> {
        destination.validate()?;

        let mut report = SyncReport::default();
        if batch.is_empty() {
            info!("No products to update");
            return Ok(report);
        }

        let sheet_id = destination.sheet_id.trim();
        let worksheet = destination.worksheet_name.as_str();

        let titles = self.service.worksheet_titles(sheet_id).await?;
        if !titles.iter().any(|t| t == worksheet) {
            info!("Creating worksheet '{}'", worksheet);
            self.service
                .add_worksheet(sheet_id, worksheet, DEFAULT_ROWS, DEFAULT_COLS)
                .await?;
            report.worksheet_created = true;
        }

        let first_row = self.service.first_row(sheet_id, worksheet).await?;
        if first_row.iter().all(|cell| cell.trim().is_empty()) {
            let header: Vec<String> = batch.header.iter().map(|h| h.to_string()).collect();
            self.service.append_row(sheet_id, worksheet, &header).await?;
            report.header_written = true;
            info!("Header row written to '{}'", worksheet);
        }

        for record in &batch.records {
            self.service
                .append_row(sheet_id, worksheet, &record.to_row())
                .await?;
            report.rows_appended += 1;
        }

        info!(
            "Successfully updated Google Sheet with {} products",
            report.rows_appended
        );
        Ok(report)
    }
}
