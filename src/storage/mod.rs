pub mod auth;
pub mod sheets;
pub mod synchronizer;

#[cfg(test)]
pub mod memory;

use crate::model::SyncError;

pub use sheets::GoogleSheetsClient;
pub use synchronizer::SheetSynchronizer;

/// The handful of spreadsheet operations the synchronizer needs.
#[async_trait::async_trait]
pub trait SheetsService: Send + Sync {
    /// Titles of all worksheets; `SyncError::NotFound` if the spreadsheet is not reachable.
    async fn worksheet_titles(&self, sheet_id: &str) -> Result<Vec<String>, SyncError>;
    async fn add_worksheet(
        &self,
        sheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<(), SyncError>;
    /// Row 1 of the worksheet, empty when the worksheet is empty.
    async fn first_row(&self, sheet_id: &str, title: &str) -> Result<Vec<String>, SyncError>;
    async fn append_row(
        &self,
        sheet_id: &str,
        title: &str,
        row: &[String],
    ) -> Result<(), SyncError>;
}
