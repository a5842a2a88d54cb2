// Core structs: ProductRecord, AcquisitionBatch, DestinationDescriptor
use thiserror::Error;

pub const NOT_AVAILABLE: &str = "N/A";

pub const API_HEADER: &[&str] = &[
    "Timestamp",
    "Product Code",
    "Price",
    "Price Formatted",
    "Stock Status",
];

pub const SCRAPE_HEADER: &[&str] = &[
    "Timestamp",
    "Product Name",
    "Price",
    "Price Formatted",
    "URL",
];

/// One captured observation. Field order matches the worksheet columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub timestamp: String,
    pub identifier: String,
    pub price: String,
    pub price_formatted: String,
    pub status: String,
}

impl ProductRecord {
    /// Record for an item whose acquisition failed; prices are the `N/A` sentinel.
    pub fn failed(
        timestamp: String,
        identifier: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            identifier: identifier.into(),
            price: NOT_AVAILABLE.into(),
            price_formatted: NOT_AVAILABLE.into(),
            status: status.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status.starts_with("Error:") || self.identifier.starts_with("Error:")
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.identifier.clone(),
            self.price.clone(),
            self.price_formatted.clone(),
            self.status.clone(),
        ]
    }
}

/// Records of one run, in input order (API) or document order (scrape).
#[derive(Debug, Clone)]
pub struct AcquisitionBatch {
    pub header: &'static [&'static str],
    pub records: Vec<ProductRecord>,
}

impl AcquisitionBatch {
    pub fn new(header: &'static [&'static str]) -> Self {
        Self {
            header,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_error()).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationDescriptor {
    pub sheet_id: String,
    pub worksheet_name: String,
}

impl DestinationDescriptor {
    pub fn new(sheet_id: impl Into<String>, worksheet_name: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            worksheet_name: worksheet_name.into(),
        }
    }

    /// Rejects empty and template-looking identifiers before anything touches the network.
    pub fn validate(&self) -> Result<(), SyncError> {
        let sheet_id = self.sheet_id.trim();
        if sheet_id.is_empty() {
            return Err(SyncError::InvalidDestination(
                "Google Sheet ID not provided in config or environment (GOOGLE_SHEET_ID)".into(),
            ));
        }
        if is_placeholder(sheet_id) {
            return Err(SyncError::InvalidDestination(format!(
                "Google Sheet ID '{}' is a placeholder; \
                 set GOOGLE_SHEET_ID or put a real ID in the config",
                sheet_id
            )));
        }
        if self.worksheet_name.trim().is_empty() {
            return Err(SyncError::InvalidDestination(
                "Worksheet name not provided in config".into(),
            ));
        }
        Ok(())
    }
}

/// `YOUR_...` in any case marks an unfilled template value.
pub fn is_placeholder(value: &str) -> bool {
    value
        .trim()
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("YOUR_"))
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Request failed: {0}")]
    Http(String),
    #[error("Invalid request header: {0}")]
    InvalidHeader(String),
}

/// Per-item failures of the API strategy. Each one ends up as a record status.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("Non-JSON response (content-type: {content_type})")]
    NonJsonResponse { content_type: String, preview: String },
    #[error("No data")]
    NoData,
    #[error("Parse error: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn to_status(&self) -> String {
        format!("Error: {}", self)
    }
}

/// Batch-level failures of the scrape strategy.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("Invalid selector '{0}': {1}")]
    Selector(String, String),
    #[error("Render task failed: {0}")]
    Join(String),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    InvalidDestination(String),
    #[error(
        "Google credentials not found. \
         Please provide {0} or set GOOGLE_CREDENTIALS environment variable."
    )]
    MissingCredentials(String),
    #[error("Invalid service account credentials: {0}")]
    Credentials(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Spreadsheet '{0}' not found (is it shared with the service account?)")]
    NotFound(String),
    #[error("Sheets API responded [{status}]: {body}")]
    Api { status: u16, body: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected Sheets API payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Invalid config {0}: {1}")]
    Invalid(String, serde_json::Error),
    #[error("{0}")]
    Missing(String),
}

/// Anything that stops a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}
