// Google Sheets v4 REST client
use crate::config::CredentialSource;
use crate::model::SyncError;
use crate::storage::SheetsService;
use crate::storage::auth::ServiceAccountAuth;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// `'Title'!cells`, with quotes in the title doubled, URL-encoded for a path segment.
fn a1_range(title: &str, cells: &str) -> String {
    let range = format!("'{}'!{}", title.replace('\'', "''"), cells);
    urlencoding::encode(&range).into_owned()
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct GoogleSheetsClient {
    client: Client,
    auth: ServiceAccountAuth,
}

impl GoogleSheetsClient {
    pub fn new(credentials: &CredentialSource) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let auth = ServiceAccountAuth::from_source(credentials, client.clone())?;
        Ok(Self { client, auth })
    }

    async fn send(&self, request: RequestBuilder, sheet_id: &str) -> Result<String, SyncError> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Sheets API responded [{}]", status);

        if status == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(sheet_id.to_string()));
        }
        if !status.is_success() {
            return Err(SyncError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl SheetsService for GoogleSheetsClient {
    async fn worksheet_titles(&self, sheet_id: &str) -> Result<Vec<String>, SyncError> {
        let url = format!("{}/{}", SHEETS_API, sheet_id);
        let request = self
            .client
            .get(&url)
            .query(&[("fields", "sheets.properties.title")]);
        let body = self.send(request, sheet_id).await?;
        let meta: SpreadsheetMeta = serde_json::from_str(&body)?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    async fn add_worksheet(
        &self,
        sheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<(), SyncError> {
        let url = format!("{}/{}:batchUpdate", SHEETS_API, sheet_id);
        let payload = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    }
                }
            }]
        });
        self.send(self.client.post(&url).json(&payload), sheet_id).await?;
        Ok(())
    }

    async fn first_row(&self, sheet_id: &str, title: &str) -> Result<Vec<String>, SyncError> {
        let url = format!("{}/{}/values/{}", SHEETS_API, sheet_id, a1_range(title, "1:1"));
        let body = self.send(self.client.get(&url), sheet_id).await?;
        let range: ValueRange = serde_json::from_str(&body)?;
        Ok(range
            .values
            .into_iter()
            .next()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default())
    }

    async fn append_row(
        &self,
        sheet_id: &str,
        title: &str,
        row: &[String],
    ) -> Result<(), SyncError> {
        let url = format!(
            "{}/{}/values/{}:append",
            SHEETS_API,
            sheet_id,
            a1_range(title, "A1")
        );
        let request = self
            .client
            .post(&url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [row] }));
        self.send(request, sheet_id).await?;
        Ok(())
    }
}
