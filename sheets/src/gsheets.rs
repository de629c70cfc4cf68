// sheets/src/gsheets.rs
//
// Google Sheets v4 implementation of the row store. The sheet is an
// append-only table: row 1 is the header, every later row is one record
// with cells in schema order.

use async_trait::async_trait;
use models::{schema, Record};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::auth::{ServiceAccountAuth, ServiceAccountKey};
use crate::errors::{PersistenceError, PersistenceResult};
use crate::RowStore;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the google backend, embedded in the service config.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub worksheet: String,
    pub credentials_file: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

pub struct GoogleSheetsStore {
    client: reqwest::Client,
    auth: ServiceAccountAuth,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
}

impl GoogleSheetsStore {
    pub fn new(config: &SheetsConfig) -> PersistenceResult<Self> {
        let key = ServiceAccountKey::from_file(Path::new(&config.credentials_file))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(PersistenceError::Network)?;
        Ok(GoogleSheetsStore {
            auth: ServiceAccountAuth::new(key, client.clone()),
            client,
            base_url: SHEETS_BASE_URL.to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
        })
    }

    /// Column range covering the schema width, e.g. `Patients!A:P`.
    fn range(&self) -> String {
        // Holds while the schema stays within 26 columns.
        let end = (b'A' + (schema::width() - 1) as u8) as char;
        format!("{}!A:{}", self.worksheet, end)
    }

    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            self.range()
        )
    }

    async fn classify_rejection(response: reqwest::Response) -> PersistenceError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        match status {
            401 | 403 => PersistenceError::Auth(format!("HTTP {}: {}", status, message)),
            _ => PersistenceError::Rejected { status, message },
        }
    }

    async fn append_cells(&self, cells: Vec<String>) -> PersistenceResult<()> {
        let token = self.auth.access_token().await?;
        let url = format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url()
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "values": [cells] }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::classify_rejection(response).await);
        }
        Ok(())
    }

    async fn read_values(&self) -> PersistenceResult<Vec<Vec<String>>> {
        let token = self.auth.access_token().await?;
        let response = self
            .client
            .get(self.values_url())
            .bearer_auth(token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::classify_rejection(response).await);
        }
        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| PersistenceError::BadPayload(e.to_string()))?;
        Ok(range.values)
    }
}

/// The sheet service trims trailing empty cells from returned rows; pad
/// back to schema width before parsing.
pub(crate) fn pad_row(mut cells: Vec<String>) -> Vec<String> {
    while cells.len() < schema::width() {
        cells.push(String::new());
    }
    cells
}

#[async_trait]
impl RowStore for GoogleSheetsStore {
    async fn append(&self, record: &Record) -> PersistenceResult<()> {
        debug!(spreadsheet = %self.spreadsheet_id, "appending one row");
        self.append_cells(record.to_row()).await?;
        info!(spreadsheet = %self.spreadsheet_id, "row appended");
        Ok(())
    }

    async fn fetch_all(&self) -> PersistenceResult<Vec<Record>> {
        let values = self.read_values().await?;
        debug!(rows = values.len(), "fetched sheet values");
        // Row 1 is the header; sheet rows are numbered from 1.
        values
            .into_iter()
            .enumerate()
            .skip(1)
            .map(|(i, cells)| {
                Record::from_row(&pad_row(cells)).map_err(|source| {
                    PersistenceError::MalformedRow { row: i + 1, source }
                })
            })
            .collect()
    }

    async fn ensure_header(&self) -> PersistenceResult<()> {
        let values = self.read_values().await?;
        if values.is_empty() {
            info!(spreadsheet = %self.spreadsheet_id, "empty sheet, writing header row");
            let header = schema::field_names().iter().map(|n| n.to_string()).collect();
            self.append_cells(header).await?;
        }
        Ok(())
    }
}
