// src/cloud_handler.rs
use async_trait::async_trait;
use google_sheets4::{hyper, hyper_rustls, Sheets};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::Read;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

use crate::data_types::{CrystalRecord, RecordSource};
use crate::error::{DrawError, Result};

type SheetsHub = Sheets<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

/// Authenticated handle to the inventory spreadsheet. Connected once, then
/// reused for every draw; records are still fetched fresh per trigger.
pub struct CloudHandler {
    hub: SheetsHub,
    spreadsheet_id: String,
    sheet_name: String,
}

impl CloudHandler {
    pub async fn connect(
        spreadsheet_url: &str,
        sheet_name: &str,
        credentials_path: &str,
    ) -> Result<CloudHandler> {
        let spreadsheet_id = extract_spreadsheet_id(spreadsheet_url)?.to_string();
        let sheet_name = if sheet_name.is_empty() {
            "Sheet1".to_string()
        } else {
            sheet_name.to_string()
        };

        // Load the service account key from file
        let mut json = String::new();
        File::open(credentials_path)?.read_to_string(&mut json)?;
        let service_account_key: ServiceAccountKey = serde_json::from_str(&json)?;

        let auth = ServiceAccountAuthenticator::builder(service_account_key)
            .build()
            .await?;

        let hub = Sheets::new(
            hyper::Client::builder().build(
                hyper_rustls::HttpsConnectorBuilder::new()
                    .with_native_roots()?
                    .https_or_http()
                    .enable_http1()
                    .build(),
            ),
            auth,
        );

        tracing::info!(spreadsheet = %spreadsheet_id, sheet = %sheet_name, "connected to Google Sheets");
        Ok(CloudHandler {
            hub,
            spreadsheet_id,
            sheet_name,
        })
    }
}

#[async_trait]
impl RecordSource for CloudHandler {
    async fn fetch_records(&self) -> Result<Vec<CrystalRecord>> {
        let range = format!("{}!A:Z", self.sheet_name);
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, &range)
            .doit()
            .await?;

        let values = response.values.unwrap_or_default();
        let records = records_from_values(&values);
        tracing::debug!(rows = records.len(), "rows read from sheet");
        Ok(records)
    }
}

impl fmt::Debug for CloudHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudHandler")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .finish_non_exhaustive()
    }
}

/// URLs look like https://docs.google.com/spreadsheets/d/[SPREADSHEET_ID]/edit
pub fn extract_spreadsheet_id(url: &str) -> Result<&str> {
    let parts: Vec<&str> = url.split('/').collect();

    for (i, part) in parts.iter().enumerate() {
        if *part == "d" && i + 1 < parts.len() && !parts[i + 1].is_empty() {
            return Ok(parts[i + 1]);
        }
    }

    Err(DrawError::Config {
        message: format!("not a Google Sheets URL: {url}"),
    })
}

/// Maps a raw value grid to records: the first non-empty row is the header
/// row, blank rows are skipped, number cells are rendered as plain strings.
pub fn records_from_values(values: &[Vec<Value>]) -> Vec<CrystalRecord> {
    let mut rows = values.iter().filter(|row| {
        row.iter()
            .any(|cell| !cell_to_string(cell).trim().is_empty())
    });

    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Vec::new(),
    };

    rows.filter_map(|row| {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        CrystalRecord::from_cells(&headers, &cells)
    })
    .collect()
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::Status;
    use serde_json::json;

    #[test]
    fn extracts_the_id_from_a_sharing_url() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC-xyz123/edit#gid=0";
        assert_eq!(extract_spreadsheet_id(url).unwrap(), "1AbC-xyz123");
    }

    #[test]
    fn rejects_urls_without_an_id_segment() {
        assert!(extract_spreadsheet_id("https://example.com/nope").is_err());
        assert!(extract_spreadsheet_id("").is_err());
    }

    #[test]
    fn maps_the_value_grid_to_records() {
        let values = vec![
            vec![], // leading blank row, as exports often carry
            vec![
                json!("id"),
                json!("name"),
                json!("style"),
                json!("main_crystal"),
                json!("status"),
            ],
            vec![
                json!(1),
                json!("白光守護"),
                json!("項鍊"),
                json!("白水晶"),
                json!("active"),
            ],
            vec![json!(""), json!(""), json!(""), json!(""), json!("")],
            vec![
                json!(2),
                json!("紫夜"),
                json!("手鍊"),
                json!("紫水晶"),
                json!("inactive"),
            ],
        ];

        let records = records_from_values(&values);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].name, "白光守護");
        assert_eq!(records[0].status, Status::Active);
        assert_eq!(records[1].id, "2");
        assert_eq!(records[1].status, Status::Inactive);
    }

    #[test]
    fn empty_grid_yields_no_records() {
        assert!(records_from_values(&[]).is_empty());
        let only_headers = vec![vec![json!("id"), json!("name")]];
        assert!(records_from_values(&only_headers).is_empty());
    }
}
