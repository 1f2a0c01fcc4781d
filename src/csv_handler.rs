// src/csv_handler.rs
use async_trait::async_trait;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tokio::task;

use crate::data_types::{CrystalRecord, RecordSource};
use crate::error::Result;

/// Local-file binding of the inventory: the same schema as the sheet, read
/// from a CSV picked through the file dialog.
#[derive(Debug, Clone)]
pub struct CsvHandler {
    path: PathBuf,
}

impl CsvHandler {
    pub fn new(path: PathBuf) -> Self {
        CsvHandler { path }
    }

    fn read_records(path: &Path) -> Result<Vec<CrystalRecord>> {
        // Exports in the wild use comma or semicolon; sniff the header line.
        let delimiter = detect_delimiter(path)?;

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let cells: Vec<String> = row.iter().map(String::from).collect();
            if let Some(record) = CrystalRecord::from_cells(&headers, &cells) {
                records.push(record);
            }
        }

        tracing::debug!(rows = records.len(), path = %path.display(), "rows read from CSV");
        Ok(records)
    }
}

#[async_trait]
impl RecordSource for CsvHandler {
    async fn fetch_records(&self) -> Result<Vec<CrystalRecord>> {
        let path = self.path.clone();
        task::spawn_blocking(move || CsvHandler::read_records(&path)).await?
    }
}

fn detect_delimiter(path: &Path) -> Result<u8> {
    let file = File::open(path)?;
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line)?;

    Ok(if first_line.contains(';') { b';' } else { b',' })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::Status;
    use std::io::Write;

    fn write_inventory(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn reads_a_comma_separated_inventory() {
        let (_dir, path) = write_inventory(
            "id,name,style,main_crystal,status,last_worn\n\
             1,白光守護,項鍊,白水晶,active,2024-10-01\n\
             2,紫夜,手鍊,紫水晶,inactive,\n",
        );

        let records = CsvHandler::new(path).fetch_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "白光守護");
        assert_eq!(records[0].status, Status::Active);
        assert_eq!(records[1].status, Status::Inactive);
    }

    #[tokio::test]
    async fn detects_semicolon_delimited_files() {
        let (_dir, path) = write_inventory(
            "id;name;style;main_crystal;status\n\
             9;海藍之心;戒指;海藍寶;active\n",
        );

        let records = CsvHandler::new(path).fetch_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "9");
        assert_eq!(records[0].main_crystal, "海藍寶");
    }

    #[tokio::test]
    async fn missing_files_surface_an_error() {
        let handler = CsvHandler::new(PathBuf::from("/no/such/inventory.csv"));
        assert!(handler.fetch_records().await.is_err());
    }

    #[tokio::test]
    async fn short_rows_are_padded_not_dropped() {
        let (_dir, path) = write_inventory(
            "id,name,style,main_crystal,status\n\
             3,晨霧\n",
        );

        let records = CsvHandler::new(path).fetch_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "晨霧");
        assert_eq!(records[0].status, Status::Inactive);
    }
}
