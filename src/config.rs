// src/config.rs
use std::env;

const DEFAULT_SHEET_NAME: &str = "Sheet1";
const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

/// Data-source settings read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Full URL of the inventory spreadsheet; without it the widget starts
    /// disconnected and waits for the cloud dialog or a local file.
    pub sheet_url: Option<String>,
    pub sheet_name: String,
    pub credentials_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let sheet_url = env::var("CRYSTAL_SHEET_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let sheet_name = env::var("CRYSTAL_SHEET_NAME")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

        let credentials_path = env::var("CRYSTAL_CREDENTIALS")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string());

        AppConfig {
            sheet_url,
            sheet_name,
            credentials_path,
        }
    }
}
