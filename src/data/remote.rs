//! HTTP fetch of the sales CSV.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::error::AppError;

pub struct DatasetClient {
    client: Client,
}

impl DatasetClient {
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Download the CSV body as text.
    pub fn fetch_csv(&self, url: &str) -> Result<String, AppError> {
        info!(%url, "fetching dataset");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| AppError::runtime(format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Dataset request failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::runtime(format!("Failed to read dataset response: {e}")))?;

        info!(bytes = body.len(), "dataset downloaded");
        Ok(body)
    }
}
