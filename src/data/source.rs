//! Where the dataset comes from, and how that is configured.
//!
//! Precedence: `--data` flag, then `AUTOSALES_DATA_URL` (after loading `.env`),
//! then the public dataset URL.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::data::remote::DatasetClient;
use crate::error::AppError;

pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMDeveloperSkillsNetwork-DV0101EN-SkillsNetwork/Data%20Files/historical_automobile_sales.csv";

pub const DATA_URL_ENV: &str = "AUTOSALES_DATA_URL";
pub const HTTP_TIMEOUT_ENV: &str = "AUTOSALES_HTTP_TIMEOUT_SECS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// A remote URL or a local CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` / `https://` values are URLs; anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    /// Apply precedence to already-read flag and environment values.
    pub fn resolve_from(flag: Option<&str>, env: Option<&str>) -> Self {
        flag.or(env)
            .filter(|v| !v.trim().is_empty())
            .map(DataSource::parse)
            .unwrap_or_else(|| DataSource::Url(DEFAULT_DATA_URL.to_string()))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolved startup configuration for loading the dataset.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub source: DataSource,
    pub http_timeout: Duration,
}

impl SourceConfig {
    /// Resolve from the `--data` flag and the process environment.
    pub fn from_env(flag: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let env_source = std::env::var(DATA_URL_ENV).ok();
        let env_timeout = std::env::var(HTTP_TIMEOUT_ENV).ok();

        Ok(Self {
            source: DataSource::resolve_from(flag, env_source.as_deref()),
            http_timeout: parse_timeout(env_timeout.as_deref())?,
        })
    }

    /// Read the raw CSV text, from disk or over HTTP.
    pub fn read_csv_text(&self) -> Result<String, AppError> {
        match &self.source {
            DataSource::Url(url) => DatasetClient::new(self.http_timeout)?.fetch_csv(url),
            DataSource::File(path) => {
                info!(path = %path.display(), "reading dataset file");
                if path.is_dir() {
                    return Err(AppError::input(format!(
                        "Expected a CSV file, got a directory: {}",
                        path.display()
                    )));
                }
                fs::read_to_string(path)
                    .map_err(|e| AppError::input(format!("Failed to read dataset '{}': {e}", path.display())))
            }
        }
    }
}

fn parse_timeout(raw: Option<&str>) -> Result<Duration, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    };
    let secs = raw
        .parse::<u64>()
        .map_err(|_| AppError::input(format!("{HTTP_TIMEOUT_ENV} must be a whole number of seconds (got '{raw}').")))?;
    if secs == 0 {
        return Err(AppError::input(format!("{HTTP_TIMEOUT_ENV} must be greater than zero.")));
    }
    Ok(Duration::from_secs(secs))
}
