//! Tracing subscriber setup.
//!
//! The filter comes from `AUTOSALES_LOG` (falls back to `warn`). Line-oriented
//! commands log to stderr; the TUI owns the terminal, so it only logs when
//! `AUTOSALES_LOG` is set explicitly, and then to a file.

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const LOG_ENV: &str = "AUTOSALES_LOG";
pub const TUI_LOG_FILE: &str = "autosales.log";

const DEFAULT_FILTER: &str = "warn";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Log to `TUI_LOG_FILE`, only if `AUTOSALES_LOG` is set.
    TuiFile,
}

pub fn init(target: LogTarget) -> Result<(), AppError> {
    let explicit = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    // A subscriber may already be installed (tests, embedding); keep it.
    match target {
        LogTarget::Stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        LogTarget::TuiFile => {
            if explicit.is_none() {
                return Ok(());
            }
            let file = File::create(TUI_LOG_FILE)
                .map_err(|e| AppError::input(format!("Failed to create log file '{TUI_LOG_FILE}': {e}")))?;
            let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
        }
    }

    Ok(())
}
