use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::Level;

const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Base URL the `get_pdf` and `askquestion` endpoints hang off.
    pub api_base: String,
    pub timeout: Duration,
    pub log_level: Level,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: Level::INFO,
        }
    }
}

impl ReaderConfig {
    pub fn from_env() -> Result<Self> {
        let api_base = dotenv::var("READER_API_BASE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let timeout = match dotenv::var("READER_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("READER_TIMEOUT_SECS is not a number: {}", raw))?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let log_level = match dotenv::var("READER_LOG") {
            Ok(raw) => Level::from_str(raw.trim())
                .map_err(|e| anyhow::anyhow!("READER_LOG {:?}: {}", raw, e))?,
            Err(_) => Level::INFO,
        };

        Ok(Self {
            api_base,
            timeout,
            log_level,
        })
    }

    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        if let Some(base) = api_base {
            self.api_base = base;
        }
        self
    }
}
