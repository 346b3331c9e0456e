pub mod nse;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::RawSnapshot;

pub use nse::NseClient;

pub const DEFAULT_BASE_URL: &str = "https://www.nseindia.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {code}")]
    HttpStatus { code: u16 },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl FetchError {
    /// Short failure class for console reporting.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::HttpStatus { .. } => "http_status",
            FetchError::Malformed(_) => "malformed",
        }
    }
}

/// Configuration for the option-chain client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Scheme and host of the provider, without trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Anything that can produce an option-chain snapshot for a symbol.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, symbol: &str) -> Result<RawSnapshot, FetchError>;
}
