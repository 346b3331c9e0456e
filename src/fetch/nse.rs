use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{
    ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};

use crate::model::RawSnapshot;

use super::{FetchConfig, FetchError, SnapshotSource};

const CHAIN_PATH: &str = "/api/option-chain-indices";

// The provider rejects requests that don't look like they come from a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/83.0.4103.61 Safari/537.36";
const ORIGIN_VALUE: &str = "https://www.nseindia.com";
const REFERER_VALUE: &str =
    "https://www.nseindia.com/products/content/derivatives/equities/homepage_fo.htm";

/// Option-chain client for index symbols.
pub struct NseClient {
    client: reqwest::Client,
    base_url: String,
}

impl NseClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers())
            .build()
            .context("creating HTTP client")?;

        Ok(NseClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn chain_url(&self) -> String {
        format!("{}{CHAIN_PATH}", self.base_url)
    }
}

#[async_trait]
impl SnapshotSource for NseClient {
    async fn fetch(&self, symbol: &str) -> Result<RawSnapshot, FetchError> {
        let resp = self
            .client
            .get(self.chain_url())
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ORIGIN, HeaderValue::from_static(ORIGIN_VALUE));
    headers.insert(REFERER, HeaderValue::from_static(REFERER_VALUE));
    headers
}
