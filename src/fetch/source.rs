use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA, USER_AGENT};
use std::time::Duration;

use crate::config::EndpointConfig;
use crate::error::{ChargeboardError, Result};
use crate::model::ChargerRecord;

use super::body::parse_chargers_bytes;

/// Anything that can report the chargers of one location
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_chargers(&self, key: &str) -> Result<Vec<ChargerRecord>>;
}

/// Status source backed by the remote HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatusSource {
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `<base>/api/v2/now/<key>`
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/api/v2/now/{}", self.base_url, key)
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_chargers(&self, key: &str) -> Result<Vec<ChargerRecord>> {
        let resp = self
            .client
            .get(self.url_for(key))
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("chargeboard/", env!("APP_VERSION")))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChargeboardError::http(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        Ok(parse_chargers_bytes(&bytes)?)
    }
}
