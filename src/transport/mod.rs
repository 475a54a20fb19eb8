//! Transport seam for the agent endpoint.
//!
//! The bridge talks to the wire through the [`Transport`] trait so tests can
//! substitute a canned implementation; [`HttpTransport`] is the production
//! reqwest-backed one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Performs one bounded HTTP POST of a JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` to `url`, returning the status code and parsed JSON body.
    ///
    /// Implementations report connection-level failures and timeouts as
    /// errors; non-success status codes are returned as data for the caller
    /// to classify.
    async fn post(&self, url: &str, body: &Value) -> Result<(u16, Value)>;
}

/// reqwest-backed transport with optional `X-Api-Key` authentication.
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport with the given per-request timeout.
    pub fn new(api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| BridgeError::Configuration("API key is not valid ASCII".into()))?;
            headers.insert("X-Api-Key", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// The underlying client, shared with catalog discovery.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: &Value) -> Result<(u16, Value)> {
        debug!(url = %url, "sending message/send request");

        let response = tokio::time::timeout(
            self.timeout,
            self.client.post(url).json(body).send(),
        )
        .await
        .map_err(|_| BridgeError::Timeout(self.timeout.as_millis() as u64))??;

        let status = response.status().as_u16();
        if status != 200 {
            let text = response.text().await.unwrap_or_default();
            debug!(status, body = %text.chars().take(200).collect::<String>(), "non-success status");
            return Ok((status, Value::Null));
        }

        let body: Value = response.json().await?;
        Ok((status, body))
    }
}
