//! HTTP access to the relay.
//!
//! One [`RelayClient`] is built per invocation from the loaded config. No
//! timeout is configured and nothing is retried: a request either completes,
//! fails, or blocks until the server gives up.

use ntfy_core::error::{NtfyError, Result};
use ntfy_core::models::{Config, RelayMessage};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::{debug, warn};

/// Thin wrapper around [`reqwest::Client`] bound to one relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ntfy-manager/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.into(),
            auth_token,
        }
    }

    /// Client for the relay and token named in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.server_url(), config.auth_token().map(str::to_string))
    }

    /// `{base}/{topic}`: the publish endpoint.
    pub fn topic_url(&self, topic: &str) -> String {
        format!("{}/{topic}", self.base_url)
    }

    /// `{base}/{topic}/json`, with `?poll=1` when following.
    pub fn json_url(&self, topic: &str, follow: bool) -> String {
        if follow {
            format!("{}/{topic}/json?poll=1", self.base_url)
        } else {
            format!("{}/{topic}/json", self.base_url)
        }
    }

    // ── Publish ───────────────────────────────────────────────────────────

    /// POST `body` to the topic with `headers` plus the bearer token. Only a
    /// 200 counts as delivered.
    pub async fn publish(&self, topic: &str, mut headers: HeaderMap, body: String) -> Result<()> {
        headers.extend(self.auth_headers()?);
        let url = self.topic_url(topic);
        let response = self
            .http
            .post(&url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(network_failure)?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "publish response");
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(NtfyError::UnexpectedResponseStatus(status.as_u16()))
        }
    }

    // ── Read ──────────────────────────────────────────────────────────────

    /// GET the cached messages of `topic` as raw JSON.
    ///
    /// The status code is not checked: the relay answers errors with a JSON
    /// object, which callers treat like any other non-list body.
    pub async fn fetch_json(&self, topic: &str) -> Result<serde_json::Value> {
        let url = self.json_url(topic, false);
        let response = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(network_failure)?;
        debug!(url = %url, status = response.status().as_u16(), "fetch response");

        let bytes = response.bytes().await.map_err(network_failure)?;
        serde_json::from_slice(&bytes).map_err(|e| NtfyError::InvalidResponse(e.to_string()))
    }

    /// Stream newline-delimited messages of `topic`, calling `on_message` for
    /// each one until the server closes the connection.
    ///
    /// Blank lines and relay bookkeeping frames are skipped; lines that are not
    /// valid JSON are logged and skipped. Returns the number of messages
    /// delivered to `on_message`.
    pub async fn stream<F>(&self, topic: &str, mut on_message: F) -> Result<usize>
    where
        F: FnMut(RelayMessage),
    {
        let url = self.json_url(topic, true);
        let mut response = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(network_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NtfyError::UnexpectedResponseStatus(status.as_u16()));
        }
        debug!(url = %url, "stream opened");

        let mut delivered = 0;
        let mut pending: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(network_failure)? {
            pending.extend_from_slice(&chunk);
            while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = pending.drain(..=pos).collect();
                if let Some(msg) = decode_line(&line) {
                    on_message(msg);
                    delivered += 1;
                }
            }
        }
        if let Some(msg) = decode_line(&pending) {
            on_message(msg);
            delivered += 1;
        }

        debug!(url = %url, delivered, "stream closed");
        Ok(delivered)
    }

    /// `Authorization: Bearer {token}` when a token is configured.
    ///
    /// A token that cannot travel in a header fails the request rather than
    /// letting it go out unauthenticated.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.auth_token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                warn!(error = %e, "auth token is not a valid header value");
                NtfyError::NetworkFailure(format!("invalid Authorization header: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

/// Decode one NDJSON line. `None` for blank and bookkeeping lines and for
/// lines that are not a JSON object.
fn decode_line(line: &[u8]) -> Option<RelayMessage> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let value = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, line = %text, "skipping undecodable stream line");
            return None;
        }
    };
    match decode_message(value) {
        Some(msg) if msg.is_bookkeeping() => None,
        Some(msg) => Some(msg),
        None => {
            warn!(line = %text, "skipping stream line that is not an object");
            None
        }
    }
}

/// Decode a relay object. Fields are read leniently, so only non-objects are
/// rejected.
pub(crate) fn decode_message(value: serde_json::Value) -> Option<RelayMessage> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn network_failure(e: reqwest::Error) -> NtfyError {
    NtfyError::NetworkFailure(e.to_string())
}
