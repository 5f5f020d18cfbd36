//! Blocking client for the generation proxy.

use std::time::Duration;

use deck_core::{GenerationRequest, GenerationResponse};
use reqwest::StatusCode;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Connection settings for the generation proxy.
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_error_body_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_error_body_bytes: 8 * 1024,
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url =
            std::env::var("DECKGEN_PROXY_URL").unwrap_or_else(|_| defaults.base_url.clone());

        let timeout = std::env::var("DECKGEN_PROXY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let max_error_body_bytes = std::env::var("DECKGEN_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.max_error_body_bytes);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_error_body_bytes,
        }
    }

    /// Override the proxy base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/api/presentation", self.base_url)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("proxy returned error: status={status} body={body}")]
    Upstream { status: StatusCode, body: String },
}

pub struct ProxyClient {
    config: ProxyConfig,
    http: reqwest::blocking::Client,
}

impl ProxyClient {
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent("deckgen")
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Ask the proxy to generate presentation text.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProxyError> {
        let url = self.config.endpoint();
        log::debug!("POST {} (slide_by_slide={})", url, request.slide_by_slide);

        let resp = self.http.post(&url).json(request).send()?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            log::error!("Proxy error response ({}): {}", status, body);
            return Err(ProxyError::Upstream {
                status,
                body: truncate_utf8(&body, self.config.max_error_body_bytes),
            });
        }

        let bytes = resp.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Cut `text` to at most `max` bytes without splitting a character.
fn truncate_utf8(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
