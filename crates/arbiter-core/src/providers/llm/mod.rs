use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::model::LlmResponse;
use crate::prompt::Prompt;

pub mod anthropic;
pub mod fake;
pub mod openai;

/// User agent for provider requests.
const USER_AGENT_VALUE: &str = concat!("arbiter/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Generation settings shared by every HTTP provider.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Override the provider's API root (tests, proxies).
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl ClientSettings {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.0,
            max_tokens: Some(1000),
            base_url: None,
            timeout_secs: 60,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub(crate) fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }
}

pub(crate) fn http_client(timeout_secs: u64) -> anyhow::Result<reqwest::Client> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(default_headers)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create HTTP client: {}", e))
}

/// Turn a non-success response into a descriptive error.
pub(crate) async fn status_error(provider: &str, resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let kind = match status.as_u16() {
        401 | 403 => "authentication rejected",
        429 => "rate limited",
        500..=599 => "server error",
        _ => "request failed",
    };
    anyhow::anyhow!(
        "{} API {} (status {}): {}",
        provider,
        kind,
        status.as_u16(),
        body
    )
}
