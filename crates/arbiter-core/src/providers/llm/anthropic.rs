use super::{http_client, status_error, ClientSettings, LlmClient};
use crate::model::LlmResponse;
use crate::prompt::Prompt;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Messages API requires `max_tokens`; used when the entry leaves it unset.
const DEFAULT_MAX_TOKENS: u32 = 1024;

pub struct AnthropicClient {
    settings: ClientSettings,
    url: String,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(settings: ClientSettings) -> anyhow::Result<Self> {
        let url = format!("{}/v1/messages", settings.base_url_or(ANTHROPIC_BASE_URL));
        let client = http_client(settings.timeout_secs)?;
        Ok(Self {
            settings,
            url,
            client,
        })
    }

    fn body(&self, prompt: &Prompt) -> serde_json::Value {
        let mut body = json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": self.settings.temperature,
        });
        match prompt {
            Prompt::Text(text) => {
                body["messages"] = json!([{ "role": "user", "content": text }]);
            }
            Prompt::Chat(chat) => {
                body["system"] = json!(chat.system);
                body["messages"] = json!([{ "role": "user", "content": chat.human }]);
            }
        }
        body
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, prompt: &Prompt) -> anyhow::Result<LlmResponse> {
        debug!(url = %self.url, model = %self.settings.model, "messages request");
        let resp = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.body(prompt))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error("anthropic", resp).await);
        }
        let json: serde_json::Value = resp.json().await?;

        let blocks = json
            .get("content")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("anthropic API response missing content"))?;
        let text = blocks
            .iter()
            .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("");

        Ok(LlmResponse {
            text,
            provider: "anthropic".to_string(),
            model: self.settings.model.clone(),
            meta: json!({ "usage": json.get("usage").cloned().unwrap_or_default() }),
        })
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}
