use super::{http_client, status_error, ClientSettings, LlmClient};
use crate::model::LlmResponse;
use crate::prompt::Prompt;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";

/// Chat-completions client for OpenAI and OpenAI-compatible hosts (Together).
pub struct OpenAIClient {
    settings: ClientSettings,
    provider: &'static str,
    url: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(settings: ClientSettings) -> anyhow::Result<Self> {
        Self::compatible(settings, "openai", OPENAI_BASE_URL)
    }

    pub fn together(settings: ClientSettings) -> anyhow::Result<Self> {
        Self::compatible(settings, "together", TOGETHER_BASE_URL)
    }

    fn compatible(
        settings: ClientSettings,
        provider: &'static str,
        default_base: &str,
    ) -> anyhow::Result<Self> {
        let url = format!("{}/chat/completions", settings.base_url_or(default_base));
        let client = http_client(settings.timeout_secs)?;
        Ok(Self {
            settings,
            provider,
            url,
            client,
        })
    }

    fn messages(prompt: &Prompt) -> Vec<serde_json::Value> {
        match prompt {
            Prompt::Text(text) => vec![json!({ "role": "user", "content": text })],
            Prompt::Chat(chat) => vec![
                json!({ "role": "system", "content": chat.system }),
                json!({ "role": "user", "content": chat.human }),
            ],
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, prompt: &Prompt) -> anyhow::Result<LlmResponse> {
        let mut body = json!({
            "model": self.settings.model,
            "messages": Self::messages(prompt),
            "temperature": self.settings.temperature,
        });
        if let Some(max_tokens) = self.settings.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        debug!(url = %self.url, model = %self.settings.model, "chat completion request");
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(self.provider, resp).await);
        }
        let json: serde_json::Value = resp.json().await?;

        // Parse choices[0].message.content
        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("{} API response missing content", self.provider))?
            .to_string();

        Ok(LlmResponse {
            text,
            provider: self.provider.to_string(),
            model: self.settings.model.clone(),
            meta: json!({ "usage": json.get("usage").cloned().unwrap_or_default() }),
        })
    }

    fn provider_name(&self) -> &'static str {
        self.provider
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}
