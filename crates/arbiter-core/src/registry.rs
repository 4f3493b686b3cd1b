//! Fixed, ordered model registry: descriptors plus one live client each.

use std::sync::Arc;

use tracing::info;

use crate::config::{ArbiterConfig, ModelEntry, ProviderKind};
use crate::errors::{ArbiterError, ArbiterResult};
use crate::model::{ModelDescriptor, Role};
use crate::providers::llm::anthropic::AnthropicClient;
use crate::providers::llm::fake::FakeClient;
use crate::providers::llm::openai::OpenAIClient;
use crate::providers::llm::{ClientSettings, LlmClient};

pub struct RegisteredModel {
    pub descriptor: ModelDescriptor,
    pub client: Arc<dyn LlmClient>,
}

pub struct ModelRegistry {
    models: Vec<RegisteredModel>,
}

fn api_key(entry: &ModelEntry) -> ArbiterResult<String> {
    let key_env = entry.api_key_env().unwrap_or_default();
    std::env::var(key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            ArbiterError::startup(format!(
                "model {} ({}): {} is not set",
                entry.id, entry.display_name, key_env
            ))
        })
}

fn build_client(entry: &ModelEntry, timeout_secs: u64) -> ArbiterResult<Arc<dyn LlmClient>> {
    let settings = || -> ArbiterResult<ClientSettings> {
        let mut settings = ClientSettings::new(entry.model.clone(), api_key(entry)?)
            .with_temperature(entry.temperature)
            .with_max_tokens(entry.max_tokens)
            .with_timeout_secs(timeout_secs);
        if let Some(url) = &entry.base_url {
            settings = settings.with_base_url(url.clone());
        }
        Ok(settings)
    };
    let startup = |e: anyhow::Error| {
        ArbiterError::startup(format!("model {} ({}): {}", entry.id, entry.display_name, e))
    };

    let client: Arc<dyn LlmClient> = match entry.provider {
        ProviderKind::Fake => Arc::new(FakeClient::new(entry.model.clone())),
        ProviderKind::OpenAi => Arc::new(OpenAIClient::new(settings()?).map_err(startup)?),
        ProviderKind::Together => {
            Arc::new(OpenAIClient::together(settings()?).map_err(startup)?)
        }
        ProviderKind::Anthropic => {
            Arc::new(AnthropicClient::new(settings()?).map_err(startup)?)
        }
    };
    Ok(client)
}

impl ModelRegistry {
    pub fn from_config(cfg: &ArbiterConfig) -> ArbiterResult<Self> {
        Self::from_entries(&cfg.models, cfg.timeout_secs)
    }

    /// Build every client; any failure aborts startup.
    pub fn from_entries(entries: &[ModelEntry], timeout_secs: u64) -> ArbiterResult<Self> {
        let mut models = Vec::with_capacity(entries.len());
        for entry in entries {
            let client = build_client(entry, timeout_secs)?;
            models.push(RegisteredModel {
                descriptor: entry.descriptor(),
                client,
            });
        }
        info!(
            models = models.len(),
            respondents = models.iter().filter(|m| !m.descriptor.is_judge).count(),
            "model registry ready"
        );
        Ok(Self { models })
    }

    /// Registry over already-built clients, in the given order.
    pub fn from_clients(models: Vec<(ModelDescriptor, Arc<dyn LlmClient>)>) -> Self {
        Self {
            models: models
                .into_iter()
                .map(|(descriptor, client)| RegisteredModel { descriptor, client })
                .collect(),
        }
    }

    pub fn descriptors(&self) -> Vec<ModelDescriptor> {
        self.models.iter().map(|m| m.descriptor.clone()).collect()
    }

    pub fn by_role(&self, role: Role) -> Vec<ModelDescriptor> {
        self.models
            .iter()
            .filter(|m| m.descriptor.role() == role)
            .map(|m| m.descriptor.clone())
            .collect()
    }

    pub fn respondents(&self) -> Vec<ModelDescriptor> {
        self.by_role(Role::Respondent)
    }

    pub fn judges(&self) -> Vec<ModelDescriptor> {
        self.by_role(Role::Judge)
    }

    /// Respondent ids in registry order; this order fixes the judge's labels.
    pub fn respondent_ids(&self) -> Vec<u32> {
        self.respondents().iter().map(|d| d.model_id).collect()
    }

    pub fn judge_ids(&self) -> Vec<u32> {
        self.judges().iter().map(|d| d.model_id).collect()
    }

    fn get(&self, model_id: u32) -> ArbiterResult<&RegisteredModel> {
        self.models
            .iter()
            .find(|m| m.descriptor.model_id == model_id)
            .ok_or_else(|| ArbiterError::not_found("model", model_id))
    }

    pub fn descriptor(&self, model_id: u32) -> ArbiterResult<ModelDescriptor> {
        self.get(model_id).map(|m| m.descriptor.clone())
    }

    pub fn handle(&self, model_id: u32) -> ArbiterResult<Arc<dyn LlmClient>> {
        self.get(model_id).map(|m| Arc::clone(&m.client))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
