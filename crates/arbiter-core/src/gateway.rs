use std::sync::Arc;

use tracing::{info_span, warn, Instrument};

use crate::errors::{ArbiterError, ArbiterResult};
use crate::model::LlmResponse;
use crate::prompt::Prompt;
use crate::registry::ModelRegistry;

/// Dispatches prompts to registered models. Upstream failures pass through
/// untouched; nothing here retries or rate-limits.
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<ModelRegistry>,
}

impl Gateway {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub async fn invoke(&self, model_id: u32, prompt: &Prompt) -> ArbiterResult<String> {
        self.invoke_raw(model_id, prompt).await.map(|r| r.text)
    }

    pub async fn invoke_raw(&self, model_id: u32, prompt: &Prompt) -> ArbiterResult<LlmResponse> {
        let client = self.registry.handle(model_id)?;
        let span = info_span!(
            "llm.invoke",
            "model.id" = model_id,
            "model.name" = client.model_name(),
            "provider" = client.provider_name(),
            "prompt.len" = prompt.text_len(),
            "elapsed_ms" = tracing::field::Empty,
            "error" = tracing::field::Empty,
        );

        async move {
            let start = std::time::Instant::now();
            let result = client.complete(prompt).await;
            let span = tracing::Span::current();
            span.record("elapsed_ms", start.elapsed().as_millis() as u64);

            result.map_err(|e| {
                span.record("error", true);
                warn!(model_id, error = %e, "model invocation failed");
                ArbiterError::Upstream {
                    model_id,
                    message: format!("{:#}", e),
                }
            })
        }
        .instrument(span)
        .await
    }
}
