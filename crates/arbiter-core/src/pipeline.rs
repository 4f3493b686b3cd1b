//! Respondent → judge flow shared by the HTTP server and the CLI.

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::ResponseAggregator;
use crate::errors::{ArbiterError, ArbiterResult};
use crate::gateway::Gateway;
use crate::model::JudgeVerdict;
use crate::prompt::{build_judge_prompt, build_respondent_prompt, Criteria, Prompt};

/// Result of one respondent call.
#[derive(Debug, Clone, Serialize)]
pub struct RespondentOutcome {
    pub model_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RespondentOutcome {
    pub fn is_ok(&self) -> bool {
        self.output.is_some()
    }
}

/// Ask every respondent concurrently. Successful outputs are recorded in the
/// aggregator; failures are returned per model and never recorded.
pub async fn answer_all(
    gateway: &Gateway,
    respondents: &[u32],
    document_text: &str,
    questions: &[String],
    aggregator: &ResponseAggregator,
) -> Vec<RespondentOutcome> {
    let prompt = Prompt::Chat(build_respondent_prompt(document_text, questions));
    info!(
        respondents = respondents.len(),
        questions = questions.len(),
        "dispatching respondents"
    );

    let calls = respondents.iter().map(|&model_id| {
        let prompt = &prompt;
        async move { (model_id, gateway.invoke(model_id, prompt).await) }
    });

    join_all(calls)
        .await
        .into_iter()
        .map(|(model_id, result)| match result {
            Ok(text) => {
                aggregator.record(model_id, text.clone());
                RespondentOutcome {
                    model_id,
                    output: Some(text),
                    error: None,
                }
            }
            Err(e) => {
                warn!(model_id, error = %e, "respondent failed");
                RespondentOutcome {
                    model_id,
                    output: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

/// Score the recorded answers. Refuses unless every respondent has a result;
/// responses are labeled `Model 1..N` in `respondents` order.
pub async fn judge(
    gateway: &Gateway,
    judge_id: u32,
    respondents: &[u32],
    document_text: &str,
    questions: &[String],
    criteria: &Criteria,
    aggregator: &ResponseAggregator,
) -> ArbiterResult<JudgeVerdict> {
    if respondents.is_empty() {
        return Err(ArbiterError::invalid_input("no respondents to evaluate"));
    }
    if !gateway.registry().descriptor(judge_id)?.is_judge {
        return Err(ArbiterError::invalid_input(format!(
            "model {judge_id} is not a judge"
        )));
    }
    if !aggregator.all_ready(respondents) {
        return Err(ArbiterError::NotReady {
            missing: aggregator.missing(respondents),
        });
    }
    let responses = aggregator.collect_in_order(respondents)?;
    let prompt = Prompt::Chat(build_judge_prompt(
        document_text,
        questions,
        &responses,
        criteria,
    ));

    info!(judge_id, respondents = respondents.len(), "requesting judge verdict");
    let text = gateway.invoke(judge_id, &prompt).await?;
    Ok(JudgeVerdict { judge_id, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LlmResponse, ModelDescriptor};
    use crate::providers::llm::fake::FakeClient;
    use crate::providers::llm::LlmClient;
    use crate::registry::ModelRegistry;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Records every prompt it receives.
    struct RecordingClient {
        reply: String,
        seen: Mutex<Vec<Prompt>>,
    }

    #[async_trait]
    impl LlmClient for RecordingClient {
        async fn complete(&self, prompt: &Prompt) -> anyhow::Result<LlmResponse> {
            self.seen.lock().unwrap().push(prompt.clone());
            Ok(LlmResponse {
                text: self.reply.clone(),
                provider: "recording".into(),
                model: "recording".into(),
                meta: serde_json::Value::Null,
            })
        }
        fn provider_name(&self) -> &'static str {
            "recording"
        }
        fn model_name(&self) -> &str {
            "recording"
        }
    }

    struct Down;

    #[async_trait]
    impl LlmClient for Down {
        async fn complete(&self, _prompt: &Prompt) -> anyhow::Result<LlmResponse> {
            anyhow::bail!("connection refused")
        }
        fn provider_name(&self) -> &'static str {
            "down"
        }
        fn model_name(&self) -> &str {
            "down"
        }
    }

    fn desc(id: u32, is_judge: bool) -> ModelDescriptor {
        ModelDescriptor {
            model_id: id,
            model_name: format!("m{id}"),
            model_display_name: format!("M{id}"),
            is_judge,
        }
    }

    fn fixed(text: &str) -> Arc<dyn LlmClient> {
        Arc::new(FakeClient::new("f".into()).with_response(text.into()))
    }

    #[tokio::test]
    async fn judge_sees_responses_in_registry_order() {
        let judge_client = Arc::new(RecordingClient {
            reply: "Best Model: Model 2\nMost complete.".into(),
            seen: Mutex::new(Vec::new()),
        });
        let registry = ModelRegistry::from_clients(vec![
            (desc(7, false), fixed("seven")),
            (desc(3, false), fixed("three")),
            (desc(9, true), judge_client.clone()),
        ]);
        let gateway = Gateway::new(Arc::new(registry));
        let respondents = gateway.registry().respondent_ids();
        assert_eq!(respondents, vec![7, 3]);

        let agg = ResponseAggregator::new();
        let questions = vec!["Who?".to_string()];
        let outcomes = answer_all(&gateway, &respondents, "doc", &questions, &agg).await;
        assert!(outcomes.iter().all(RespondentOutcome::is_ok));

        let verdict = judge(
            &gateway,
            9,
            &respondents,
            "doc",
            &questions,
            &Criteria::standard(),
            &agg,
        )
        .await
        .unwrap();
        assert_eq!(verdict.judge_id, 9);
        assert!(verdict.text.starts_with("Best Model: Model 2"));

        let seen = judge_client.seen.lock().unwrap();
        let Prompt::Chat(chat) = &seen[0] else {
            panic!("judge should get a chat prompt");
        };
        let m1 = chat.human.find("<Model1Responses>\nseven").unwrap();
        let m2 = chat.human.find("<Model2Responses>\nthree").unwrap();
        assert!(m1 < m2);
    }

    #[tokio::test]
    async fn failed_respondent_blocks_the_judge() {
        let registry = ModelRegistry::from_clients(vec![
            (desc(0, false), fixed("ok")),
            (desc(1, false), Arc::new(Down)),
            (desc(2, true), fixed("verdict")),
        ]);
        let gateway = Gateway::new(Arc::new(registry));
        let agg = ResponseAggregator::new();
        let questions = vec!["q".to_string()];

        let outcomes = answer_all(&gateway, &[0, 1], "doc", &questions, &agg).await;
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].error.as_deref().unwrap().contains("connection refused"));
        assert!(agg.get(1).is_none());

        let err = judge(&gateway, 2, &[0, 1], "doc", &questions, &Criteria::standard(), &agg)
            .await
            .unwrap_err();
        match err {
            ArbiterError::NotReady { missing } => assert_eq!(missing, vec![1]),
            other => panic!("expected NotReady, got {other}"),
        }
    }

    #[tokio::test]
    async fn unknown_judge_is_not_found() {
        let registry = ModelRegistry::from_clients(vec![(desc(0, false), fixed("ok"))]);
        let gateway = Gateway::new(Arc::new(registry));
        let agg = ResponseAggregator::new();
        agg.record(0, "ok");
        let err = judge(&gateway, 5, &[0], "doc", &[], &Criteria::standard(), &agg)
            .await
            .unwrap_err();
        assert!(matches!(err, ArbiterError::NotFound { .. }));

        let err = judge(&gateway, 0, &[0], "doc", &[], &Criteria::standard(), &agg)
            .await
            .unwrap_err();
        assert!(matches!(err, ArbiterError::InvalidInput { .. }));
    }
}
