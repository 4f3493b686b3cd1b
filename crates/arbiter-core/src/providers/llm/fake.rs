use super::LlmClient;
use crate::model::LlmResponse;
use crate::prompt::Prompt;
use async_trait::async_trait;

/// Offline client. Answers with a fixed text, or with a structurally valid
/// answer block per enumerated question when no text is set.
#[derive(Debug)]
pub struct FakeClient {
    model: String,
    fixed_response: Option<String>,
}

impl FakeClient {
    pub fn new(model: String) -> Self {
        Self {
            model,
            fixed_response: None,
        }
    }

    pub fn with_response(mut self, response: String) -> Self {
        self.fixed_response = Some(response);
        self
    }

    fn canned(&self, prompt: &Prompt) -> String {
        let human = match prompt {
            Prompt::Chat(c) if c.system.contains("Best Model:") => {
                return "Best Model: Model 1\nAll responses were equivalent, so the first is chosen."
                    .to_string();
            }
            Prompt::Chat(c) => c.human.as_str(),
            Prompt::Text(t) => t.as_str(),
        };
        // Count "N. question" lines after the last Questions header; the
        // document body comes before it and may contain the same word.
        let count = human
            .rsplit_once("\nQuestions:\n")
            .map(|(_, rest)| {
                rest.lines()
                    .filter(|l| {
                        l.split_once(". ")
                            .is_some_and(|(n, _)| n.trim().parse::<usize>().is_ok())
                    })
                    .count()
            })
            .unwrap_or(0);
        if count == 0 {
            return format!("{} received the prompt.", self.model);
        }
        (1..=count)
            .map(|i| format!("Question {}\nAnswer: [No answer]", i))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, prompt: &Prompt) -> anyhow::Result<LlmResponse> {
        let text = self
            .fixed_response
            .clone()
            .unwrap_or_else(|| self.canned(prompt));

        Ok(LlmResponse {
            text,
            provider: "fake".to_string(),
            model: self.model.clone(),
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::build_respondent_prompt;

    #[tokio::test]
    async fn canned_answers_follow_question_count() {
        let client = FakeClient::new("fake-1".into());
        let prompt = build_respondent_prompt("doc", &["a".into(), "b".into()]);
        let resp = client.complete(&prompt.into()).await.unwrap();
        assert_eq!(
            resp.text,
            "Question 1\nAnswer: [No answer]\n\nQuestion 2\nAnswer: [No answer]"
        );
    }

    #[tokio::test]
    async fn numbered_lines_in_the_document_are_not_questions() {
        let client = FakeClient::new("fake-1".into());
        let doc = "Questions raised:\n1. Budget\n2. Staffing\n3. Timeline";
        let prompt = build_respondent_prompt(doc, &["Who signed it?".into()]);
        let resp = client.complete(&prompt.into()).await.unwrap();
        assert_eq!(resp.text, "Question 1\nAnswer: [No answer]");

        let doc = "Questions:\n1. Budget\n2. Staffing";
        let prompt = build_respondent_prompt(doc, &["Who?".into(), "When?".into()]);
        let resp = client.complete(&prompt.into()).await.unwrap();
        assert_eq!(
            resp.text,
            "Question 1\nAnswer: [No answer]\n\nQuestion 2\nAnswer: [No answer]"
        );
    }

    #[tokio::test]
    async fn fixed_response_wins() {
        let client = FakeClient::new("fake-1".into()).with_response("ok".into());
        let resp = client.complete(&Prompt::Text("x".into())).await.unwrap();
        assert_eq!(resp.text, "ok");
        assert_eq!(resp.provider, "fake");
    }

    #[tokio::test]
    async fn judge_prompts_get_a_verdict() {
        let client = FakeClient::new("fake-judge".into());
        let prompt = crate::prompt::build_judge_prompt(
            "doc",
            &["q".into()],
            &["a".into()],
            &crate::prompt::Criteria::standard(),
        );
        let resp = client.complete(&prompt.into()).await.unwrap();
        assert!(resp.text.starts_with("Best Model: Model 1"));
    }
}
