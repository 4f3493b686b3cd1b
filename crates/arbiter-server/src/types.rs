//! Request and response bodies for the HTTP API.

use arbiter_core::model::JudgeVerdict;
use arbiter_core::pipeline::RespondentOutcome;
use arbiter_core::prompt::{Criteria, Prompt};
use arbiter_core::verdict::ScoreLine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// One-off invocation. `prompt` is either a plain string or `{system, human}`.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub model_id: u32,
    pub prompt: Prompt,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RespondResponse {
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub doc_name: String,
    pub doc_type: String,
    /// Extension selects the extractor (`.pdf`, `.txt`, `.md`).
    pub file_name: String,
    pub content_base64: String,
}

/// Start an answer run. Exactly one of `doc_id` or `document_text` must be
/// set; `questions` defaults to the document's question set when `doc_id` is
/// used.
#[derive(Debug, Default, Deserialize)]
pub struct AnswersRequest {
    #[serde(default)]
    pub doc_id: Option<u32>,
    #[serde(default)]
    pub document_text: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AnswersResponse {
    pub session_id: String,
    pub results: Vec<RespondentOutcome>,
    pub ready: bool,
    pub missing: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub judge_id: u32,
    #[serde(default)]
    pub criteria: Option<Criteria>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub session_id: String,
    pub judge_id: u32,
    pub text: String,
    /// 1-based label from the `Best Model: Model K` line, when present.
    pub best_model: Option<usize>,
    /// Registry id behind `best_model`.
    pub best_model_id: Option<u32>,
    pub scores: Vec<ScoreLine>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub model_id: u32,
    pub output: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub doc_id: Option<u32>,
    pub questions: Vec<String>,
    pub responses: Vec<SessionResponse>,
    pub ready: bool,
    pub missing: Vec<u32>,
    pub verdict: Option<JudgeVerdict>,
}
