//! HTTP request handlers for API endpoints

use std::sync::Arc;

use arbiter_core::model::{Document, ModelDescriptor, QuestionSet};
use arbiter_core::pipeline;
use arbiter_core::store::DocumentStore;
use arbiter_core::verdict::{parse_best_model, parse_score_lines};
use arbiter_core::{ArbiterError, ArbiterResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use base64::Engine;
use tracing::info;

use crate::error::ApiError;
use crate::session::Session;
use crate::types::{
    AnswersRequest, AnswersResponse, EvaluationRequest, EvaluationResponse, RespondRequest,
    RespondResponse, RootResponse, SessionResponse, SessionSnapshot, UploadRequest,
};
use crate::AppState;

type ApiResult<T> = Result<T, ApiError>;

/// Run a blocking store call (file reads, PDF extraction) off the runtime.
async fn blocking<T, F>(store: &Arc<DocumentStore>, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&DocumentStore) -> ArbiterResult<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| ApiError::internal(format!("worker failed: {e}")))?
        .map_err(ApiError::from)
}

pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "API is running".to_string(),
    })
}

pub async fn list_models(State(state): State<AppState>) -> Json<Vec<ModelDescriptor>> {
    Json(state.ctx.registry.descriptors())
}

pub async fn list_respondents(State(state): State<AppState>) -> Json<Vec<ModelDescriptor>> {
    Json(state.ctx.registry.respondents())
}

pub async fn list_judges(State(state): State<AppState>) -> Json<Vec<ModelDescriptor>> {
    Json(state.ctx.registry.judges())
}

pub async fn list_documents(State(state): State<AppState>) -> Json<Vec<Document>> {
    Json(state.ctx.store.documents())
}

pub async fn document_text(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> ApiResult<Json<Document>> {
    let doc = blocking(&state.ctx.store, move |s| s.document_with_text(doc_id)).await?;
    Ok(Json(doc))
}

pub async fn question_set(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> ApiResult<Json<QuestionSet>> {
    Ok(Json(state.ctx.store.question_set(doc_id)?))
}

pub async fn upload_document(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> ApiResult<impl IntoResponse> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(req.content_base64.trim())
        .map_err(|e| ApiError::bad_request(format!("content_base64 is not valid base64: {e}")))?;
    info!(file_name = %req.file_name, bytes = bytes.len(), "upload received");

    let doc = blocking(&state.ctx.store, move |s| {
        s.add_upload(&req.doc_name, &req.doc_type, &req.file_name, &bytes)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

pub async fn respond(
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>,
) -> ApiResult<Json<RespondResponse>> {
    let output = state.ctx.gateway.invoke(req.model_id, &req.prompt).await?;
    Ok(Json(RespondResponse { output }))
}

/// Ask every respondent about one document, replacing the session's previous run.
pub async fn run_answers(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<AnswersRequest>,
) -> ApiResult<Json<AnswersResponse>> {
    let (doc_id, document_text, questions) = match (req.doc_id, req.document_text) {
        (Some(_), Some(_)) => {
            return Err(ApiError::bad_request(
                "set either doc_id or document_text, not both",
            ))
        }
        (None, None) => return Err(ApiError::bad_request("doc_id or document_text is required")),
        (Some(doc_id), None) => {
            let text = blocking(&state.ctx.store, move |s| s.document_text(doc_id)).await?;
            let questions = match req.questions {
                Some(q) => q,
                None => state.ctx.store.question_set(doc_id)?.questions,
            };
            (Some(doc_id), text, questions)
        }
        (None, Some(text)) => {
            let questions = req
                .questions
                .ok_or_else(|| ApiError::bad_request("questions are required with document_text"))?;
            (None, text, questions)
        }
    };

    let session = state
        .sessions
        .begin(&session_id, Session::new(doc_id, document_text, questions))
        .await;
    let respondents = state.ctx.registry.respondent_ids();
    info!(session_id = %session_id, doc_id = ?doc_id, "answer run started");

    let results = pipeline::answer_all(
        &state.ctx.gateway,
        &respondents,
        &session.document_text,
        &session.questions,
        &session.aggregator,
    )
    .await;
    let missing = session.aggregator.missing(&respondents);

    Ok(Json(AnswersResponse {
        session_id,
        results,
        ready: missing.is_empty(),
        missing,
    }))
}

pub async fn run_evaluation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<EvaluationRequest>,
) -> ApiResult<Json<EvaluationResponse>> {
    let session = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| ArbiterError::not_found("session", &session_id))?;
    let criteria = req.criteria.unwrap_or_else(|| state.ctx.criteria.clone());
    let respondents = state.ctx.registry.respondent_ids();

    let verdict = pipeline::judge(
        &state.ctx.gateway,
        req.judge_id,
        &respondents,
        &session.document_text,
        &session.questions,
        &criteria,
        &session.aggregator,
    )
    .await?;
    session.set_verdict(verdict.clone());

    let best_model = parse_best_model(&verdict.text);
    let best_model_id = best_model
        .and_then(|k| k.checked_sub(1))
        .and_then(|i| respondents.get(i).copied());
    Ok(Json(EvaluationResponse {
        session_id,
        judge_id: verdict.judge_id,
        scores: parse_score_lines(&verdict.text),
        text: verdict.text,
        best_model,
        best_model_id,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionSnapshot>> {
    let session = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| ArbiterError::not_found("session", &session_id))?;
    let respondents = state.ctx.registry.respondent_ids();
    let responses = respondents
        .iter()
        .map(|&model_id| SessionResponse {
            model_id,
            output: session.aggregator.get(model_id),
        })
        .collect();
    let missing = session.aggregator.missing(&respondents);

    Ok(Json(SessionSnapshot {
        session_id,
        doc_id: session.doc_id,
        questions: session.questions.clone(),
        responses,
        ready: missing.is_empty(),
        missing,
        verdict: session.verdict(),
    }))
}
