//! HTTP API for arbiter.
//!
//! Serves the model registry and document store, runs respondents for a
//! session and asks a judge to score the collected answers.

mod error;
mod handlers;
mod session;
mod types;

use std::sync::Arc;

use arbiter_core::context::AppContext;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{status_for, ApiError};
pub use handlers::*;
pub use session::{Session, SessionStore};
pub use types::*;

/// Uploaded PDFs arrive base64-encoded inside JSON.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// API server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ctx: AppContext,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // Registry
        .route("/models", get(list_models))
        .route("/models/respondents", get(list_respondents))
        .route("/models/judges", get(list_judges))
        // Documents
        .route("/documents", get(list_documents))
        .route("/documents/upload", post(upload_document))
        .route("/document-text/{doc_id}", get(document_text))
        .route("/question-set/{doc_id}", get(question_set))
        // Invocation
        .route("/respond", post(respond))
        .route("/sessions/{session_id}", get(get_session))
        .route("/sessions/{session_id}/answers", post(run_answers))
        .route("/sessions/{session_id}/evaluation", post(run_evaluation))
        // Middleware
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
pub async fn start_server(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

/// Serve on an already-bound listener.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    tracing::info!(addr = %listener.local_addr()?, "arbiter API listening");
    axum::serve(listener, build_router(state)).await
}
