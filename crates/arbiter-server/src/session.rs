//! Per-session evaluation state: each session owns its aggregator, the
//! document text and questions it was answered against, and the last verdict.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use arbiter_core::aggregator::ResponseAggregator;
use arbiter_core::model::JudgeVerdict;
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct Session {
    pub doc_id: Option<u32>,
    pub document_text: String,
    pub questions: Vec<String>,
    pub aggregator: ResponseAggregator,
    verdict: Mutex<Option<JudgeVerdict>>,
}

impl Session {
    pub fn new(doc_id: Option<u32>, document_text: String, questions: Vec<String>) -> Self {
        Self {
            doc_id,
            document_text,
            questions,
            aggregator: ResponseAggregator::new(),
            verdict: Mutex::new(None),
        }
    }

    pub fn verdict(&self) -> Option<JudgeVerdict> {
        self.verdict
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_verdict(&self, verdict: JudgeVerdict) {
        *self.verdict.lock().unwrap_or_else(PoisonError::into_inner) = Some(verdict);
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh run for `id`, discarding earlier answers and verdict.
    pub async fn begin(&self, id: &str, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        self.sessions
            .write()
            .await
            .insert(id.to_string(), Arc::clone(&session));
        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
