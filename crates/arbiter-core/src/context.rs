//! Process-scoped context built once at startup and shared by handle.

use std::sync::Arc;

use crate::config::ArbiterConfig;
use crate::errors::ArbiterResult;
use crate::gateway::Gateway;
use crate::prompt::Criteria;
use crate::registry::ModelRegistry;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<DocumentStore>,
    pub registry: Arc<ModelRegistry>,
    pub gateway: Gateway,
    pub criteria: Criteria,
}

impl AppContext {
    /// Load fixtures and build every model client; any failure is fatal.
    pub fn from_config(cfg: &ArbiterConfig) -> ArbiterResult<Self> {
        let registry = Arc::new(ModelRegistry::from_config(cfg)?);
        let store = Arc::new(DocumentStore::load(
            &cfg.data.documents,
            &cfg.data.questions,
        )?);
        Ok(Self::new(store, registry, cfg.criteria()))
    }

    pub fn new(store: Arc<DocumentStore>, registry: Arc<ModelRegistry>, criteria: Criteria) -> Self {
        let gateway = Gateway::new(Arc::clone(&registry));
        Self {
            store,
            registry,
            gateway,
            criteria,
        }
    }
}
