//! Latest respondent output per model, for the current document and questions.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::errors::{ArbiterError, ArbiterResult};

#[derive(Debug, Default)]
pub struct ResponseAggregator {
    results: Mutex<HashMap<u32, String>>,
}

impl ResponseAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u32, String>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last write wins.
    pub fn record(&self, model_id: u32, text: impl Into<String>) {
        self.lock().insert(model_id, text.into());
    }

    pub fn get(&self, model_id: u32) -> Option<String> {
        self.lock().get(&model_id).cloned()
    }

    /// True iff every expected id has a non-empty result.
    pub fn all_ready(&self, expected: &[u32]) -> bool {
        let results = self.lock();
        expected
            .iter()
            .all(|id| results.get(id).is_some_and(|t| !t.is_empty()))
    }

    /// Ids from `expected` without a usable result, in the given order.
    pub fn missing(&self, expected: &[u32]) -> Vec<u32> {
        let results = self.lock();
        expected
            .iter()
            .copied()
            .filter(|id| !results.get(id).is_some_and(|t| !t.is_empty()))
            .collect()
    }

    /// Results in caller order; fails if any id has none yet.
    pub fn collect_in_order(&self, ordered: &[u32]) -> ArbiterResult<Vec<String>> {
        let missing = self.missing(ordered);
        if !missing.is_empty() {
            return Err(ArbiterError::NotReady { missing });
        }
        let results = self.lock();
        Ok(ordered
            .iter()
            .filter_map(|id| results.get(id).cloned())
            .collect())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
