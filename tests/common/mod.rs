#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use bson::Document;

use ctx_admin::services::store::{DocumentStore, StoreError, Target};

/// In-memory stand-in for the document store, mirroring the participant /
/// trials layout. Deletes can be forced to fail per identifier.
pub struct MemoryStore {
    docs: Mutex<HashMap<Target, Vec<String>>>,
    trials: Mutex<Vec<Document>>,
    fail_ids: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            trials: Mutex::new(Vec::new()),
            fail_ids: HashSet::new(),
        }
    }

    pub fn with_ids(target: Target, ids: &[&str]) -> Self {
        let store = Self::new();
        store
            .docs
            .lock()
            .unwrap()
            .insert(target, ids.iter().map(|id| id.to_string()).collect());
        store
    }

    /// Makes every recursive delete of `id` fail.
    pub fn failing(mut self, id: &str) -> Self {
        self.fail_ids.insert(id.to_string());
        self
    }

    pub fn add_trial(&self, subject_id: &str, trial_id: &str, mut payload: Document) {
        payload.insert("_id", trial_id);
        payload.insert("subject_id", subject_id);
        self.trials.lock().unwrap().push(payload);
    }

    pub fn remaining_ids(&self, target: Target) -> Vec<String> {
        self.docs
            .lock()
            .unwrap()
            .get(&target)
            .cloned()
            .unwrap_or_default()
    }

    pub fn trial_count(&self) -> usize {
        self.trials.lock().unwrap().len()
    }
}

impl DocumentStore for MemoryStore {
    async fn list_ids(&self, target: Target) -> Result<Vec<String>, StoreError> {
        Ok(self.remaining_ids(target))
    }

    async fn recursive_delete(&self, target: Target, id: &str) -> Result<(), StoreError> {
        if self.fail_ids.contains(id) {
            return Err(StoreError::Other(format!("simulated delete failure for {}", id)));
        }

        if let Some(ids) = self.docs.lock().unwrap().get_mut(&target) {
            ids.retain(|existing| existing != id);
        }
        self.trials
            .lock()
            .unwrap()
            .retain(|trial| trial.get_str("subject_id").map(|s| s != id).unwrap_or(true));
        Ok(())
    }

    async fn trials_for(&self, subject_id: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .trials
            .lock()
            .unwrap()
            .iter()
            .filter(|trial| trial.get_str("subject_id").map(|s| s == subject_id).unwrap_or(false))
            .cloned()
            .collect())
    }
}
