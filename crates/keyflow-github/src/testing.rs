//! Scripted in-memory [`KeyService`] for unit tests

use crate::error::{GitHubError, Result};
use crate::service::{CreatedKey, KeyOutcome, KeyService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses and records every call it receives
#[derive(Default)]
pub(crate) struct ScriptedKeyService {
    creates: Mutex<VecDeque<Result<CreatedKey>>>,
    gets: Mutex<VecDeque<Result<KeyOutcome>>>,
    deletes: Mutex<VecDeque<Result<()>>>,
    pub(crate) created_keys: Mutex<Vec<String>>,
    pub(crate) reads: Mutex<Vec<(i64, Option<String>)>>,
    pub(crate) deleted: Mutex<Vec<i64>>,
}

impl ScriptedKeyService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_create(self, result: Result<CreatedKey>) -> Self {
        self.creates.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn on_get(self, result: Result<KeyOutcome>) -> Self {
        self.gets.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn on_delete(self, result: Result<()>) -> Self {
        self.deletes.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.created_keys.lock().unwrap().len()
            + self.reads.lock().unwrap().len()
            + self.deleted.lock().unwrap().len()
    }
}

pub(crate) fn api_error(status: u16, message: &str) -> GitHubError {
    GitHubError::Api {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl KeyService for ScriptedKeyService {
    async fn create_key(&self, armored_public_key: &str) -> Result<CreatedKey> {
        self.created_keys
            .lock()
            .unwrap()
            .push(armored_public_key.to_string());
        self.creates
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected create_key call")
    }

    async fn get_key(&self, id: i64, validator: Option<&str>) -> Result<KeyOutcome> {
        self.reads
            .lock()
            .unwrap()
            .push((id, validator.map(str::to_string)));
        self.gets
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected get_key call")
    }

    async fn delete_key(&self, id: i64) -> Result<()> {
        self.deleted.lock().unwrap().push(id);
        self.deletes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}
