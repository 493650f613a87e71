use std::collections::HashMap;

use async_trait::async_trait;
use intake_state::DomainState;
use tokio::sync::Mutex;

use crate::types::{ApplicationRecord, ApplicationStatus};
use crate::{ApplicationStore, StoreError};

/// Application store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
  records: Mutex<HashMap<String, ApplicationRecord>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed a record, e.g. a draft saved in an earlier session.
  pub async fn insert(&self, record: ApplicationRecord) {
    self
      .records
      .lock()
      .await
      .insert(record.user_id.clone(), record);
  }

  pub async fn len(&self) -> usize {
    self.records.lock().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.records.lock().await.is_empty()
  }
}

#[async_trait]
impl ApplicationStore for InMemoryStore {
  async fn submit_application(
    &self,
    user_id: &str,
    state: &DomainState,
    status: ApplicationStatus,
  ) -> Result<ApplicationRecord, StoreError> {
    let mut records = self.records.lock().await;
    let record = ApplicationRecord::upsert(records.get(user_id).cloned(), user_id, state, status)?;
    records.insert(user_id.to_string(), record.clone());
    Ok(record)
  }

  async fn get_application(&self, user_id: &str) -> Result<Option<ApplicationRecord>, StoreError> {
    Ok(self.records.lock().await.get(user_id).cloned())
  }
}
