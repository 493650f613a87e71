//! Intake Store
//!
//! This crate provides the persistence collaborator the wizard engine submits
//! through, and the hydration side used to resume a saved draft.
//!
//! The [`ApplicationStore`] trait defines operations for:
//! - Saving an application as a draft (autosave)
//! - Submitting an application (terminal step of the wizard)
//! - Loading a previously saved application for hydration
//!
//! Two implementations ship with the crate: [`InMemoryStore`] for tests and
//! embedding, and [`FsApplicationStore`] which keeps one JSON file per user.

mod fs;
mod memory;
mod types;

use std::sync::Arc;

use async_trait::async_trait;
use intake_state::DomainState;

pub use fs::FsApplicationStore;
pub use memory::InMemoryStore;
pub use types::{ApplicationRecord, ApplicationStatus};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The application was already submitted and can no longer change.
  #[error("application for user '{user_id}' was already submitted")]
  AlreadySubmitted { user_id: String },

  /// The backing service rejected or could not process the request.
  #[error("store unavailable: {message}")]
  Unavailable { message: String },

  /// The record found for a user belongs to someone else.
  #[error("record for user '{requested}' belongs to '{found}'")]
  ForeignRecord { requested: String, found: String },

  /// Reading or writing a record failed.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A stored record could not be encoded or decoded.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl StoreError {
  pub fn unavailable(message: impl Into<String>) -> Self {
    Self::Unavailable {
      message: message.into(),
    }
  }
}

/// Storage trait for applications.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
  /// Create or update the user's application with the given status.
  ///
  /// A submitted application is final: any later call fails with
  /// [`StoreError::AlreadySubmitted`].
  async fn submit_application(
    &self,
    user_id: &str,
    state: &DomainState,
    status: ApplicationStatus,
  ) -> Result<ApplicationRecord, StoreError>;

  /// Get the user's application, if one was ever saved.
  async fn get_application(&self, user_id: &str) -> Result<Option<ApplicationRecord>, StoreError>;

  /// Load the saved answers to hydrate a new session.
  async fn load_draft(&self, user_id: &str) -> Result<Option<DomainState>, StoreError> {
    Ok(self.get_application(user_id).await?.map(|record| record.data))
  }
}

#[async_trait]
impl<S: ApplicationStore + ?Sized> ApplicationStore for Arc<S> {
  async fn submit_application(
    &self,
    user_id: &str,
    state: &DomainState,
    status: ApplicationStatus,
  ) -> Result<ApplicationRecord, StoreError> {
    (**self).submit_application(user_id, state, status).await
  }

  async fn get_application(&self, user_id: &str) -> Result<Option<ApplicationRecord>, StoreError> {
    (**self).get_application(user_id).await
  }

  async fn load_draft(&self, user_id: &str) -> Result<Option<DomainState>, StoreError> {
    (**self).load_draft(user_id).await
  }
}
