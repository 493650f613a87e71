use std::fmt;

use chrono::{DateTime, Utc};
use intake_state::DomainState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::StoreError;

/// Lifecycle status of an application record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
  Draft,
  Submitted,
}

impl fmt::Display for ApplicationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApplicationStatus::Draft => f.write_str("DRAFT"),
      ApplicationStatus::Submitted => f.write_str("SUBMITTED"),
    }
  }
}

/// An application as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
  pub application_id: Uuid,
  pub user_id: String,
  pub status: ApplicationStatus,
  pub data: DomainState,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub submitted_at: Option<DateTime<Utc>>,
}

impl ApplicationRecord {
  /// Apply a save on top of the existing record (if any).
  ///
  /// Keeps the application id and creation time across saves and refuses to
  /// touch a record that was already submitted.
  pub(crate) fn upsert(
    existing: Option<ApplicationRecord>,
    user_id: &str,
    state: &DomainState,
    status: ApplicationStatus,
  ) -> Result<Self, StoreError> {
    let now = Utc::now();
    let submitted_at = match status {
      ApplicationStatus::Submitted => Some(now),
      ApplicationStatus::Draft => None,
    };

    match existing {
      Some(record) if record.status == ApplicationStatus::Submitted => {
        Err(StoreError::AlreadySubmitted {
          user_id: user_id.to_string(),
        })
      }
      Some(record) => Ok(Self {
        status,
        data: state.clone(),
        updated_at: now,
        submitted_at,
        ..record
      }),
      None => Ok(Self {
        application_id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        status,
        data: state.clone(),
        created_at: now,
        updated_at: now,
        submitted_at,
      }),
    }
  }
}
