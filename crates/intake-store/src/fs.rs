use std::path::{Path, PathBuf};

use async_trait::async_trait;
use intake_state::DomainState;
use tokio::fs;
use tracing::{debug, info};

use crate::types::{ApplicationRecord, ApplicationStatus};
use crate::{ApplicationStore, StoreError};

/// Filesystem-based application store.
///
/// Each user's application is kept as a single JSON document:
/// ```text
/// {root}/
/// ├── founder-42.json
/// └── ada%40example%2Ecom.json
/// ```
pub struct FsApplicationStore {
  root: PathBuf,
}

impl FsApplicationStore {
  /// Create a new filesystem store at the given root path.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Get the root directory of the store.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Map a user id to a file name that cannot escape the root.
  ///
  /// Bytes outside `[A-Za-z0-9-]` are percent-encoded, so distinct ids never
  /// share a file. Example: "ada/x" -> "ada%2Fx.json", "ada_x" -> "ada%5Fx.json"
  fn file_name(user_id: &str) -> String {
    let mut encoded = String::with_capacity(user_id.len() + 5);
    for byte in user_id.bytes() {
      if byte.is_ascii_alphanumeric() || byte == b'-' {
        encoded.push(byte as char);
      } else {
        encoded.push_str(&format!("%{:02X}", byte));
      }
    }
    encoded.push_str(".json");
    encoded
  }

  fn record_path(&self, user_id: &str) -> PathBuf {
    self.root.join(Self::file_name(user_id))
  }

  async fn read_record(&self, user_id: &str) -> Result<Option<ApplicationRecord>, StoreError> {
    let path = self.record_path(user_id);
    match fs::read_to_string(&path).await {
      Ok(content) => {
        let record: ApplicationRecord = serde_json::from_str(&content)?;
        if record.user_id != user_id {
          return Err(StoreError::ForeignRecord {
            requested: user_id.to_string(),
            found: record.user_id,
          });
        }
        Ok(Some(record))
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  /// Write through a temp file so a crash never leaves a half-written record.
  async fn write_record(&self, record: &ApplicationRecord) -> Result<(), StoreError> {
    fs::create_dir_all(&self.root).await?;

    let path = self.record_path(&record.user_id);
    let tmp_path = path.with_extension("json.tmp");
    let content = serde_json::to_vec_pretty(record)?;

    fs::write(&tmp_path, content).await?;
    fs::rename(&tmp_path, &path).await?;
    Ok(())
  }
}

#[async_trait]
impl ApplicationStore for FsApplicationStore {
  async fn submit_application(
    &self,
    user_id: &str,
    state: &DomainState,
    status: ApplicationStatus,
  ) -> Result<ApplicationRecord, StoreError> {
    let existing = self.read_record(user_id).await?;
    let record = ApplicationRecord::upsert(existing, user_id, state, status)?;
    self.write_record(&record).await?;

    match status {
      ApplicationStatus::Submitted => info!(
        user_id = %user_id,
        application_id = %record.application_id,
        "application_submitted"
      ),
      ApplicationStatus::Draft => debug!(
        user_id = %user_id,
        application_id = %record.application_id,
        "draft_saved"
      ),
    }

    Ok(record)
  }

  async fn get_application(&self, user_id: &str) -> Result<Option<ApplicationRecord>, StoreError> {
    self.read_record(user_id).await
  }
}
