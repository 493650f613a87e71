//! Error types for flow loading and wizard sessions.

use intake_config::ConfigError;
use intake_state::PathError;
use intake_store::StoreError;
use thiserror::Error;

use crate::submission::SubmissionStatus;

/// Errors that make a flow configuration unusable.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("flow '{flow_id}' has no steps")]
  Empty { flow_id: String },

  #[error("duplicate step id: {step_id}")]
  DuplicateStep { step_id: String },

  #[error("invalid condition on step '{step_id}': {message}")]
  InvalidCondition { step_id: String, message: String },

  #[error("step '{step_id}' binds an unwritable path '{path}': {source}")]
  InvalidFieldPath {
    step_id: String,
    path: String,
    #[source]
    source: PathError,
  },

  #[error("step '{step_id}' uses invalid collection '{collection}'")]
  InvalidCollection { step_id: String, collection: String },

  #[error("review step '{step_id}' links to unknown step '{target}'")]
  UnknownEditTarget { step_id: String, target: String },
}

/// An illegal submission status change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move submission from {from} to {to}")]
pub struct TransitionError {
  pub from: SubmissionStatus,
  pub to: SubmissionStatus,
}

/// Errors surfaced by a wizard session.
#[derive(Debug, Error)]
pub enum WizardError {
  /// Answers and navigation are frozen outside the idle status.
  #[error("wizard is locked while submission is {status}")]
  Locked { status: SubmissionStatus },

  #[error("invalid path: {0}")]
  Path(#[from] PathError),

  /// The submission collaborator failed. Answers are untouched and the
  /// submission may be retried.
  #[error("submission failed: {0}")]
  Submission(#[source] StoreError),

  #[error("store error: {0}")]
  Store(#[from] StoreError),

  #[error(transparent)]
  Transition(#[from] TransitionError),
}
