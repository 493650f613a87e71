//! Wizard events and notifiers for observability.
//!
//! Events are emitted as a session changes so consumers can re-render, persist
//! drafts, stream to a UI, etc.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted by a wizard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WizardEvent {
  /// The active step sequence was recomputed and differs from before.
  SequenceChanged { active: Vec<String> },

  /// The cursor moved (navigation or clamping).
  CursorMoved {
    from: usize,
    to: usize,
    step_id: Option<String>,
  },

  /// A jump targeted a step that is not in the active sequence.
  JumpIgnored { step_id: String },

  /// Terminal submission has started.
  SubmissionStarted { user_id: String },

  /// Terminal submission completed.
  SubmissionSucceeded {
    user_id: String,
    application_id: String,
  },

  /// Terminal submission failed; the wizard is idle again.
  SubmissionFailed { user_id: String, error: String },

  /// A draft was saved.
  DraftSaved { user_id: String },
}

/// Trait for receiving wizard events.
pub trait WizardNotifier: Send + Sync {
  fn notify(&self, event: WizardEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl WizardNotifier for NoopNotifier {
  fn notify(&self, _event: WizardEvent) {}
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<WizardEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<WizardEvent>) -> Self {
    Self { sender }
  }
}

impl WizardNotifier for ChannelNotifier {
  fn notify(&self, event: WizardEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
