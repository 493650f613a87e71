//! The wizard session.
//!
//! A [`Wizard`] ties one applicant's answers to a [`Flow`]. It is the only
//! thing that mutates the domain state, and every mutation goes through
//! [`Wizard::refresh`] so the active sequence, cursor and gate never drift
//! apart.

use std::sync::Arc;

use intake_config::StepDef;
use intake_state::DomainState;
use intake_store::{ApplicationRecord, ApplicationStatus, ApplicationStore, StoreError};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::WizardError;
use crate::events::{NoopNotifier, WizardEvent, WizardNotifier};
use crate::flow::Flow;
use crate::gate::{self, Unmet};
use crate::navigation::{Forward, Navigator};
use crate::progress::{self, GlobalProgress};
use crate::resolver;
use crate::submission::{SubmissionMachine, SubmissionStatus};

/// Result of a forward request.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
  /// The cursor moved to the next active step.
  Moved {
    from: usize,
    to: usize,
    step_id: String,
  },
  /// The current step's validation gate is not met.
  Blocked,
  /// The terminal step was confirmed and the application submitted.
  Submitted(ApplicationRecord),
}

/// Serializable snapshot of a session for renderers.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
  pub flow_id: String,
  pub user_id: String,
  pub cursor: usize,
  pub active: Vec<String>,
  pub step: Option<StepDef>,
  pub can_advance: bool,
  pub unmet: Vec<Unmet>,
  pub local_progress: f64,
  pub global_progress: GlobalProgress,
  pub global_percent: f64,
  pub status: SubmissionStatus,
  pub last_error: Option<String>,
  pub state: DomainState,
}

/// Load the answers saved for `user_id`, or an empty state for a new applicant.
pub async fn hydrate<S: ApplicationStore + ?Sized>(
  store: &S,
  user_id: &str,
) -> Result<DomainState, StoreError> {
  Ok(store.load_draft(user_id).await?.unwrap_or_default())
}

/// One applicant's pass through a flow.
pub struct Wizard<S, N = NoopNotifier> {
  flow: Arc<Flow>,
  state: DomainState,
  /// Positions in `flow.steps()` of the active steps.
  active: Vec<usize>,
  navigator: Navigator,
  submission: SubmissionMachine,
  user_id: String,
  store: S,
  notifier: N,
}

impl<S: ApplicationStore> Wizard<S, NoopNotifier> {
  pub fn new(
    flow: impl Into<Arc<Flow>>,
    state: DomainState,
    user_id: impl Into<String>,
    store: S,
  ) -> Self {
    Self::with_notifier(flow, state, user_id, store, NoopNotifier)
  }

  /// Start a session from whatever the store holds for `user_id`.
  pub async fn resume(
    flow: impl Into<Arc<Flow>>,
    user_id: impl Into<String>,
    store: S,
  ) -> Result<Self, WizardError> {
    Self::resume_with_notifier(flow, user_id, store, NoopNotifier).await
  }
}

impl<S: ApplicationStore, N: WizardNotifier> Wizard<S, N> {
  pub fn with_notifier(
    flow: impl Into<Arc<Flow>>,
    state: DomainState,
    user_id: impl Into<String>,
    store: S,
    notifier: N,
  ) -> Self {
    let mut wizard = Self {
      flow: flow.into(),
      state,
      active: Vec::new(),
      navigator: Navigator::new(),
      submission: SubmissionMachine::new(),
      user_id: user_id.into(),
      store,
      notifier,
    };
    wizard.refresh();
    wizard
  }

  /// Like [`Wizard::resume`], reporting to `notifier`.
  ///
  /// A previously submitted application resumes locked in the succeeded
  /// status.
  pub async fn resume_with_notifier(
    flow: impl Into<Arc<Flow>>,
    user_id: impl Into<String>,
    store: S,
    notifier: N,
  ) -> Result<Self, WizardError> {
    let user_id = user_id.into();
    let record = store.get_application(&user_id).await?;

    let (state, submitted) = match record {
      Some(record) => (record.data, record.status == ApplicationStatus::Submitted),
      None => (DomainState::new(), false),
    };
    info!(user_id = %user_id, submitted, "resuming application");

    let mut wizard = Self::with_notifier(flow, state, user_id, store, notifier);
    if submitted {
      wizard.submission = SubmissionMachine::finished();
    }
    Ok(wizard)
  }

  pub fn flow(&self) -> &Flow {
    &self.flow
  }

  pub fn user_id(&self) -> &str {
    &self.user_id
  }

  pub fn state(&self) -> &DomainState {
    &self.state
  }

  pub fn into_state(self) -> DomainState {
    self.state
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn cursor(&self) -> usize {
    self.navigator.cursor()
  }

  pub fn active_steps(&self) -> Vec<&StepDef> {
    let steps = self.flow.steps();
    self.active.iter().map(|&position| &steps[position]).collect()
  }

  /// The step under the cursor. `None` only when no step is active.
  pub fn current_step(&self) -> Option<&StepDef> {
    self
      .active
      .get(self.navigator.cursor())
      .map(|&position| &self.flow.steps()[position])
  }

  pub fn status(&self) -> SubmissionStatus {
    self.submission.status()
  }

  pub fn last_error(&self) -> Option<&str> {
    self.submission.last_error()
  }

  /// Whether the next control is enabled for the current step.
  pub fn can_advance(&self) -> bool {
    self.submission.status() == SubmissionStatus::Idle
      && self
        .current_step()
        .is_some_and(|step| gate::can_advance(step, &self.state))
  }

  pub fn unmet(&self) -> Vec<Unmet> {
    self
      .current_step()
      .map(|step| gate::unmet(step, &self.state))
      .unwrap_or_default()
  }

  pub fn local_progress(&self) -> f64 {
    match self.current_step() {
      Some(step) => progress::local_progress(&self.active_steps(), step),
      None => 0.0,
    }
  }

  pub fn global_progress(&self) -> GlobalProgress {
    progress::global_progress(&self.active_steps(), &self.state)
  }

  pub fn view(&self) -> WizardView {
    let global_progress = self.global_progress();
    WizardView {
      flow_id: self.flow.flow_id().to_string(),
      user_id: self.user_id.clone(),
      cursor: self.cursor(),
      active: self.active_ids(),
      step: self.current_step().cloned(),
      can_advance: self.can_advance(),
      unmet: self.unmet(),
      local_progress: self.local_progress(),
      global_progress,
      global_percent: global_progress.percent(),
      status: self.status(),
      last_error: self.last_error().map(str::to_string),
      state: self.state.clone(),
    }
  }

  /// Write a two-segment `domain.field` answer.
  pub fn set_field(&mut self, path: &str, value: impl Into<Value>) -> Result<(), WizardError> {
    self.ensure_editable()?;
    if let Err(e) = self.state.set(path, value.into()) {
      warn!(path, error = %e, "rejected field write");
      return Err(e.into());
    }
    self.refresh();
    Ok(())
  }

  /// Append a record to a top-level collection. Returns its index.
  pub fn push_item(&mut self, collection: &str, item: impl Into<Value>) -> Result<usize, WizardError> {
    self.ensure_editable()?;
    let index = self.state.push_item(collection, item.into()).map_err(|e| {
      warn!(collection, error = %e, "rejected collection append");
      e
    })?;
    self.refresh();
    Ok(index)
  }

  /// Remove a record from a top-level collection and return it.
  pub fn remove_item(&mut self, collection: &str, index: usize) -> Result<Value, WizardError> {
    self.ensure_editable()?;
    let item = self.state.remove_item(collection, index).map_err(|e| {
      warn!(collection, index, error = %e, "rejected collection removal");
      e
    })?;
    self.refresh();
    Ok(item)
  }

  /// Move to the previous active step. Returns false at the first step or
  /// while a submission is in progress or finished.
  pub fn back(&mut self) -> bool {
    if self.submission.status() != SubmissionStatus::Idle {
      return false;
    }
    let from = self.navigator.cursor();
    let moved = self.navigator.backward();
    if moved {
      self.notify_moved(from);
    }
    moved
  }

  /// Move directly to an active step, e.g. from a review block's edit link.
  ///
  /// Unknown or currently inactive ids leave the cursor where it is.
  pub fn jump_to(&mut self, step_id: &str) -> bool {
    if self.submission.status() != SubmissionStatus::Idle {
      return false;
    }
    let from = self.navigator.cursor();
    let steps = self.flow.steps();
    let active: Vec<&StepDef> = self.active.iter().map(|&p| &steps[p]).collect();

    match self.navigator.jump_to(&active, step_id) {
      Some(_) => {
        self.notify_moved(from);
        true
      }
      None => {
        warn!(step_id, "jump target is not an active step, ignoring");
        self.notifier.notify(WizardEvent::JumpIgnored {
          step_id: step_id.to_string(),
        });
        false
      }
    }
  }

  /// Confirm the current step.
  ///
  /// On the last active step this submits the application exactly once. A
  /// failed submission leaves the answers untouched and can be retried.
  pub async fn forward(&mut self) -> Result<Advance, WizardError> {
    self.ensure_editable()?;

    let Some(step) = self.current_step() else {
      return Ok(Advance::Blocked);
    };
    if !gate::can_advance(step, &self.state) {
      debug!(step_id = %step.id, "forward blocked by validation gate");
      return Ok(Advance::Blocked);
    }

    match self.navigator.forward(self.active.len()) {
      Forward::Moved { from, to } => {
        let step_id = self
          .step_id_at(to)
          .map(str::to_string)
          .unwrap_or_default();
        self.notify_moved(from);
        Ok(Advance::Moved { from, to, step_id })
      }
      Forward::Terminal => self.submit().await.map(Advance::Submitted),
    }
  }

  /// Persist the current answers as a draft.
  pub async fn save_draft(&self) -> Result<ApplicationRecord, WizardError> {
    self.ensure_editable()?;
    let record = self
      .store
      .submit_application(&self.user_id, &self.state, ApplicationStatus::Draft)
      .await?;

    debug!(
      user_id = %self.user_id,
      application_id = %record.application_id,
      "draft saved"
    );
    self.notifier.notify(WizardEvent::DraftSaved {
      user_id: self.user_id.clone(),
    });
    Ok(record)
  }

  async fn submit(&mut self) -> Result<ApplicationRecord, WizardError> {
    self.submission.begin()?;
    info!(
      user_id = %self.user_id,
      flow_id = %self.flow.flow_id(),
      attempt = self.submission.attempts(),
      "submitting application"
    );
    self.notifier.notify(WizardEvent::SubmissionStarted {
      user_id: self.user_id.clone(),
    });

    let guard = InFlight {
      submission: &mut self.submission,
      notifier: &self.notifier,
      user_id: &self.user_id,
      armed: true,
    };
    let result = self
      .store
      .submit_application(&self.user_id, &self.state, ApplicationStatus::Submitted)
      .await;
    guard.disarm();

    match result {
      Ok(record) => {
        self.submission.succeed()?;
        info!(
          user_id = %self.user_id,
          application_id = %record.application_id,
          "application submitted"
        );
        self.notifier.notify(WizardEvent::SubmissionSucceeded {
          user_id: self.user_id.clone(),
          application_id: record.application_id.to_string(),
        });
        Ok(record)
      }
      Err(e) => {
        let message = e.to_string();
        self.submission.fail(message.clone())?;
        warn!(user_id = %self.user_id, error = %message, "application submission failed");
        self.notifier.notify(WizardEvent::SubmissionFailed {
          user_id: self.user_id.clone(),
          error: message,
        });
        Err(WizardError::Submission(e))
      }
    }
  }

  fn ensure_editable(&self) -> Result<(), WizardError> {
    match self.submission.status() {
      SubmissionStatus::Idle => Ok(()),
      status => Err(WizardError::Locked { status }),
    }
  }

  /// Re-resolve the active sequence and clamp the cursor into it.
  ///
  /// The cursor counts as moved when its index changes or when a different
  /// step now sits under the same index.
  fn refresh(&mut self) {
    let under_cursor = self.step_id_at(self.navigator.cursor()).map(str::to_string);
    let active = resolver::resolve_positions(&self.flow, &self.state);
    if active != self.active {
      self.active = active;
      debug!(active = ?self.active_ids(), "active sequence changed");
      self.notifier.notify(WizardEvent::SequenceChanged {
        active: self.active_ids(),
      });
    }

    let from = self.navigator.cursor();
    if self.navigator.reclamp(self.active.len()) {
      debug!(from, to = self.navigator.cursor(), "cursor reclamped");
      self.notify_moved(from);
    } else if self.step_id_at(from) != under_cursor.as_deref() {
      debug!(cursor = from, step_id = ?self.step_id_at(from), "step under cursor changed");
      self.notify_moved(from);
    }
  }

  fn active_ids(&self) -> Vec<String> {
    self.active_steps().iter().map(|s| s.id.clone()).collect()
  }

  fn step_id_at(&self, index: usize) -> Option<&str> {
    self
      .active
      .get(index)
      .map(|&position| self.flow.steps()[position].id.as_str())
  }

  fn notify_moved(&self, from: usize) {
    let to = self.navigator.cursor();
    self.notifier.notify(WizardEvent::CursorMoved {
      from,
      to,
      step_id: self.step_id_at(to).map(str::to_string),
    });
  }
}

const INTERRUPTED: &str = "submission interrupted";

/// Keeps a submission retryable when the `forward` future is dropped while
/// the store call is in flight.
struct InFlight<'a, N: WizardNotifier> {
  submission: &'a mut SubmissionMachine,
  notifier: &'a N,
  user_id: &'a str,
  armed: bool,
}

impl<N: WizardNotifier> InFlight<'_, N> {
  fn disarm(mut self) {
    self.armed = false;
  }
}

impl<N: WizardNotifier> Drop for InFlight<'_, N> {
  fn drop(&mut self) {
    if !self.armed {
      return;
    }
    if let Err(e) = self.submission.fail(INTERRUPTED.to_string()) {
      warn!(user_id = %self.user_id, error = %e, "could not reset interrupted submission");
      return;
    }
    warn!(user_id = %self.user_id, "application submission interrupted");
    self.notifier.notify(WizardEvent::SubmissionFailed {
      user_id: self.user_id.to_string(),
      error: INTERRUPTED.to_string(),
    });
  }
}
