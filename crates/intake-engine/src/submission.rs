use std::fmt;

use serde::Serialize;

use crate::error::TransitionError;

/// Status of the terminal submission.
///
/// The valid transitions are:
/// - `Idle` -> `Submitting`
/// - `Submitting` -> `Succeeded`
/// - `Submitting` -> `Failed` -> `Idle`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
  #[default]
  Idle,
  Submitting,
  Succeeded,
  Failed,
}

impl fmt::Display for SubmissionStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      SubmissionStatus::Idle => "idle",
      SubmissionStatus::Submitting => "submitting",
      SubmissionStatus::Succeeded => "succeeded",
      SubmissionStatus::Failed => "failed",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionMachine {
  status: SubmissionStatus,
  last_error: Option<String>,
  attempts: u32,
}

impl SubmissionMachine {
  pub fn new() -> Self {
    Self::default()
  }

  /// A machine for an application that was submitted in an earlier session.
  pub(crate) fn finished() -> Self {
    Self {
      status: SubmissionStatus::Succeeded,
      ..Self::default()
    }
  }

  pub fn status(&self) -> SubmissionStatus {
    self.status
  }

  /// Message of the most recent failed attempt, cleared on the next attempt.
  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_deref()
  }

  pub fn attempts(&self) -> u32 {
    self.attempts
  }

  pub fn begin(&mut self) -> Result<(), TransitionError> {
    self.transition(SubmissionStatus::Idle, SubmissionStatus::Submitting)?;
    self.attempts += 1;
    self.last_error = None;
    Ok(())
  }

  pub fn succeed(&mut self) -> Result<(), TransitionError> {
    self.transition(SubmissionStatus::Submitting, SubmissionStatus::Succeeded)
  }

  /// Record a failure and return to `Idle` so the submission can be retried.
  pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
    self.transition(SubmissionStatus::Submitting, SubmissionStatus::Failed)?;
    self.last_error = Some(message.into());
    self.status = SubmissionStatus::Idle;
    Ok(())
  }

  fn transition(&mut self, from: SubmissionStatus, to: SubmissionStatus) -> Result<(), TransitionError> {
    if self.status != from {
      return Err(TransitionError {
        from: self.status,
        to,
      });
    }
    self.status = to;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_success_path() {
    let mut machine = SubmissionMachine::new();
    assert_eq!(machine.status(), SubmissionStatus::Idle);

    machine.begin().unwrap();
    assert_eq!(machine.status(), SubmissionStatus::Submitting);

    machine.succeed().unwrap();
    assert_eq!(machine.status(), SubmissionStatus::Succeeded);
    assert_eq!(machine.attempts(), 1);
  }

  #[test]
  fn test_failure_returns_to_idle_and_allows_retry() {
    let mut machine = SubmissionMachine::new();
    machine.begin().unwrap();
    machine.fail("network down").unwrap();

    assert_eq!(machine.status(), SubmissionStatus::Idle);
    assert_eq!(machine.last_error(), Some("network down"));

    machine.begin().unwrap();
    assert_eq!(machine.last_error(), None);
    machine.succeed().unwrap();
    assert_eq!(machine.attempts(), 2);
  }

  #[test]
  fn test_invalid_transitions() {
    let mut machine = SubmissionMachine::new();
    assert_eq!(
      machine.succeed(),
      Err(TransitionError {
        from: SubmissionStatus::Idle,
        to: SubmissionStatus::Succeeded
      })
    );
    assert!(machine.fail("x").is_err());

    machine.begin().unwrap();
    assert!(machine.begin().is_err());

    machine.succeed().unwrap();
    assert!(machine.begin().is_err());
    assert_eq!(machine.status(), SubmissionStatus::Succeeded);
  }
}
