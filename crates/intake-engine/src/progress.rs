//! Progress indicators.
//!
//! Local progress is the position of the current step within its own section
//! of the active sequence. Global progress counts answered question steps
//! across the whole active sequence and is independent of the cursor.

use intake_config::StepDef;
use intake_state::DomainState;
use serde::Serialize;

use crate::gate;

/// Percentage (0..=100) of the current step's section reached at `current`.
///
/// Returns 0 when `current` is not part of `active`.
pub fn local_progress(active: &[&StepDef], current: &StepDef) -> f64 {
  let section: Vec<&StepDef> = active
    .iter()
    .copied()
    .filter(|s| s.section == current.section)
    .collect();

  match section.iter().position(|s| s.id == current.id) {
    Some(position) => (position + 1) as f64 / section.len() as f64 * 100.0,
    None => 0.0,
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlobalProgress {
  pub answered: usize,
  pub total: usize,
}

impl GlobalProgress {
  pub fn percent(&self) -> f64 {
    if self.total == 0 {
      return 100.0;
    }
    self.answered as f64 / self.total as f64 * 100.0
  }
}

/// Answered vs. total question steps (form, option, essay, consent).
pub fn global_progress(active: &[&StepDef], state: &DomainState) -> GlobalProgress {
  let questions = active.iter().filter(|s| s.kind.collects_answers());
  let (answered, total) = questions.fold((0, 0), |(answered, total), step| {
    let done = gate::can_advance(step, state) as usize;
    (answered + done, total + 1)
  });
  GlobalProgress { answered, total }
}
