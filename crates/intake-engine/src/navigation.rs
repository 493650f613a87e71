//! Cursor over the active step sequence.
//!
//! The navigator knows nothing about validation or submission. Whoever drives
//! it decides whether a move is allowed; it only keeps the cursor inside the
//! sequence.

use intake_config::StepDef;

/// Outcome of a forward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forward {
  Moved { from: usize, to: usize },
  /// The cursor is on the last step; the caller should submit instead.
  Terminal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
  cursor: usize,
}

impl Navigator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn forward(&mut self, len: usize) -> Forward {
    if self.cursor + 1 < len {
      let from = self.cursor;
      self.cursor += 1;
      Forward::Moved {
        from,
        to: self.cursor,
      }
    } else {
      Forward::Terminal
    }
  }

  /// Step back one position. Returns false at the first step.
  pub fn backward(&mut self) -> bool {
    if self.cursor == 0 {
      return false;
    }
    self.cursor -= 1;
    true
  }

  /// Move to the step with `step_id` if it is in `active`.
  ///
  /// Returns the new cursor, or `None` (cursor unchanged) when the step is not
  /// part of the active sequence.
  pub fn jump_to(&mut self, active: &[&StepDef], step_id: &str) -> Option<usize> {
    let index = active.iter().position(|s| s.id == step_id)?;
    self.cursor = index;
    Some(index)
  }

  /// Clamp the cursor after the active sequence changed length.
  /// Returns true when the cursor moved.
  pub fn reclamp(&mut self, len: usize) -> bool {
    let clamped = self.cursor.min(len.saturating_sub(1));
    let moved = clamped != self.cursor;
    self.cursor = clamped;
    moved
  }
}
