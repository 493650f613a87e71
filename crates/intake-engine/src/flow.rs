//! Validated flow configuration.
//!
//! A [`Flow`] is the checked form of a [`FlowDef`]: step ids are unique, every
//! condition parses, every bound path can be written, and review blocks link
//! to steps that exist. Once built it is never mutated and can be shared by
//! any number of sessions.

use std::collections::HashMap;

use intake_config::{FlowDef, StepDef, StepKind};
use intake_state::split_field_path;

use crate::condition::Conditions;
use crate::error::FlowError;

#[derive(Debug, Clone)]
pub struct Flow {
  def: FlowDef,
  /// step id -> position in the configuration.
  index: HashMap<String, usize>,
  conditions: Conditions,
}

impl Flow {
  /// Validate a flow definition.
  pub fn from_def(def: FlowDef) -> Result<Self, FlowError> {
    if def.steps.is_empty() {
      return Err(FlowError::Empty {
        flow_id: def.flow_id.clone(),
      });
    }

    let mut index = HashMap::with_capacity(def.steps.len());
    for (position, step) in def.steps.iter().enumerate() {
      if index.insert(step.id.clone(), position).is_some() {
        return Err(FlowError::DuplicateStep {
          step_id: step.id.clone(),
        });
      }
    }

    let mut conditions = Conditions::new();
    for step in &def.steps {
      if let Some(expr) = &step.condition {
        conditions
          .insert(&step.id, expr)
          .map_err(|e| FlowError::InvalidCondition {
            step_id: step.id.clone(),
            message: e.to_string(),
          })?;
      }
      validate_step(step, &index)?;
    }

    Ok(Self {
      def,
      index,
      conditions,
    })
  }

  /// Parse and validate a flow from JSON text.
  pub fn from_json_str(content: &str) -> Result<Self, FlowError> {
    Self::from_def(FlowDef::from_json_str(content)?)
  }

  pub fn flow_id(&self) -> &str {
    &self.def.flow_id
  }

  pub fn name(&self) -> &str {
    &self.def.name
  }

  /// All configured steps in authored order.
  pub fn steps(&self) -> &[StepDef] {
    &self.def.steps
  }

  pub fn step(&self, step_id: &str) -> Option<&StepDef> {
    self.position(step_id).map(|i| &self.def.steps[i])
  }

  /// Position of a step in the configuration (not in the active sequence).
  pub fn position(&self, step_id: &str) -> Option<usize> {
    self.index.get(step_id).copied()
  }

  pub fn sections(&self) -> Vec<&str> {
    self.def.sections()
  }

  /// Compiled step conditions.
  pub fn conditions(&self) -> &Conditions {
    &self.conditions
  }

  pub fn definition(&self) -> &FlowDef {
    &self.def
  }
}

fn validate_step(step: &StepDef, index: &HashMap<String, usize>) -> Result<(), FlowError> {
  let writable = |path: &str| -> Result<(), FlowError> {
    split_field_path(path)
      .map(|_| ())
      .map_err(|source| FlowError::InvalidFieldPath {
        step_id: step.id.clone(),
        path: path.to_string(),
        source,
      })
  };

  match &step.kind {
    StepKind::Form { fields } => {
      for field in fields {
        writable(&field.path)?;
      }
    }
    StepKind::Option { field, .. } => writable(field)?,
    StepKind::Essay { questions } => {
      for question in questions {
        writable(&question.path)?;
      }
    }
    StepKind::Consent { scope, items } => {
      for item in items {
        writable(&format!("{}.{}", scope, item.id))?;
      }
    }
    StepKind::Upload { slots } => {
      for slot in slots {
        writable(&format!("uploads.{}", slot.key))?;
      }
    }
    StepKind::List {
      collection, fields, ..
    } => {
      if collection.is_empty() || collection.contains('.') {
        return Err(FlowError::InvalidCollection {
          step_id: step.id.clone(),
          collection: collection.clone(),
        });
      }
      // Item fields are addressed as `<collection>.<field>` within one record.
      for field in fields {
        writable(&field.path)?;
      }
    }
    StepKind::Review { sections } => {
      for section in sections {
        if !index.contains_key(&section.edit_step) {
          return Err(FlowError::UnknownEditTarget {
            step_id: step.id.clone(),
            target: section.edit_step.clone(),
          });
        }
      }
    }
    StepKind::Intro { .. } | StepKind::Info { .. } => {}
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn flow(steps: serde_json::Value) -> Result<Flow, FlowError> {
    let def: FlowDef = serde_json::from_value(json!({
      "flow_id": "test",
      "name": "Test",
      "steps": steps
    }))
    .unwrap();
    Flow::from_def(def)
  }

  #[test]
  fn test_valid_flow() {
    let flow = flow(json!([
      { "id": "a", "section": "s1", "type": "intro", "title": "A" },
      { "id": "b", "section": "s1", "type": "form", "title": "B",
        "fields": [{ "path": "founder.email", "label": "Email", "required": true }] },
      { "id": "c", "section": "s2", "type": "review", "title": "C",
        "sections": [{ "title": "You", "edit_step": "b", "fields": ["founder.email"] }] }
    ]))
    .unwrap();

    assert_eq!(flow.flow_id(), "test");
    assert_eq!(flow.steps().len(), 3);
    assert_eq!(flow.position("c"), Some(2));
    assert_eq!(flow.step("b").map(|s| s.title.as_str()), Some("B"));
    assert_eq!(flow.sections(), vec!["s1", "s2"]);
  }

  #[test]
  fn test_empty_flow_rejected() {
    assert!(matches!(flow(json!([])), Err(FlowError::Empty { .. })));
  }

  #[test]
  fn test_duplicate_ids_rejected() {
    let result = flow(json!([
      { "id": "a", "section": "s", "type": "intro", "title": "A" },
      { "id": "a", "section": "s", "type": "info", "title": "A again" }
    ]));
    assert!(matches!(result, Err(FlowError::DuplicateStep { step_id }) if step_id == "a"));
  }

  #[test]
  fn test_bad_condition_rejected() {
    let result = flow(json!([
      { "id": "a", "section": "s", "type": "intro", "title": "A", "condition": "venture.track ==" }
    ]));
    assert!(matches!(result, Err(FlowError::InvalidCondition { .. })));
  }

  #[test]
  fn test_unwritable_paths_rejected() {
    let result = flow(json!([
      { "id": "a", "section": "s", "type": "form", "title": "A",
        "fields": [{ "path": "founder.address.city", "label": "City" }] }
    ]));
    assert!(matches!(result, Err(FlowError::InvalidFieldPath { path, .. }) if path == "founder.address.city"));

    let result = flow(json!([
      { "id": "a", "section": "s", "type": "option", "title": "A", "field": "", "choices": [] }
    ]));
    assert!(matches!(result, Err(FlowError::InvalidFieldPath { .. })));
  }

  #[test]
  fn test_nested_collection_rejected() {
    let result = flow(json!([
      { "id": "team", "section": "s", "type": "list", "title": "Team",
        "collection": "team.members", "item_label": "Member" }
    ]));
    assert!(matches!(result, Err(FlowError::InvalidCollection { .. })));

    let result = flow(json!([
      { "id": "team", "section": "s", "type": "list", "title": "Team",
        "collection": "co_founders", "item_label": "Co-founder",
        "fields": [{ "path": "co_founders.address.city", "label": "City" }] }
    ]));
    assert!(matches!(result, Err(FlowError::InvalidFieldPath { .. })));
  }

  #[test]
  fn test_review_must_link_known_step() {
    let result = flow(json!([
      { "id": "review", "section": "s", "type": "review", "title": "Review",
        "sections": [{ "title": "Gone", "edit_step": "missing" }] }
    ]));
    assert!(matches!(result, Err(FlowError::UnknownEditTarget { target, .. }) if target == "missing"));
  }

  #[test]
  fn test_from_json_str_reports_parse_errors() {
    assert!(matches!(Flow::from_json_str("[]"), Err(FlowError::Config(_))));
  }
}
