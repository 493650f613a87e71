//! Validation gate for forward navigation.
//!
//! | type                                    | rule                                            |
//! |-----------------------------------------|-------------------------------------------------|
//! | intro, info, list, upload, review       | always passes                                   |
//! | form                                    | every required field is non-blank               |
//! | essay                                   | every `min_chars` threshold is met              |
//! | option                                  | bound field is non-blank (non-empty list when `multiple`) |
//! | consent                                 | every `<scope>.<id>` is literally `true`        |
//!
//! A failed gate is the normal "next is disabled" condition, not an error.

use intake_config::{StepDef, StepKind};
use intake_state::{DomainState, is_blank, is_checked, text_len};
use serde::Serialize;

/// A reason the current step cannot be left yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unmet {
  Required { path: String },
  TooShort { path: String, min: usize, actual: usize },
  NoSelection { path: String },
  NotAccepted { path: String },
}

/// Every rule the step currently fails, in configuration order.
pub fn unmet(step: &StepDef, state: &DomainState) -> Vec<Unmet> {
  match &step.kind {
    StepKind::Intro { .. }
    | StepKind::Info { .. }
    | StepKind::List { .. }
    | StepKind::Upload { .. }
    | StepKind::Review { .. } => Vec::new(),

    StepKind::Form { fields } => fields
      .iter()
      .filter(|f| f.required && is_blank(state.get(&f.path)))
      .map(|f| Unmet::Required {
        path: f.path.clone(),
      })
      .collect(),

    StepKind::Essay { questions } => questions
      .iter()
      .filter_map(|q| {
        let min = q.min_chars?;
        let actual = text_len(state.get(&q.path));
        (actual < min).then(|| Unmet::TooShort {
          path: q.path.clone(),
          min,
          actual,
        })
      })
      .collect(),

    StepKind::Option {
      field, multiple, ..
    } => {
      let value = state.get(field);
      let selected = if *multiple {
        value.as_array().is_some_and(|items| !items.is_empty())
      } else {
        !is_blank(value)
      };
      if selected {
        Vec::new()
      } else {
        vec![Unmet::NoSelection {
          path: field.clone(),
        }]
      }
    }

    StepKind::Consent { scope, items } => items
      .iter()
      .map(|item| format!("{}.{}", scope, item.id))
      .filter(|path| !is_checked(state.get(path)))
      .map(|path| Unmet::NotAccepted { path })
      .collect(),
  }
}

/// Whether forward navigation from `step` is permitted.
pub fn can_advance(step: &StepDef, state: &DomainState) -> bool {
  unmet(step, state).is_empty()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn step(value: serde_json::Value) -> StepDef {
    serde_json::from_value(value).unwrap()
  }

  fn state(value: serde_json::Value) -> DomainState {
    DomainState::from_value(value).unwrap()
  }

  fn founder_form() -> StepDef {
    step(json!({
      "id": "founder_profile", "section": "about", "type": "form", "title": "You",
      "fields": [
        { "path": "founder.name", "label": "Name", "required": true },
        { "path": "founder.email", "label": "Email", "input": "email", "required": true },
        { "path": "founder.phone", "label": "Phone" }
      ]
    }))
  }

  #[test]
  fn test_informational_steps_always_pass() {
    let empty = DomainState::new();
    for kind in ["intro", "info", "review"] {
      let s = step(json!({ "id": kind, "section": "s", "type": kind, "title": "T" }));
      assert!(can_advance(&s, &empty), "{kind} should pass");
    }
    let list = step(json!({
      "id": "team", "section": "s", "type": "list", "title": "T",
      "collection": "co_founders", "item_label": "Co-founder"
    }));
    assert!(can_advance(&list, &empty));
    let upload = step(json!({
      "id": "docs", "section": "s", "type": "upload", "title": "T",
      "slots": [{ "key": "pitch_deck", "label": "Pitch deck" }]
    }));
    assert!(can_advance(&upload, &empty));
  }

  #[test]
  fn test_form_requires_required_fields_only() {
    let form = founder_form();
    let mut s = state(json!({ "founder": { "name": "Ada" } }));

    assert!(!can_advance(&form, &s));
    assert_eq!(
      unmet(&form, &s),
      vec![Unmet::Required {
        path: "founder.email".to_string()
      }]
    );

    s.set("founder.email", json!("ada@example.com")).unwrap();
    assert!(can_advance(&form, &s));
  }

  #[test]
  fn test_form_any_non_empty_string_passes() {
    let form = founder_form();
    let mut s = state(json!({ "founder": { "name": "Ada", "email": "" } }));
    assert!(!can_advance(&form, &s));
    s.set("founder.email", json!("x")).unwrap();
    assert!(can_advance(&form, &s));
  }

  #[test]
  fn test_essay_min_chars_boundary() {
    let essay = step(json!({
      "id": "problem", "section": "venture", "type": "essay", "title": "Problem",
      "questions": [
        { "path": "venture.problemStatement", "prompt": "What problem?", "min_chars": 50 },
        { "path": "venture.notes", "prompt": "Anything else?" }
      ]
    }));

    let s = state(json!({ "venture": { "problemStatement": "a".repeat(49) } }));
    assert!(!can_advance(&essay, &s));
    assert_eq!(
      unmet(&essay, &s),
      vec![Unmet::TooShort {
        path: "venture.problemStatement".to_string(),
        min: 50,
        actual: 49
      }]
    );

    let s = state(json!({ "venture": { "problemStatement": "a".repeat(50) } }));
    assert!(can_advance(&essay, &s));
  }

  #[test]
  fn test_single_option_needs_a_value() {
    let option = step(json!({
      "id": "track", "section": "venture", "type": "option", "title": "Track",
      "field": "venture.track",
      "choices": [{ "value": "startup", "label": "Startup" }]
    }));

    assert!(!can_advance(&option, &DomainState::new()));
    assert!(can_advance(&option, &state(json!({ "venture": { "track": "startup" } }))));
  }

  #[test]
  fn test_multi_option_needs_non_empty_list() {
    let option = step(json!({
      "id": "sectors", "section": "venture", "type": "option", "title": "Sectors",
      "field": "venture.sectors", "multiple": true,
      "choices": [{ "value": "ai", "label": "AI" }]
    }));

    assert!(!can_advance(&option, &state(json!({ "venture": { "sectors": [] } }))));
    assert!(!can_advance(&option, &state(json!({ "venture": { "sectors": "ai" } }))));
    assert!(can_advance(&option, &state(json!({ "venture": { "sectors": ["ai"] } }))));
  }

  #[test]
  fn test_consent_requires_literal_true() {
    let consent = step(json!({
      "id": "declarations", "section": "submit", "type": "consent", "title": "Declarations",
      "items": [
        { "id": "accurate", "label": "Accurate" },
        { "id": "terms", "label": "Terms" }
      ]
    }));

    let s = state(json!({ "declarations": { "accurate": true, "terms": "true" } }));
    assert_eq!(
      unmet(&consent, &s),
      vec![Unmet::NotAccepted {
        path: "declarations.terms".to_string()
      }]
    );

    let s = state(json!({ "declarations": { "accurate": true, "terms": true } }));
    assert!(can_advance(&consent, &s));
  }
}
