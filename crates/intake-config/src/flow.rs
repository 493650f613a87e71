use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::step::StepDef;

/// An authored flow: the full ordered list of steps for one application track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDef {
  pub flow_id: String,
  pub name: String,
  pub steps: Vec<StepDef>,
}

impl FlowDef {
  /// Parse a flow definition from JSON text.
  pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
    Ok(serde_json::from_str(content)?)
  }

  /// Section ids in order of first appearance.
  pub fn sections(&self) -> Vec<&str> {
    let mut sections: Vec<&str> = Vec::new();
    for step in &self.steps {
      if !sections.contains(&step.section.as_str()) {
        sections.push(&step.section);
      }
    }
    sections
  }

  pub fn get_step(&self, step_id: &str) -> Option<&StepDef> {
    self.steps.iter().find(|s| s.id == step_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const FLOW: &str = r#"{
    "flow_id": "demo",
    "name": "Demo",
    "steps": [
      { "id": "welcome", "section": "start", "type": "intro", "title": "Hi" },
      { "id": "profile", "section": "about", "type": "form", "title": "You", "fields": [] },
      { "id": "more", "section": "start", "type": "info", "title": "More" },
      { "id": "done", "section": "finish", "type": "review", "title": "Review" }
    ]
  }"#;

  #[test]
  fn test_from_json_str() {
    let flow = FlowDef::from_json_str(FLOW).unwrap();
    assert_eq!(flow.flow_id, "demo");
    assert_eq!(flow.steps.len(), 4);
    assert_eq!(flow.get_step("profile").map(|s| s.type_name()), Some("form"));
    assert!(flow.get_step("missing").is_none());
  }

  #[test]
  fn test_sections_in_first_appearance_order() {
    let flow = FlowDef::from_json_str(FLOW).unwrap();
    assert_eq!(flow.sections(), vec!["start", "about", "finish"]);
  }

  #[test]
  fn test_invalid_json_is_a_parse_error() {
    let err = FlowDef::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
  }
}
