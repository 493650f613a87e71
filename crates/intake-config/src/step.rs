use serde::{Deserialize, Serialize};

use crate::params::{
  ConsentItem, EssayQuestion, FormField, OptionChoice, ReviewSection, UploadSlot,
};

/// One screen of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDef {
  /// Stable identity, referenced by jump-to-step requests and review blocks.
  pub id: String,
  /// Section used for local progress. Sections are ordered by first appearance.
  pub section: String,
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subtitle: Option<String>,
  /// Inclusion predicate as a minijinja expression over the whole domain state.
  /// Absent means the step is always included.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition: Option<String>,
  #[serde(flatten)]
  pub kind: StepKind,
}

impl StepDef {
  /// The step's type tag as written in configuration.
  pub fn type_name(&self) -> &'static str {
    self.kind.type_name()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
  Intro {
    #[serde(default)]
    body: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cta: Option<String>,
  },
  Form {
    fields: Vec<FormField>,
  },
  /// A choice bound to a single domain field.
  Option {
    /// Path the selection is written to.
    field: String,
    /// When set, the bound field holds an array of selected values.
    #[serde(default)]
    multiple: bool,
    choices: Vec<OptionChoice>,
  },
  Essay {
    questions: Vec<EssayQuestion>,
  },
  /// Repeatable records kept in a top-level collection (e.g. co-founders).
  List {
    collection: String,
    item_label: String,
    #[serde(default)]
    fields: Vec<FormField>,
  },
  Upload {
    slots: Vec<UploadSlot>,
  },
  Info {
    #[serde(default)]
    body: Vec<String>,
  },
  Review {
    #[serde(default)]
    sections: Vec<ReviewSection>,
  },
  Consent {
    #[serde(default = "default_consent_scope")]
    scope: String,
    items: Vec<ConsentItem>,
  },
}

fn default_consent_scope() -> String {
  "declarations".to_string()
}

impl StepKind {
  pub fn type_name(&self) -> &'static str {
    match self {
      StepKind::Intro { .. } => "intro",
      StepKind::Form { .. } => "form",
      StepKind::Option { .. } => "option",
      StepKind::Essay { .. } => "essay",
      StepKind::List { .. } => "list",
      StepKind::Upload { .. } => "upload",
      StepKind::Info { .. } => "info",
      StepKind::Review { .. } => "review",
      StepKind::Consent { .. } => "consent",
    }
  }

  /// Whether the step collects answers that count towards global progress.
  pub fn collects_answers(&self) -> bool {
    matches!(
      self,
      StepKind::Form { .. } | StepKind::Option { .. } | StepKind::Essay { .. } | StepKind::Consent { .. }
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_parse_form_step() {
    let step: StepDef = serde_json::from_value(json!({
      "id": "founder_profile",
      "section": "about_you",
      "type": "form",
      "title": "About you",
      "fields": [
        { "path": "founder.email", "label": "Email", "input": "email", "required": true },
        { "path": "founder.phone", "label": "Phone" }
      ]
    }))
    .unwrap();

    assert_eq!(step.type_name(), "form");
    assert!(step.condition.is_none());
    match step.kind {
      StepKind::Form { fields } => {
        assert_eq!(fields.len(), 2);
        assert!(fields[0].required);
        assert!(!fields[1].required);
        assert_eq!(fields[1].input, crate::InputKind::Text);
      }
      other => panic!("expected form, got {:?}", other),
    }
  }

  #[test]
  fn test_parse_conditional_option_step() {
    let step: StepDef = serde_json::from_value(json!({
      "id": "startup_stage",
      "section": "venture",
      "type": "option",
      "title": "Stage",
      "condition": "venture.track == 'startup'",
      "field": "venture.stage",
      "choices": [{ "value": "idea", "label": "Idea" }]
    }))
    .unwrap();

    assert_eq!(step.condition.as_deref(), Some("venture.track == 'startup'"));
    assert!(matches!(step.kind, StepKind::Option { multiple: false, .. }));
  }

  #[test]
  fn test_consent_scope_defaults_to_declarations() {
    let step: StepDef = serde_json::from_value(json!({
      "id": "declarations",
      "section": "submit",
      "type": "consent",
      "title": "Declarations",
      "items": [{ "id": "accurate", "label": "The information is accurate" }]
    }))
    .unwrap();

    match step.kind {
      StepKind::Consent { scope, items } => {
        assert_eq!(scope, "declarations");
        assert_eq!(items[0].id, "accurate");
      }
      other => panic!("expected consent, got {:?}", other),
    }
  }

  #[test]
  fn test_unknown_type_is_rejected() {
    let result: Result<StepDef, _> = serde_json::from_value(json!({
      "id": "x",
      "section": "s",
      "type": "carousel",
      "title": "X"
    }));
    assert!(result.is_err());
  }

  #[test]
  fn test_serialize_keeps_type_tag() {
    let step = StepDef {
      id: "welcome".to_string(),
      section: "intro".to_string(),
      title: "Welcome".to_string(),
      subtitle: None,
      condition: None,
      kind: StepKind::Info { body: vec![] },
    };
    let value = serde_json::to_value(&step).unwrap();
    assert_eq!(value["type"], "info");
    assert!(value.get("condition").is_none());
  }
}
