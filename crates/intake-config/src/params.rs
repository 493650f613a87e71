use serde::{Deserialize, Serialize};

/// Kind of input widget a form field renders as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
  #[default]
  Text,
  Email,
  Phone,
  Url,
  Number,
  Date,
  Textarea,
  Select,
}

/// A single input bound to a domain field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
  /// Dot-separated path into the domain state, e.g. "founder.email".
  pub path: String,
  pub label: String,
  #[serde(default)]
  pub input: InputKind,
  #[serde(default)]
  pub required: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
  /// Choices for `select` inputs.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
  pub value: String,
  pub label: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// A long-form question with optional length thresholds (in characters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayQuestion {
  pub path: String,
  pub prompt: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub min_chars: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_chars: Option<usize>,
}

/// A file slot. The uploaded file reference is stored at `uploads.<key>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSlot {
  pub key: String,
  pub label: String,
  /// Accepted extensions or mime types, e.g. ".pdf".
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub accept: Vec<String>,
}

/// A declaration the applicant must tick. Read from `<scope>.<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentItem {
  pub id: String,
  pub label: String,
}

/// A block on the review step summarising answers from an earlier step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSection {
  pub title: String,
  /// Step to jump back to when the applicant chooses to edit this block.
  pub edit_step: String,
  #[serde(default)]
  pub fields: Vec<String>,
}
