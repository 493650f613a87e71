use thiserror::Error;

/// Errors raised when a path cannot be read or written as requested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
  #[error("path is empty")]
  Empty,

  #[error("path '{path}' has an empty segment")]
  EmptySegment { path: String },

  /// Writes only support `domain.field`.
  #[error("path '{path}' has {depth} segment(s), expected 'domain.field'")]
  UnsupportedDepth { path: String, depth: usize },

  #[error("domain '{domain}' is not an object")]
  NotAnObject { domain: String },

  #[error("'{collection}' is not a list")]
  NotAList { collection: String },

  #[error("index {index} out of range for '{collection}' with {len} item(s)")]
  IndexOutOfRange {
    collection: String,
    index: usize,
    len: usize,
  },

  #[error("domain state must be a JSON object")]
  NotARecord,
}
