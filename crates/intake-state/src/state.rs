use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PathError;
use crate::path::{lookup, split_field_path};

static EMPTY: Value = Value::String(String::new());

/// All applicant answers, grouped into top-level domains
/// (`founder`, `venture`, `co_founders`, `uploads`, `declarations`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainState(Map<String, Value>);

impl DomainState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Wrap a JSON value. Only objects are valid domain states.
  pub fn from_value(value: Value) -> Result<Self, PathError> {
    match value {
      Value::Object(map) => Ok(Self(map)),
      _ => Err(PathError::NotARecord),
    }
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }

  pub fn to_value(&self) -> Value {
    Value::Object(self.0.clone())
  }

  /// Strict read: `None` when any segment is missing.
  pub fn lookup(&self, path: &str) -> Option<&Value> {
    lookup(&self.0, path)
  }

  /// Safe read for display and validation.
  ///
  /// Missing segments and explicit nulls read as the empty string. Callers that
  /// must tell "absent" from "empty" use [`DomainState::lookup`].
  pub fn get(&self, path: &str) -> &Value {
    match self.lookup(path) {
      Some(Value::Null) | None => &EMPTY,
      Some(value) => value,
    }
  }

  /// Write `value` at a `domain.field` path.
  ///
  /// The field is merged into the named domain object, which is created when
  /// absent. Sibling fields and other domains are left unchanged.
  pub fn set(&mut self, path: &str, value: Value) -> Result<(), PathError> {
    let (domain, field) = split_field_path(path)?;

    let entry = self
      .0
      .entry(domain.to_string())
      .or_insert_with(|| Value::Object(Map::new()));

    if entry.is_null() {
      *entry = Value::Object(Map::new());
    }

    match entry {
      Value::Object(map) => {
        map.insert(field.to_string(), value);
        Ok(())
      }
      _ => Err(PathError::NotAnObject {
        domain: domain.to_string(),
      }),
    }
  }

  /// Replace a whole top-level domain, e.g. when hydrating from a saved draft.
  pub fn replace(&mut self, domain: &str, value: Value) -> Option<Value> {
    self.0.insert(domain.to_string(), value)
  }

  /// Append a record to a top-level collection, creating it when absent.
  /// Returns the index of the new record.
  pub fn push_item(&mut self, collection: &str, item: Value) -> Result<usize, PathError> {
    let items = self.collection_mut(collection, true)?;
    items.push(item);
    Ok(items.len() - 1)
  }

  /// Remove and return the record at `index` in a top-level collection.
  pub fn remove_item(&mut self, collection: &str, index: usize) -> Result<Value, PathError> {
    let items = self.collection_mut(collection, false)?;
    if index >= items.len() {
      return Err(PathError::IndexOutOfRange {
        collection: collection.to_string(),
        index,
        len: items.len(),
      });
    }
    Ok(items.remove(index))
  }

  /// Number of records in a top-level collection (0 when absent).
  pub fn item_count(&self, collection: &str) -> usize {
    self
      .0
      .get(collection)
      .and_then(Value::as_array)
      .map(Vec::len)
      .unwrap_or(0)
  }

  fn collection_mut(&mut self, collection: &str, create: bool) -> Result<&mut Vec<Value>, PathError> {
    if collection.is_empty() {
      return Err(PathError::Empty);
    }
    if collection.contains('.') {
      return Err(PathError::UnsupportedDepth {
        path: collection.to_string(),
        depth: collection.split('.').count(),
      });
    }

    if create {
      let entry = self
        .0
        .entry(collection.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
      if entry.is_null() {
        *entry = Value::Array(Vec::new());
      }
    }

    match self.0.get_mut(collection) {
      Some(Value::Array(items)) => Ok(items),
      _ => Err(PathError::NotAList {
        collection: collection.to_string(),
      }),
    }
  }
}

impl From<Map<String, Value>> for DomainState {
  fn from(map: Map<String, Value>) -> Self {
    Self(map)
  }
}
