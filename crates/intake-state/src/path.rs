use serde_json::{Map, Value};

use crate::error::PathError;

/// Walk `path` through `root`, returning `None` as soon as a segment is missing.
///
/// Object segments are looked up by key; array segments must parse as an index.
pub fn lookup<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
  let mut segments = path.split('.');
  let mut current = root.get(segments.next()?)?;

  for segment in segments {
    current = match current {
      Value::Object(map) => map.get(segment)?,
      Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
      _ => return None,
    };
  }

  Some(current)
}

/// Split a writable path into `(domain, field)`.
pub fn split_field_path(path: &str) -> Result<(&str, &str), PathError> {
  if path.is_empty() {
    return Err(PathError::Empty);
  }

  let segments: Vec<&str> = path.split('.').collect();
  if segments.iter().any(|s| s.is_empty()) {
    return Err(PathError::EmptySegment {
      path: path.to_string(),
    });
  }

  match segments.as_slice() {
    &[domain, field] => Ok((domain, field)),
    _ => Err(PathError::UnsupportedDepth {
      path: path.to_string(),
      depth: segments.len(),
    }),
  }
}
