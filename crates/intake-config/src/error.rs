use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse flow definition: {0}")]
  Parse(#[from] serde_json::Error),
}
