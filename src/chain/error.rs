//! Errors surfaced by chain assembly, traversal, and paging.

use thiserror::Error;

/// Errors surfaced by chain assembly, traversal, and paging.
///
/// `Config` and `Paging` originate in the framework itself; `Step` wraps a
/// processing step's own business failure. Traversal never catches or wraps a
/// step error, it propagates to the top-level caller unchanged.
#[derive(Debug, Error)]
pub enum ChainError {
  /// Missing or inconsistent wiring, detected at assembly time.
  #[error("invalid handler configuration: {0}")]
  Config(String),
  /// A paging run could not proceed (bad page size, missing or foreign source).
  #[error("paging failed: {0}")]
  Paging(String),
  /// A processing step's business logic failed.
  #[error("step '{step}' failed: {source}")]
  Step {
    step: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ChainError {
  /// Step failure with the failing step's name attached.
  pub fn step(
    step: impl Into<String>,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    ChainError::Step {
      step: step.into(),
      source: source.into(),
    }
  }
}
