//! Processing step: one unit of business logic in a handler chain.

use crate::types::Carrier;

use super::ChainError;

/// One unit of business logic in a handler chain.
///
/// `process` returns `Ok(true)` when the request is fully handled and
/// traversal must not advance past this node. Steps keep their working state
/// on the carrier; the step object itself is shared and immutable during a
/// traversal.
pub trait ProcessingStep: Send + Sync {
  fn process(&self, carrier: &mut Carrier) -> Result<bool, ChainError>;

  /// Cancellation call-back, invoked during the walk-back when a carrier was
  /// cancelled downstream of this node. Implementations must be idempotent;
  /// overlapping chains can reach the same node twice.
  fn on_interrupt(&self, _carrier: &mut Carrier) {}
}

/// Closure-backed step for light processing logic.
pub struct FnStep<F> {
  f: F,
}

impl<F> FnStep<F>
where
  F: Fn(&mut Carrier) -> Result<bool, ChainError> + Send + Sync,
{
  pub fn new(f: F) -> Self {
    Self { f }
  }
}

impl<F> ProcessingStep for FnStep<F>
where
  F: Fn(&mut Carrier) -> Result<bool, ChainError> + Send + Sync,
{
  fn process(&self, carrier: &mut Carrier) -> Result<bool, ChainError> {
    (self.f)(carrier)
  }
}
