//! Lifecycle state of one federated-query leg.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of one federated-query leg.
///
/// `Completed` and `Failed` are terminal; `Stopped` is recoverable back to
/// `Executing`. `Invalid` is a sentinel for unrecognized persisted values and
/// is never entered by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryState {
  Submitted,
  Queued,
  Executing,
  Stopped,
  Completed,
  Failed,
  Invalid,
}

impl fmt::Display for QueryState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QueryState::Submitted => write!(f, "SUBMITTED"),
      QueryState::Queued => write!(f, "QUEUED"),
      QueryState::Executing => write!(f, "EXECUTING"),
      QueryState::Stopped => write!(f, "STOPPED"),
      QueryState::Completed => write!(f, "COMPLETED"),
      QueryState::Failed => write!(f, "FAILED"),
      QueryState::Invalid => write!(f, "INVALID"),
    }
  }
}
