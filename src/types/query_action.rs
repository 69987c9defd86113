//! Actions that drive the query lifecycle state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An action requested against a query lifecycle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryAction {
  Queue,
  Start,
  Stop,
  Fail,
  Finish,
}

impl fmt::Display for QueryAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QueryAction::Queue => write!(f, "queue"),
      QueryAction::Start => write!(f, "start"),
      QueryAction::Stop => write!(f, "stop"),
      QueryAction::Fail => write!(f, "fail"),
      QueryAction::Finish => write!(f, "finish"),
    }
  }
}
