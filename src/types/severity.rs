//! Severity tag for carrier diagnostic messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity tag for carrier diagnostic messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  Warn,
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Info => write!(f, "info"),
      Severity::Warn => write!(f, "warn"),
      Severity::Error => write!(f, "error"),
    }
  }
}
