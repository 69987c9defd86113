//! Diagnostic message collected on a carrier while it moves through a chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Severity;

/// One diagnostic message, tagged with severity and the time it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticMessage {
  pub severity: Severity,
  pub text: String,
  pub recorded_at: DateTime<Utc>,
}

impl DiagnosticMessage {
  pub fn new(severity: Severity, text: impl Into<String>) -> Self {
    Self {
      severity,
      text: text.into(),
      recorded_at: Utc::now(),
    }
  }
}
