//! Free-form progress status attached to a lifecycle record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest progress message for a query leg, stamped when updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStatus {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

impl QueryStatus {
  pub fn update(&mut self, message: impl Into<String>) {
    self.message = Some(message.into());
    self.updated_at = Some(Utc::now());
  }
}
