//! Keyed result-view slots aggregated on a lifecycle record.

use serde::{Deserialize, Serialize};

/// Identity of a result-view slot.
///
/// Equality and ordering are defined solely by result type, then intersection
/// index; two views with the same key are the same slot regardless of payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultViewKey {
  pub result_type: String,
  pub intersection_index: u32,
}

impl ResultViewKey {
  pub fn new(result_type: impl Into<String>, intersection_index: u32) -> Self {
    Self {
      result_type: result_type.into(),
      intersection_index,
    }
  }
}

/// One flavor of aggregated result for a query: record count plus an opaque
/// payload reference (e.g. a pointer into result storage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
  pub result_type: String,
  pub intersection_index: u32,
  pub num_records: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub payload: Option<serde_json::Value>,
}

impl ResultView {
  pub fn new(result_type: impl Into<String>, intersection_index: u32, num_records: u64) -> Self {
    Self {
      result_type: result_type.into(),
      intersection_index,
      num_records,
      payload: None,
    }
  }

  pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
    self.payload = Some(payload);
    self
  }

  pub fn key(&self) -> ResultViewKey {
    ResultViewKey::new(self.result_type.clone(), self.intersection_index)
  }
}
