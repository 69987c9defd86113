//! One query specification carried by a lifecycle record.

use serde::{Deserialize, Serialize};

/// One query specification: the result flavor it asks for plus the
/// source-agnostic definition document handed to the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
  pub query_type: String,
  #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
  pub definition: serde_json::Value,
}

impl QuerySpec {
  pub fn new(query_type: impl Into<String>, definition: serde_json::Value) -> Self {
    Self {
      query_type: query_type.into(),
      definition,
    }
  }
}
