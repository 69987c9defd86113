//! Wire rendering of lifecycle records and carriers as JSON/XML documents.
//!
//! Field names are stable identifiers shared with remote data-source
//! processes (`id`, `executionId`, `dataSourceId`, `state`, `queryType`,
//! `numRecords`, ...).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Carrier, DiagnosticMessage, QueryContext, Record};

pub fn to_json(ctx: &QueryContext) -> Result<String, serde_json::Error> {
  serde_json::to_string_pretty(ctx)
}

pub fn from_json(json: &str) -> Result<QueryContext, serde_json::Error> {
  serde_json::from_str(json)
}

pub fn to_xml(ctx: &QueryContext) -> Result<String, quick_xml::SeError> {
  quick_xml::se::to_string(ctx)
}

pub fn from_xml(xml: &str) -> Result<QueryContext, quick_xml::DeError> {
  quick_xml::de::from_str(xml)
}

/// Transportable snapshot of a carrier.
///
/// Only attributes holding JSON records or record sets travel; anything else
/// on the carrier (controllers, cursors) is transport-local and omitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierDocument {
  pub cancelled: bool,
  pub messages: Vec<DiagnosticMessage>,
  pub attributes: BTreeMap<String, Record>,
}

pub fn carrier_document(carrier: &Carrier) -> CarrierDocument {
  let mut attributes = BTreeMap::new();
  for name in carrier.attribute_names() {
    let Some(value) = carrier.get_raw(name) else {
      continue;
    };
    if let Some(record) = value.downcast_ref::<Record>() {
      attributes.insert(name.to_string(), record.clone());
    } else if let Some(records) = value.downcast_ref::<Vec<Record>>() {
      attributes.insert(name.to_string(), Record::Array(records.clone()));
    }
  }
  CarrierDocument {
    cancelled: carrier.is_cancelled(),
    messages: carrier.messages().to_vec(),
    attributes,
  }
}
