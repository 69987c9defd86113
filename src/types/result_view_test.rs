//! Tests for result-view keys and slots.

use serde_json::json;

use super::{ResultView, ResultViewKey};

#[test]
fn key_orders_by_result_type_then_intersection_index() {
  let mut keys = vec![
    ResultViewKey::new("patient_count", 2),
    ResultViewKey::new("breakdown", 9),
    ResultViewKey::new("patient_count", 0),
  ];
  keys.sort();
  assert_eq!(
    keys,
    vec![
      ResultViewKey::new("breakdown", 9),
      ResultViewKey::new("patient_count", 0),
      ResultViewKey::new("patient_count", 2),
    ]
  );
}

#[test]
fn views_with_the_same_key_are_the_same_slot() {
  let a = ResultView::new("patient_count", 0, 100);
  let b = ResultView::new("patient_count", 0, 250).with_payload(json!({ "ref": "r-9" }));
  assert_eq!(a.key(), b.key());
  assert_ne!(a, b);
}

#[test]
fn view_serializes_with_stable_wire_keys() {
  let view = ResultView::new("patient_count", 1, 42).with_payload(json!({ "ref": "r-1" }));
  let json = serde_json::to_value(&view).expect("serialize");
  assert_eq!(
    json,
    json!({
      "resultType": "patient_count",
      "intersectionIndex": 1,
      "numRecords": 42,
      "payload": { "ref": "r-1" }
    })
  );
}
