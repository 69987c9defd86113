//! Tests for the paging loop controller.

use serde_json::json;

use crate::types::Record;

use super::{PagingLoopController, VecPager};

fn records(n: usize) -> Vec<Record> {
  (0..n).map(|i| json!(i)).collect()
}

#[test]
fn counter_starts_at_zero_and_bumps_per_page() {
  let mut controller = PagingLoopController::new(Box::new(VecPager::new(records(5), 2)));
  assert_eq!(controller.pages_retrieved(), 0);

  assert!(controller.next_page().is_some());
  assert_eq!(controller.pages_retrieved(), 1);

  assert!(controller.next_page().is_some());
  assert!(controller.next_page().is_some());
  assert_eq!(controller.pages_retrieved(), 3);
}

#[test]
fn exhaustion_leaves_counter_untouched() {
  let mut controller = PagingLoopController::new(Box::new(VecPager::new(records(2), 2)));
  assert!(controller.next_page().is_some());
  assert!(controller.next_page().is_none());
  assert_eq!(controller.pages_retrieved(), 1);
}
