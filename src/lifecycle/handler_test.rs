//! Tests for the lifecycle state machine.

use chrono::{Duration, Utc};
use proptest::prelude::*;

use crate::types::{QueryAction, QueryContext, QueryState};

use super::{FixedTtlDeadlines, StaleDeadlineFactory, TransitionError};

fn deadlines() -> FixedTtlDeadlines {
  FixedTtlDeadlines::new(Duration::minutes(30))
}

fn submitted() -> QueryContext {
  QueryContext::new("query-1")
}

fn executing() -> QueryContext {
  let mut ctx = submitted();
  ctx.queue(&deadlines()).expect("queue");
  ctx.start().expect("start");
  ctx
}

/// The transition table: action applied in a state, and the state it yields.
/// `None` marks a business-rule violation.
fn table(state: QueryState, action: QueryAction) -> Option<QueryState> {
  use QueryAction::*;
  use QueryState::*;
  match (state, action) {
    (Submitted, Queue) => Some(Queued),
    (Queued, Start) | (Stopped, Start) => Some(Executing),
    (Executing, Stop) => Some(Stopped),
    (Executing, Finish) => Some(Completed),
    (Queued, Fail) | (Executing, Fail) | (Stopped, Fail) => Some(Failed),
    _ => None,
  }
}

fn apply(ctx: &mut QueryContext, action: QueryAction) -> Result<(), TransitionError> {
  match action {
    QueryAction::Queue => ctx.queue(&deadlines()),
    QueryAction::Start => ctx.start(),
    QueryAction::Stop => ctx.stop(),
    QueryAction::Fail => ctx.fail(),
    QueryAction::Finish => ctx.finish(),
  }
}

#[test]
fn happy_path_submitted_to_completed() {
  let mut ctx = submitted();
  assert_eq!(ctx.state(), QueryState::Submitted);
  ctx.queue(&deadlines()).expect("queue");
  assert_eq!(ctx.state(), QueryState::Queued);
  ctx.start().expect("start");
  assert_eq!(ctx.state(), QueryState::Executing);
  ctx.finish().expect("finish");
  assert_eq!(ctx.state(), QueryState::Completed);
}

#[test]
fn illegal_action_is_rejected_and_leaves_state_unchanged() {
  let mut ctx = submitted();
  let err = ctx.finish().expect_err("finish from SUBMITTED");
  assert_eq!(err.action, QueryAction::Finish);
  assert_eq!(err.state, QueryState::Submitted);
  assert_eq!(
    err.to_string(),
    "action 'finish' is not allowed in state SUBMITTED"
  );
  assert_eq!(ctx.state(), QueryState::Submitted);
}

#[test]
fn terminal_states_permit_no_actions() {
  let mut completed = executing();
  completed.finish().expect("finish");
  assert!(completed.actions().is_empty());
  assert!(completed.is_final());
  assert!(completed.start().is_err());

  let mut failed = executing();
  failed.fail().expect("fail");
  assert!(failed.actions().is_empty());
  assert!(failed.is_final());
  assert!(failed.stop().is_err());
}

#[test]
fn actions_are_empty_exactly_in_final_states() {
  use QueryState::*;
  for (state, ctx) in [
    (Submitted, submitted()),
    (Queued, {
      let mut c = submitted();
      c.queue(&deadlines()).expect("queue");
      c
    }),
    (Executing, executing()),
    (Stopped, {
      let mut c = executing();
      c.stop().expect("stop");
      c
    }),
    (Completed, {
      let mut c = executing();
      c.finish().expect("finish");
      c
    }),
    (Failed, {
      let mut c = executing();
      c.fail().expect("fail");
      c
    }),
  ] {
    assert_eq!(ctx.state(), state);
    let is_terminal = matches!(state, Completed | Failed);
    assert_eq!(ctx.actions().is_empty(), is_terminal, "state {state}");
    assert_eq!(ctx.is_final(), is_terminal, "state {state}");
  }
}

#[test]
fn queue_stamps_deadline_and_queue_time_once() {
  let preset = Utc::now() + Duration::hours(4);
  let mut ctx = submitted();
  ctx.stale_after = Some(preset);
  ctx.queue(&deadlines()).expect("queue");
  assert_eq!(ctx.stale_after, Some(preset));
  assert!(ctx.queued_at.is_some());

  let mut fresh = submitted();
  fresh.queue(&deadlines()).expect("queue");
  assert!(fresh.stale_after.is_some());
}

#[test]
fn start_time_survives_a_stop_start_cycle() {
  let mut ctx = executing();
  let first_start = ctx.started_at.expect("start time set");

  ctx.stop().expect("stop");
  assert!(ctx.ended_at.is_some());
  assert!(ctx.is_stopped());

  ctx.start().expect("restart");
  assert_eq!(ctx.started_at, Some(first_start));
  assert_eq!(ctx.ended_at, None);
  assert!(ctx.is_started());

  ctx.finish().expect("finish");
  assert!(ctx.ended_at.is_some());
}

#[test]
fn fail_is_reachable_from_queued_executing_and_stopped() {
  let mut queued = submitted();
  queued.queue(&deadlines()).expect("queue");
  queued.fail().expect("fail from QUEUED");
  assert_eq!(queued.state(), QueryState::Failed);
  assert!(queued.ended_at.is_some());

  let mut exec = executing();
  exec.fail().expect("fail from EXECUTING");
  assert_eq!(exec.state(), QueryState::Failed);

  let mut stopped = executing();
  stopped.stop().expect("stop");
  stopped.fail().expect("fail from STOPPED");
  assert_eq!(stopped.state(), QueryState::Failed);
}

#[test]
fn only_executing_counts_as_started() {
  let mut ctx = submitted();
  assert!(!ctx.is_started());
  ctx.queue(&deadlines()).expect("queue");
  assert!(!ctx.is_started());
  ctx.start().expect("start");
  assert!(ctx.is_started());
  ctx.stop().expect("stop");
  assert!(!ctx.is_started());
}

#[test]
fn queued_record_past_its_deadline_is_stale() {
  let mut ctx = submitted();
  ctx.queue(&FixedTtlDeadlines::new(Duration::seconds(-1)))
    .expect("queue");
  assert!(ctx.is_stale(Utc::now()));

  let mut fresh = submitted();
  fresh.queue(&deadlines()).expect("queue");
  assert!(!fresh.is_stale(Utc::now()));

  // staleness only applies while queued
  let exec = executing();
  assert!(!exec.is_stale(Utc::now() + Duration::hours(24)));
}

#[test]
fn fixed_ttl_deadline_lands_after_now() {
  let factory = deadlines();
  assert!(factory.stale_deadline() > Utc::now());
}

fn any_action() -> impl Strategy<Value = QueryAction> {
  prop_oneof![
    Just(QueryAction::Queue),
    Just(QueryAction::Start),
    Just(QueryAction::Stop),
    Just(QueryAction::Fail),
    Just(QueryAction::Finish),
  ]
}

proptest! {
  /// Any action sequence lands exactly where the transition table says, and
  /// rejected actions never move the record.
  #[test]
  fn action_sequences_follow_the_table(actions in proptest::collection::vec(any_action(), 0..24)) {
    let mut ctx = submitted();
    for action in actions {
      let before = ctx.state();
      let result = apply(&mut ctx, action);
      match table(before, action) {
        Some(next) => {
          prop_assert!(result.is_ok());
          prop_assert_eq!(ctx.state(), next);
        }
        None => {
          prop_assert_eq!(result, Err(TransitionError { action, state: before }));
          prop_assert_eq!(ctx.state(), before);
        }
      }
    }
  }
}
