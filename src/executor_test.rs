//! Tests for the leg executor.

use chrono::Duration;

use crate::chain::{ChainError, HandlerArena, HandlerChain};
use crate::executor::{self, LegOutcome};
use crate::lifecycle::FixedTtlDeadlines;
use crate::types::{Carrier, QueryContext, QueryState};

fn deadlines() -> FixedTtlDeadlines {
  FixedTtlDeadlines::new(Duration::minutes(30))
}

fn single_step_chain(
  f: impl Fn(&mut Carrier) -> Result<bool, ChainError> + Send + Sync + 'static,
) -> HandlerChain {
  let mut arena = HandlerArena::new();
  let step = arena.add_fn("step", f);
  HandlerChain::new(arena, step).expect("chain")
}

#[test]
fn clean_run_completes_the_record_and_picks_up_the_record_count() {
  let chain = single_step_chain(|carrier| {
    carrier.set(&executor::NUM_RECORDS, 37u64);
    Ok(false)
  });
  let mut ctx = QueryContext::new("q-1");
  let mut carrier = Carrier::new();

  let outcome = executor::run_leg(&mut ctx, &deadlines(), &chain, &mut carrier).expect("run");

  assert!(matches!(outcome, LegOutcome::Completed { handled: false }));
  assert_eq!(ctx.state(), QueryState::Completed);
  assert_eq!(ctx.num_records, 37);
  assert!(ctx.started_at.is_some());
  assert!(ctx.ended_at.is_some());
}

#[test]
fn cancelled_carrier_stops_the_record() {
  let chain = single_step_chain(|carrier| {
    carrier.cancel();
    Ok(false)
  });
  let mut ctx = QueryContext::new("q-1");
  let mut carrier = Carrier::new();

  let outcome = executor::run_leg(&mut ctx, &deadlines(), &chain, &mut carrier).expect("run");

  assert!(matches!(outcome, LegOutcome::Stopped));
  assert_eq!(ctx.state(), QueryState::Stopped);
  // a stopped leg is recoverable
  assert!(ctx.start().is_ok());
}

#[test]
fn step_failure_fails_the_record_and_keeps_the_error() {
  let chain = single_step_chain(|_carrier| Err(ChainError::step("step", "warehouse offline")));
  let mut ctx = QueryContext::new("q-1");
  let mut carrier = Carrier::new();

  let outcome = executor::run_leg(&mut ctx, &deadlines(), &chain, &mut carrier).expect("run");

  let LegOutcome::Failed(error) = outcome else {
    panic!("expected failed outcome");
  };
  assert!(error.to_string().contains("warehouse offline"));
  assert_eq!(ctx.state(), QueryState::Failed);
  assert!(
    ctx
      .status
      .message
      .as_deref()
      .is_some_and(|m| m.contains("warehouse offline"))
  );
}

#[test]
fn record_not_in_submitted_is_rejected_up_front() {
  let chain = single_step_chain(|_| Ok(false));
  let mut ctx = QueryContext::new("q-1");
  ctx.queue(&deadlines()).expect("queue");
  let mut carrier = Carrier::new();

  assert!(executor::run_leg(&mut ctx, &deadlines(), &chain, &mut carrier).is_err());
}
