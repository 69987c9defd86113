//! Per-state handlers for the query lifecycle state machine.
//!
//! One handler per state implements the allowed transitions and the entry
//! side effects; everything not overridden falls back to a business-rule
//! violation. A static table maps state to handler.

use std::collections::HashMap;

use chrono::Utc;
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::{info, instrument};

use crate::types::{QueryAction, QueryContext, QueryState};

use super::StaleDeadlineFactory;

/// Business-rule violation: an action requested in a state that does not
/// permit it. The record is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("action '{action}' is not allowed in state {state}")]
pub struct TransitionError {
  pub action: QueryAction,
  pub state: QueryState,
}

/// Transition logic and side effects for one lifecycle state.
///
/// The action methods return the resulting state; the defaults reject the
/// action for this state. `enter` runs after the record has moved into the
/// handler's state, `exit` just before it leaves.
pub trait StateHandler: Send + Sync {
  fn state(&self) -> QueryState;

  fn queue(&self) -> Result<QueryState, TransitionError> {
    Err(self.violation(QueryAction::Queue))
  }

  fn start(&self) -> Result<QueryState, TransitionError> {
    Err(self.violation(QueryAction::Start))
  }

  fn stop(&self) -> Result<QueryState, TransitionError> {
    Err(self.violation(QueryAction::Stop))
  }

  fn fail(&self) -> Result<QueryState, TransitionError> {
    Err(self.violation(QueryAction::Fail))
  }

  fn finish(&self) -> Result<QueryState, TransitionError> {
    Err(self.violation(QueryAction::Finish))
  }

  /// Actions permitted in this state; empty marks a final state.
  fn actions(&self) -> &'static [QueryAction] {
    &[]
  }

  fn enter(&self, _ctx: &mut QueryContext, _deadlines: Option<&dyn StaleDeadlineFactory>) {}

  fn exit(&self, _ctx: &mut QueryContext) {}

  fn violation(&self, action: QueryAction) -> TransitionError {
    TransitionError {
      action,
      state: self.state(),
    }
  }
}

struct SubmittedHandler;

impl StateHandler for SubmittedHandler {
  fn state(&self) -> QueryState {
    QueryState::Submitted
  }

  fn queue(&self) -> Result<QueryState, TransitionError> {
    Ok(QueryState::Queued)
  }

  fn actions(&self) -> &'static [QueryAction] {
    &[QueryAction::Queue]
  }
}

struct QueuedHandler;

impl StateHandler for QueuedHandler {
  fn state(&self) -> QueryState {
    QueryState::Queued
  }

  fn start(&self) -> Result<QueryState, TransitionError> {
    Ok(QueryState::Executing)
  }

  fn fail(&self) -> Result<QueryState, TransitionError> {
    Ok(QueryState::Failed)
  }

  fn actions(&self) -> &'static [QueryAction] {
    &[QueryAction::Start, QueryAction::Fail]
  }

  /// Queue time and staleness deadline are stamped once; a re-queued retry
  /// keeps the originals.
  fn enter(&self, ctx: &mut QueryContext, deadlines: Option<&dyn StaleDeadlineFactory>) {
    if ctx.queued_at.is_none() {
      ctx.queued_at = Some(Utc::now());
    }
    if ctx.stale_after.is_none() {
      if let Some(deadlines) = deadlines {
        ctx.stale_after = Some(deadlines.stale_deadline());
      }
    }
  }
}

struct ExecutingHandler;

impl StateHandler for ExecutingHandler {
  fn state(&self) -> QueryState {
    QueryState::Executing
  }

  fn stop(&self) -> Result<QueryState, TransitionError> {
    Ok(QueryState::Stopped)
  }

  fn fail(&self) -> Result<QueryState, TransitionError> {
    Ok(QueryState::Failed)
  }

  fn finish(&self) -> Result<QueryState, TransitionError> {
    Ok(QueryState::Completed)
  }

  fn actions(&self) -> &'static [QueryAction] {
    &[QueryAction::Stop, QueryAction::Fail, QueryAction::Finish]
  }

  /// The start time survives a stop/start cycle; the end time does not.
  fn enter(&self, ctx: &mut QueryContext, _deadlines: Option<&dyn StaleDeadlineFactory>) {
    if ctx.started_at.is_none() {
      ctx.started_at = Some(Utc::now());
    }
    ctx.ended_at = None;
  }
}

struct StoppedHandler;

impl StateHandler for StoppedHandler {
  fn state(&self) -> QueryState {
    QueryState::Stopped
  }

  fn start(&self) -> Result<QueryState, TransitionError> {
    Ok(QueryState::Executing)
  }

  fn fail(&self) -> Result<QueryState, TransitionError> {
    Ok(QueryState::Failed)
  }

  fn actions(&self) -> &'static [QueryAction] {
    &[QueryAction::Start, QueryAction::Fail]
  }

  fn enter(&self, ctx: &mut QueryContext, _deadlines: Option<&dyn StaleDeadlineFactory>) {
    ctx.ended_at = Some(Utc::now());
  }
}

struct CompletedHandler;

impl StateHandler for CompletedHandler {
  fn state(&self) -> QueryState {
    QueryState::Completed
  }

  fn enter(&self, ctx: &mut QueryContext, _deadlines: Option<&dyn StaleDeadlineFactory>) {
    ctx.ended_at = Some(Utc::now());
  }
}

struct FailedHandler;

impl StateHandler for FailedHandler {
  fn state(&self) -> QueryState {
    QueryState::Failed
  }

  fn enter(&self, ctx: &mut QueryContext, _deadlines: Option<&dyn StaleDeadlineFactory>) {
    ctx.ended_at = Some(Utc::now());
  }
}

struct InvalidHandler;

impl StateHandler for InvalidHandler {
  fn state(&self) -> QueryState {
    QueryState::Invalid
  }
}

static HANDLERS: Lazy<HashMap<QueryState, &'static dyn StateHandler>> = Lazy::new(|| {
  let mut table: HashMap<QueryState, &'static dyn StateHandler> = HashMap::new();
  table.insert(QueryState::Submitted, &SubmittedHandler);
  table.insert(QueryState::Queued, &QueuedHandler);
  table.insert(QueryState::Executing, &ExecutingHandler);
  table.insert(QueryState::Stopped, &StoppedHandler);
  table.insert(QueryState::Completed, &CompletedHandler);
  table.insert(QueryState::Failed, &FailedHandler);
  table
});

/// Handler for a state; unknown states fall back to the rejecting sentinel.
pub(crate) fn handler_for(state: QueryState) -> &'static dyn StateHandler {
  HANDLERS.get(&state).copied().unwrap_or(&InvalidHandler)
}

/// Applies one action to a record: resolve the transition on the current
/// state's handler, then run exit and entry side effects around the state
/// change. A rejected action leaves the record untouched.
#[instrument(level = "trace", skip(ctx, deadlines), fields(query = %ctx.id))]
pub(crate) fn apply(
  ctx: &mut QueryContext,
  action: QueryAction,
  deadlines: Option<&dyn StaleDeadlineFactory>,
) -> Result<(), TransitionError> {
  let current = handler_for(ctx.state());
  let next = match action {
    QueryAction::Queue => current.queue(),
    QueryAction::Start => current.start(),
    QueryAction::Stop => current.stop(),
    QueryAction::Fail => current.fail(),
    QueryAction::Finish => current.finish(),
  }?;
  current.exit(ctx);
  let from = ctx.state();
  ctx.set_state(next);
  handler_for(next).enter(ctx, deadlines);
  info!(query = %ctx.id, action = %action, from = %from, to = %next, "query state transition");
  Ok(())
}
