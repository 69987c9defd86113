//! Leg executor: drives one federated-query leg end to end.
//!
//! Queues and starts the lifecycle record, runs the assembled handler chain
//! over the carrier, then settles the record: COMPLETED on a clean return,
//! STOPPED when the carrier was cancelled, FAILED when a step error
//! propagated out of the chain.

use tracing::{info, instrument, warn};

use crate::chain::{ChainError, HandlerChain};
use crate::lifecycle::{StaleDeadlineFactory, TransitionError};
use crate::types::{AttrKey, Carrier, QueryContext};

/// Record count a chain accumulated for the leg; picked up into the
/// lifecycle record when the leg settles.
pub static NUM_RECORDS: AttrKey<u64> = AttrKey::new("query.numRecords");

/// How one leg run ended. The lifecycle transition has already been applied.
#[derive(Debug)]
pub enum LegOutcome {
  /// The chain ran to completion; the record is COMPLETED.
  Completed { handled: bool },
  /// The carrier was cancelled mid-run; the record is STOPPED and the leg
  /// can be started again.
  Stopped,
  /// A step failed; the record is FAILED and the error is preserved here.
  Failed(ChainError),
}

/// Runs one leg: SUBMITTED -> QUEUED -> EXECUTING -> chain -> terminal.
///
/// Returns a [`TransitionError`] only when the record was not in a state this
/// driver could move (i.e. not freshly SUBMITTED).
#[instrument(level = "trace", skip_all, fields(query = %ctx.id))]
pub fn run_leg(
  ctx: &mut QueryContext,
  deadlines: &dyn StaleDeadlineFactory,
  chain: &HandlerChain,
  carrier: &mut Carrier,
) -> Result<LegOutcome, TransitionError> {
  ctx.queue(deadlines)?;
  ctx.start()?;

  let outcome = chain.handle(carrier);
  if let Some(&count) = carrier.get(&NUM_RECORDS) {
    ctx.add_records(count);
  }

  match outcome {
    Ok(_) if carrier.is_cancelled() => {
      ctx.stop()?;
      info!(query = %ctx.id, "leg stopped by cancellation");
      Ok(LegOutcome::Stopped)
    }
    Ok(handled) => {
      ctx.finish()?;
      info!(query = %ctx.id, handled, records = ctx.num_records, "leg completed");
      Ok(LegOutcome::Completed { handled })
    }
    Err(error) => {
      ctx.status.update(error.to_string());
      ctx.fail()?;
      warn!(query = %ctx.id, error = %error, "leg failed");
      Ok(LegOutcome::Failed(error))
    }
  }
}
