//! Query lifecycle state machine: per-state handlers, transition application,
//! and the staleness deadline collaborator.
//!
//! Transitions take `&mut QueryContext`, so one caller at a time can move a
//! record; a record mutated from several threads (e.g. a monitor stopping an
//! executing leg) must be shared behind a lock.

mod deadline;
mod handler;
#[cfg(test)]
mod handler_test;

pub use deadline::{FixedTtlDeadlines, StaleDeadlineFactory};
pub use handler::{StateHandler, TransitionError};

pub(crate) use handler::{apply, handler_for};
