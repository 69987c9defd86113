//! # queryweave
//!
//! Orchestration core for federated queries: a query fans out to multiple
//! independently-failing data sources, each leg's lifecycle is tracked by a
//! state machine, and each leg's result stream is processed page by page
//! through a composable, cancellable chain of handlers.
//!
//! ## Architecture
//!
//! - `types`: the [`types::Carrier`] threaded through a chain and the
//!   [`types::QueryContext`] lifecycle record with its result views.
//! - `chain`: processing steps, the handler arena, chain/loop composites,
//!   traversal with cancellation walk-back.
//! - `paging`: pager, paging-loop controller, and the orchestrator step that
//!   drives pre-loop/per-page/post-loop sub-chains.
//! - `lifecycle`: per-state handlers, the transition table, staleness
//!   deadlines.
//! - `executor`: runs one leg end to end and settles its record.
//! - `store` / `wire`: persistence seam and JSON/XML wire rendering.

pub mod chain;
pub mod executor;
#[cfg(test)]
mod executor_test;
pub mod lifecycle;
pub mod paging;
pub mod store;
pub mod types;
pub mod wire;

pub use chain::{ChainError, FnStep, HandlerArena, HandlerChain, NodeId, ProcessingStep};
pub use executor::{LegOutcome, run_leg};
pub use lifecycle::{FixedTtlDeadlines, StaleDeadlineFactory, StateHandler, TransitionError};
pub use paging::{
  NO_LIMIT, Pager, PagerFactory, PagingLoopController, PagingOrchestrator, VecPager,
  VecPagerFactory,
};
pub use store::{ContextStore, FileStore, MemoryStore};
pub use types::{
  AttrKey, AttrValue, CancelFlag, Carrier, DiagnosticMessage, QueryAction, QueryContext,
  QuerySpec, QueryState, QueryStatus, Record, ResultView, ResultViewKey, Severity,
};
