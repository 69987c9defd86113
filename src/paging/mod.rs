//! Page-bounded streaming of large result sets through sub-chains.

mod controller;
#[cfg(test)]
mod controller_test;
mod orchestrator;
mod pager;

pub use controller::{PagingLoopController, SharedController};
pub use orchestrator::{PagingOrchestrator, PagingOrchestratorBuilder};
pub use pager::{NO_LIMIT, Pager, PagerFactory, VecPager, VecPagerFactory};

/// Well-known carrier keys used by the paging machinery.
pub mod keys {
  use crate::types::{AttrKey, Record};

  use super::SharedController;

  /// Name of the source attribute: the full input before a run, the current
  /// page while one is in flight.
  pub const SOURCE: &str = "paging.source";

  /// Typed view of the current page under [`SOURCE`].
  pub static PAGE_RECORDS: AttrKey<Vec<Record>> = AttrKey::new(SOURCE);

  /// Per-request page size override; wins over the configured default.
  pub static PAGE_SIZE_OVERRIDE: AttrKey<usize> = AttrKey::new("paging.pageSize");

  /// 1-indexed number of the page currently in flight.
  pub static PAGE_NUMBER: AttrKey<u64> = AttrKey::new("paging.pageNumber");

  /// The in-flight run's controller; present only during a run.
  pub static CONTROLLER: AttrKey<SharedController> = AttrKey::new("paging.controller");
}
