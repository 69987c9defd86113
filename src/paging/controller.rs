//! Controller for one paging run: the pager plus its page counter.

use std::sync::{Arc, Mutex};

use crate::types::Record;

use super::Pager;

/// State of one paging run.
///
/// The counter starts at 0 and is bumped once per retrieved page, so after a
/// fetch [`PagingLoopController::pages_retrieved`] is the 1-indexed number of
/// the page in hand. Stored on the carrier so a re-entrant invocation resumes
/// the run instead of starting a new one.
pub struct PagingLoopController {
  pager: Box<dyn Pager>,
  pages_retrieved: u64,
}

impl PagingLoopController {
  pub fn new(pager: Box<dyn Pager>) -> Self {
    Self {
      pager,
      pages_retrieved: 0,
    }
  }

  /// Fetches the next page and bumps the counter.
  pub fn next_page(&mut self) -> Option<Vec<Record>> {
    let page = self.pager.next_page()?;
    self.pages_retrieved += 1;
    Some(page)
  }

  pub fn pages_retrieved(&self) -> u64 {
    self.pages_retrieved
  }
}

/// How a controller travels on a carrier.
pub type SharedController = Arc<Mutex<PagingLoopController>>;
