//! Paging orchestrator: drives the page-by-page loop over a large result
//! stream, invoking pre-loop, per-page, and post-loop sub-chains.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::chain::{ChainError, HandlerChain, ProcessingStep};
use crate::types::Carrier;

use super::controller::SharedController;
use super::{PagerFactory, PagingLoopController, keys};

/// Processing step that pages a carrier's source attribute through sub-chains.
///
/// Per page, the source attribute is replaced by the current page and the
/// 1-indexed page number is published; the pre-loop sub-chain runs on page 1
/// only, the main sub-chain on every page. The loop stops when the pager is
/// exhausted or any sub-chain signals fully handled; the post-loop sub-chain
/// then runs once if nothing was handled. Returns the OR of all handled
/// signals.
///
/// The source attribute is restored to the original full input on every exit
/// path, including a sub-chain failure part way through a page.
pub struct PagingOrchestrator {
  name: String,
  page_size: usize,
  factory: Arc<dyn PagerFactory>,
  pre_loop: Option<HandlerChain>,
  per_page: Option<HandlerChain>,
  post_loop: Option<HandlerChain>,
}

impl PagingOrchestrator {
  pub fn builder(name: impl Into<String>) -> PagingOrchestratorBuilder {
    PagingOrchestratorBuilder {
      name: name.into(),
      page_size: None,
      factory: None,
      pre_loop: None,
      per_page: None,
      post_loop: None,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  fn run_pages(&self, controller: &SharedController, carrier: &mut Carrier) -> Result<bool, ChainError> {
    let mut handled = false;
    loop {
      let fetched = {
        let mut ctl = controller
          .lock()
          .map_err(|_| ChainError::Paging("paging controller lock poisoned".to_string()))?;
        ctl.next_page().map(|page| (page, ctl.pages_retrieved()))
      };
      let Some((page, page_no)) = fetched else { break };

      debug!(orchestrator = %self.name, page = page_no, records = page.len(), "processing page");
      carrier.set(&keys::PAGE_NUMBER, page_no);
      carrier.set(&keys::PAGE_RECORDS, page);

      if page_no == 1 && !handled {
        if let Some(pre) = &self.pre_loop {
          handled = pre.handle(carrier)?;
        }
      }
      if let Some(main) = &self.per_page {
        handled = main.handle(carrier)? || handled;
      }
      if handled {
        break;
      }
    }
    if !handled {
      if let Some(post) = &self.post_loop {
        handled = post.handle(carrier)?;
      }
    }
    Ok(handled)
  }
}

impl ProcessingStep for PagingOrchestrator {
  fn process(&self, carrier: &mut Carrier) -> Result<bool, ChainError> {
    let page_size = match carrier.get(&keys::PAGE_SIZE_OVERRIDE) {
      Some(&size) if size > 0 => size,
      Some(_) => {
        return Err(ChainError::Paging(
          "page size override must be a positive integer".to_string(),
        ));
      }
      None => self.page_size,
    };

    let original = carrier.get_raw(keys::SOURCE).cloned();

    let (controller, created_here) = match carrier.get(&keys::CONTROLLER) {
      Some(existing) => (Arc::clone(existing), false),
      None => {
        let source = original.as_ref().ok_or_else(|| {
          ChainError::Paging(format!("missing source attribute '{}'", keys::SOURCE))
        })?;
        let pager = self.factory.create_pager(source, page_size)?;
        let controller: SharedController = Arc::new(Mutex::new(PagingLoopController::new(pager)));
        carrier.set(&keys::CONTROLLER, Arc::clone(&controller));
        (controller, true)
      }
    };

    let run = self.run_pages(&controller, carrier);

    // Put the full input back and drop a controller this invocation created,
    // whether the loop finished, short-circuited, or a sub-chain failed.
    match original {
      Some(value) => carrier.set_raw(keys::SOURCE, value),
      None => {
        carrier.remove_raw(keys::SOURCE);
      }
    }
    if created_here {
      carrier.remove(&keys::CONTROLLER);
    }
    run
  }
}

/// Builder for [`PagingOrchestrator`]; missing wiring fails at build time.
pub struct PagingOrchestratorBuilder {
  name: String,
  page_size: Option<usize>,
  factory: Option<Arc<dyn PagerFactory>>,
  pre_loop: Option<HandlerChain>,
  per_page: Option<HandlerChain>,
  post_loop: Option<HandlerChain>,
}

impl PagingOrchestratorBuilder {
  pub fn page_size(mut self, page_size: usize) -> Self {
    self.page_size = Some(page_size);
    self
  }

  pub fn factory(mut self, factory: Arc<dyn PagerFactory>) -> Self {
    self.factory = Some(factory);
    self
  }

  pub fn pre_loop(mut self, chain: HandlerChain) -> Self {
    self.pre_loop = Some(chain);
    self
  }

  pub fn per_page(mut self, chain: HandlerChain) -> Self {
    self.per_page = Some(chain);
    self
  }

  pub fn post_loop(mut self, chain: HandlerChain) -> Self {
    self.post_loop = Some(chain);
    self
  }

  pub fn build(self) -> Result<PagingOrchestrator, ChainError> {
    let page_size = self.page_size.ok_or_else(|| {
      ChainError::Config(format!("paging orchestrator '{}' requires a page size", self.name))
    })?;
    if page_size == 0 {
      return Err(ChainError::Config(format!(
        "paging orchestrator '{}' requires a positive page size",
        self.name
      )));
    }
    let factory = self.factory.ok_or_else(|| {
      ChainError::Config(format!(
        "paging orchestrator '{}' requires a pager factory",
        self.name
      ))
    })?;
    Ok(PagingOrchestrator {
      name: self.name,
      page_size,
      factory,
      pre_loop: self.pre_loop,
      per_page: self.per_page,
      post_loop: self.post_loop,
    })
  }
}
