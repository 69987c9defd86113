//! Pager: lazy, finite, non-restartable producer of fixed-size pages.

use crate::chain::ChainError;
use crate::types::{AttrValue, Record};

/// Sentinel disabling the record-count cap on a pager.
pub const NO_LIMIT: usize = usize::MAX;

/// Lazy producer of fixed-size pages over a large input.
///
/// A pager is finite and not restartable; a fresh instance must be created
/// per paging run.
pub trait Pager: Send {
  /// Next page, or `None` once the input is exhausted.
  fn next_page(&mut self) -> Option<Vec<Record>>;
}

/// Builds a concrete pager for one paging run.
///
/// The kind of source handle (in-memory records, a database cursor, ...) is
/// opaque here; each data source supplies a factory that understands its own
/// handle type.
pub trait PagerFactory: Send + Sync {
  fn create_pager(&self, source: &AttrValue, page_size: usize) -> Result<Box<dyn Pager>, ChainError>;
}

/// Pager over an in-memory record set, with optional header-row skip and
/// record-count limit.
pub struct VecPager {
  remaining: std::vec::IntoIter<Record>,
  page_size: usize,
  budget: usize,
}

impl VecPager {
  pub fn new(records: Vec<Record>, page_size: usize) -> Self {
    Self::with_options(records, page_size, 0, NO_LIMIT)
  }

  pub fn with_options(
    records: Vec<Record>,
    page_size: usize,
    skip_header_rows: usize,
    limit: usize,
  ) -> Self {
    let mut remaining = records.into_iter();
    for _ in 0..skip_header_rows {
      if remaining.next().is_none() {
        break;
      }
    }
    Self {
      remaining,
      page_size,
      budget: limit,
    }
  }
}

impl Pager for VecPager {
  fn next_page(&mut self) -> Option<Vec<Record>> {
    if self.budget == 0 {
      return None;
    }
    let take = self.page_size.min(self.budget);
    let page: Vec<Record> = self.remaining.by_ref().take(take).collect();
    if page.is_empty() {
      return None;
    }
    if self.budget != NO_LIMIT {
      self.budget -= page.len();
    }
    Some(page)
  }
}

/// Factory producing [`VecPager`]s from a `Vec<Record>` source attribute.
#[derive(Clone, Copy)]
pub struct VecPagerFactory {
  pub skip_header_rows: usize,
  pub limit: usize,
}

impl Default for VecPagerFactory {
  fn default() -> Self {
    Self {
      skip_header_rows: 0,
      limit: NO_LIMIT,
    }
  }
}

impl PagerFactory for VecPagerFactory {
  fn create_pager(&self, source: &AttrValue, page_size: usize) -> Result<Box<dyn Pager>, ChainError> {
    let records = source.downcast_ref::<Vec<Record>>().ok_or_else(|| {
      ChainError::Paging("source attribute is not an in-memory record set".to_string())
    })?;
    Ok(Box::new(VecPager::with_options(
      records.clone(),
      page_size,
      self.skip_header_rows,
      self.limit,
    )))
  }
}
