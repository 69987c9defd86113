//! Persistence seam for lifecycle records.
//!
//! The orchestration core only ever loads and saves whole records by id; the
//! stores here are the in-process implementations used directly and in tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::instrument;

use crate::types::QueryContext;

/// Load/save of lifecycle records by persistent id.
pub trait ContextStore: Send + Sync {
  fn load(&self, id: &str) -> Result<Option<QueryContext>, std::io::Error>;
  fn save(&self, ctx: &QueryContext) -> Result<(), std::io::Error>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
  records: Mutex<HashMap<String, QueryContext>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ContextStore for MemoryStore {
  fn load(&self, id: &str) -> Result<Option<QueryContext>, std::io::Error> {
    let records = self
      .records
      .lock()
      .map_err(|_| std::io::Error::other("context store lock poisoned"))?;
    Ok(records.get(id).cloned())
  }

  fn save(&self, ctx: &QueryContext) -> Result<(), std::io::Error> {
    let mut records = self
      .records
      .lock()
      .map_err(|_| std::io::Error::other("context store lock poisoned"))?;
    records.insert(ctx.id.clone(), ctx.clone());
    Ok(())
  }
}

/// One JSON file per record under a directory.
pub struct FileStore {
  dir: PathBuf,
}

impl FileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn path_for(&self, id: &str) -> PathBuf {
    self.dir.join(format!("{id}.json"))
  }
}

impl ContextStore for FileStore {
  #[instrument(level = "trace", skip(self))]
  fn load(&self, id: &str) -> Result<Option<QueryContext>, std::io::Error> {
    let bytes = match std::fs::read(self.path_for(id)) {
      Ok(bytes) => bytes,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(err) => return Err(err),
    };
    serde_json::from_slice(&bytes)
      .map(Some)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
  }

  #[instrument(level = "trace", skip_all, fields(query = %ctx.id))]
  fn save(&self, ctx: &QueryContext) -> Result<(), std::io::Error> {
    let json = serde_json::to_string_pretty(ctx)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::create_dir_all(&self.dir)?;
    std::fs::write(self.path_for(ctx.id.as_str()), json)
  }
}

impl std::fmt::Debug for FileStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FileStore").field("dir", &self.dir).finish()
  }
}
