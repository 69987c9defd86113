//! Staleness deadline computation for queued query legs.

use chrono::{DateTime, Duration, Utc};

/// Supplies the staleness cutoff stamped when a leg enters QUEUED. A leg
/// still queued past its cutoff is considered expired.
pub trait StaleDeadlineFactory: Send + Sync {
  fn stale_deadline(&self) -> DateTime<Utc>;
}

/// Deadline a fixed time-to-live from now.
pub struct FixedTtlDeadlines {
  ttl: Duration,
}

impl FixedTtlDeadlines {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl }
  }
}

impl StaleDeadlineFactory for FixedTtlDeadlines {
  fn stale_deadline(&self) -> DateTime<Utc> {
    Utc::now() + self.ttl
  }
}
