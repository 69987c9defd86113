//! Carrier: the per-invocation unit of work threaded through a handler chain.
//!
//! A carrier holds named attributes, an ordered list of severity-tagged
//! diagnostic messages, an optional captured error, and a cancellation flag.
//! Attributes can be addressed by raw string key or through a typed
//! [`AttrKey`], so steps exchange data via a shared key registry instead of
//! importing each other's types.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{DiagnosticMessage, Severity};

/// An attribute value as stored on the carrier.
pub type AttrValue = Arc<dyn Any + Send + Sync>;

/// A typed attribute key: a stable name plus the value's static type.
///
/// Declare keys as statics in a shared registry module:
///
/// ```
/// use queryweave::types::AttrKey;
///
/// pub static RETRY_BUDGET: AttrKey<u32> = AttrKey::new("retryBudget");
/// ```
pub struct AttrKey<T> {
  name: &'static str,
  _marker: PhantomData<fn() -> T>,
}

impl<T> AttrKey<T> {
  pub const fn new(name: &'static str) -> Self {
    Self {
      name,
      _marker: PhantomData,
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

/// Clonable handle to a carrier's cancellation flag.
///
/// Handing a clone to another thread is the supported way to cancel a run
/// that is in flight; setting the flag does not interrupt the step currently
/// executing, it stops the next node from starting.
#[derive(Debug, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}

/// Per-invocation mutable context: attributes + messages + cancellation + error.
pub struct Carrier {
  attributes: HashMap<String, AttrValue>,
  messages: Vec<DiagnosticMessage>,
  error: Option<Box<dyn std::error::Error + Send + Sync>>,
  cancelled: Arc<AtomicBool>,
}

impl Carrier {
  pub fn new() -> Self {
    Self {
      attributes: HashMap::new(),
      messages: Vec::new(),
      error: None,
      cancelled: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Stores `value` under the key's name, replacing any previous value.
  pub fn set<T: Send + Sync + 'static>(&mut self, key: &AttrKey<T>, value: T) {
    self.attributes.insert(key.name.to_string(), Arc::new(value));
  }

  /// Looks up the key's attribute; `None` if absent or of a different type.
  pub fn get<T: Send + Sync + 'static>(&self, key: &AttrKey<T>) -> Option<&T> {
    self
      .attributes
      .get(key.name)
      .and_then(|v| v.downcast_ref::<T>())
  }

  pub fn remove<T>(&mut self, key: &AttrKey<T>) -> Option<AttrValue> {
    self.attributes.remove(key.name)
  }

  pub fn set_raw(&mut self, name: impl Into<String>, value: AttrValue) {
    self.attributes.insert(name.into(), value);
  }

  pub fn get_raw(&self, name: &str) -> Option<&AttrValue> {
    self.attributes.get(name)
  }

  pub fn remove_raw(&mut self, name: &str) -> Option<AttrValue> {
    self.attributes.remove(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.attributes.contains_key(name)
  }

  pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
    self.attributes.keys().map(String::as_str)
  }

  pub fn add_message(&mut self, severity: Severity, text: impl Into<String>) {
    self.messages.push(DiagnosticMessage::new(severity, text));
  }

  pub fn messages(&self) -> &[DiagnosticMessage] {
    &self.messages
  }

  pub fn has_error_messages(&self) -> bool {
    self.messages.iter().any(|m| m.severity == Severity::Error)
  }

  /// Records a failure a wrapping step intercepted; replaces a prior one.
  pub fn record_error(&mut self, error: Box<dyn std::error::Error + Send + Sync>) {
    self.error = Some(error);
  }

  pub fn error(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
    self.error.as_deref()
  }

  pub fn take_error(&mut self) -> Option<Box<dyn std::error::Error + Send + Sync>> {
    self.error.take()
  }

  /// A clonable handle other threads can use to cancel this carrier.
  pub fn cancel_flag(&self) -> CancelFlag {
    CancelFlag(Arc::clone(&self.cancelled))
  }

  pub fn cancel(&mut self) {
    self.cancelled.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }
}

impl Default for Carrier {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for Carrier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Carrier")
      .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
      .field("messages", &self.messages.len())
      .field("cancelled", &self.is_cancelled())
      .field("error", &self.error.as_ref().map(|e| e.to_string()))
      .finish()
  }
}
