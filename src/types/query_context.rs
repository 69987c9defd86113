//! Lifecycle record for one federated-query leg.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lifecycle::{self, StaleDeadlineFactory, TransitionError};

use super::{QueryAction, QuerySpec, QueryState, QueryStatus, ResultView, ResultViewKey};

/// The stateful record tracking one federated-query leg: one data source's
/// view of one query. Legs of a fanned-out query form a tree via `parent_id`
/// (parent = federating query, one child per data source).
///
/// State is private: the action surface (`queue`, `start`, `stop`, `fail`,
/// `finish`) is the only way to move a record through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryContext {
  pub id: String,
  pub execution_id: Uuid,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data_source_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub origin_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent_id: Option<String>,
  #[serde(default)]
  pub query_specs: Vec<QuerySpec>,
  state: QueryState,
  #[serde(default)]
  pub status: QueryStatus,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub queued_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub started_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ended_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stale_after: Option<DateTime<Utc>>,
  #[serde(default)]
  pub num_records: u64,
  #[serde(default, with = "views_as_list")]
  result_views: BTreeMap<ResultViewKey, ResultView>,
}

impl QueryContext {
  /// New record in SUBMITTED with a fresh execution id.
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      execution_id: Uuid::new_v4(),
      data_source_id: None,
      origin_id: None,
      parent_id: None,
      query_specs: Vec::new(),
      state: QueryState::Submitted,
      status: QueryStatus::default(),
      queued_at: None,
      started_at: None,
      ended_at: None,
      stale_after: None,
      num_records: 0,
      result_views: BTreeMap::new(),
    }
  }

  /// New SUBMITTED child leg for one data source, parented to this record.
  /// The child inherits the query specs and origin of the federating query.
  pub fn spawn_child(&self, child_id: impl Into<String>, data_source_id: impl Into<String>) -> Self {
    let mut child = Self::new(child_id);
    child.data_source_id = Some(data_source_id.into());
    child.origin_id = self.origin_id.clone();
    child.parent_id = Some(self.id.clone());
    child.query_specs = self.query_specs.clone();
    child
  }

  pub fn state(&self) -> QueryState {
    self.state
  }

  pub(crate) fn set_state(&mut self, state: QueryState) {
    self.state = state;
  }

  // -- action surface -------------------------------------------------------

  /// SUBMITTED -> QUEUED. Stamps the queue time and staleness deadline if not
  /// already set.
  pub fn queue(&mut self, deadlines: &dyn StaleDeadlineFactory) -> Result<(), TransitionError> {
    lifecycle::apply(self, QueryAction::Queue, Some(deadlines))
  }

  /// QUEUED or STOPPED -> EXECUTING. Sets the start time on the first entry
  /// only and always clears the end time.
  pub fn start(&mut self) -> Result<(), TransitionError> {
    lifecycle::apply(self, QueryAction::Start, None)
  }

  /// EXECUTING -> STOPPED (recoverable). Sets the end time.
  pub fn stop(&mut self) -> Result<(), TransitionError> {
    lifecycle::apply(self, QueryAction::Stop, None)
  }

  /// QUEUED, EXECUTING, or STOPPED -> FAILED (terminal). Sets the end time.
  pub fn fail(&mut self) -> Result<(), TransitionError> {
    lifecycle::apply(self, QueryAction::Fail, None)
  }

  /// EXECUTING -> COMPLETED (terminal). Sets the end time.
  pub fn finish(&mut self) -> Result<(), TransitionError> {
    lifecycle::apply(self, QueryAction::Finish, None)
  }

  /// Actions permitted in the current state; empty exactly in final states.
  pub fn actions(&self) -> &'static [QueryAction] {
    lifecycle::handler_for(self.state).actions()
  }

  pub fn is_started(&self) -> bool {
    self.state == QueryState::Executing
  }

  pub fn is_stopped(&self) -> bool {
    self.state == QueryState::Stopped
  }

  /// True once no action can move the record any further.
  pub fn is_final(&self) -> bool {
    self.actions().is_empty()
  }

  /// True for a QUEUED record whose staleness deadline has passed.
  pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
    self.state == QueryState::Queued && self.stale_after.is_some_and(|d| d < now)
  }

  // -- progress -------------------------------------------------------------

  pub fn add_records(&mut self, count: u64) {
    self.num_records += count;
  }

  // -- result views ---------------------------------------------------------

  /// Inserts a view into its slot; returns the view it replaced, if any.
  pub fn add_result_view(&mut self, view: ResultView) -> Option<ResultView> {
    self.result_views.insert(view.key(), view)
  }

  pub fn remove_result_view(&mut self, key: &ResultViewKey) -> Option<ResultView> {
    self.result_views.remove(key)
  }

  pub fn result_view(&self, key: &ResultViewKey) -> Option<&ResultView> {
    self.result_views.get(key)
  }

  pub fn result_views(&self) -> impl Iterator<Item = &ResultView> {
    self.result_views.values()
  }

  pub fn clear_result_views(&mut self) {
    self.result_views.clear();
  }

  /// Replaces this record's full view set with a copy of `other`'s.
  pub fn replace_result_views_from(&mut self, other: &QueryContext) {
    self.result_views = other.result_views.clone();
  }

  /// Copies a finished child leg's results into this federating record:
  /// the child's full view set replaces ours and its record count is added.
  pub fn absorb_child(&mut self, child: &QueryContext) {
    self.replace_result_views_from(child);
    self.add_records(child.num_records);
  }
}

/// Result views travel as a list on the wire; the keyed map is rebuilt from
/// each view's own identity fields on the way in.
mod views_as_list {
  use std::collections::BTreeMap;

  use serde::ser::SerializeSeq;
  use serde::{Deserialize, Deserializer, Serializer};

  use crate::types::{ResultView, ResultViewKey};

  pub fn serialize<S: Serializer>(
    views: &BTreeMap<ResultViewKey, ResultView>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(views.len()))?;
    for view in views.values() {
      seq.serialize_element(view)?;
    }
    seq.end()
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<BTreeMap<ResultViewKey, ResultView>, D::Error> {
    let views = Vec::<ResultView>::deserialize(deserializer)?;
    Ok(views.into_iter().map(|v| (v.key(), v)).collect())
  }
}
