//! Core data types: the carrier that flows through handler chains and the
//! lifecycle record that tracks one federated-query leg.

mod carrier;
mod message;
mod query_action;
mod query_context;
mod query_spec;
mod query_state;
mod query_status;
mod result_view;
#[cfg(test)]
mod result_view_test;
mod severity;

pub use carrier::{AttrKey, AttrValue, CancelFlag, Carrier};
pub use message::DiagnosticMessage;
pub use query_action::QueryAction;
pub use query_context::QueryContext;
pub use query_spec::QuerySpec;
pub use query_state::QueryState;
pub use query_status::QueryStatus;
pub use result_view::{ResultView, ResultViewKey};
pub use severity::Severity;

/// One row of a paged result stream.
pub type Record = serde_json::Value;
