//! workflow — the block lifecycle state machine behind the admin endpoints.
//!
//! Each endpoint is a method on [`BlockWorkflow`] taking a [`RequestContext`]
//! and returning an explicit terminal [`Outcome`] (redirect, JSON payload,
//! or a template name plus data bag). [`BlockWorkflow::dispatch`] routes by
//! action name and enforces HTTP verbs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cms_blocks::workflow::{self, RequestContext};
//! use cms_blocks::Session;
//! use serde_json::json;
//!
//! let workflow = workflow::in_memory();
//!
//! let ctx = RequestContext::post(json!({ "class_name": "text" }))
//!     .with_query("page_id", "7")
//!     .with_session(Session::with_id("sess-1"));
//! let outcome = workflow.dispatch("create", &ctx)?;
//! // outcome: redirect to the config step, draft staged for sess-1
//! ```

mod context;
mod error;
mod outcome;
mod service;

pub use context::{Method, RequestContext};
pub use error::WorkflowError;
pub use outcome::{Outcome, Redirect, Rendering};
pub use service::{BlockWorkflow, ACTIONS};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Convenience: a workflow wired to in-memory stores and the built-in
/// behaviors.
pub fn in_memory() -> BlockWorkflow<crate::InMemoryModelStore> {
    BlockWorkflow::new(crate::InMemoryModelStore::new())
}
