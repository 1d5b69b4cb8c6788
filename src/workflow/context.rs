//! Request contract consumed by the workflow.
//!
//! Carries the HTTP verb, query parameters, the posted form payload, the
//! is-asynchronous-client flag, and the session. The workflow reads
//! everything it needs through this type and never assumes transport
//! details.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::session::Session;

/// HTTP verb of the inbound request, as far as the workflow cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// The context passed to every workflow operation.
///
/// ## Example
///
/// ```ignore
/// let ctx = RequestContext::post(json!({ "content": "Hello" }))
///     .with_query("id", "intro")
///     .with_session(Session::with_id("sess-1"))
///     .ajax();
/// ```
pub struct RequestContext {
    method: Method,
    query: HashMap<String, String>,
    form: Value,
    ajax: bool,
    session: Session,
}

impl RequestContext {
    /// A GET request with no form payload.
    pub fn get() -> Self {
        Self {
            method: Method::Get,
            query: HashMap::new(),
            form: Value::Null,
            ajax: false,
            session: Session::new(),
        }
    }

    /// A POST request carrying the given form payload.
    pub fn post(form: Value) -> Self {
        Self {
            method: Method::Post,
            form,
            ..Self::get()
        }
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Attach the client session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Mark the request as coming from an asynchronous client.
    pub fn ajax(mut self) -> Self {
        self.ajax = true;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::Post
    }

    /// Whether the client asked for a JSON response instead of redirects
    /// and rendered forms.
    pub fn is_ajax(&self) -> bool {
        self.ajax
    }

    /// Get a query parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(|v| v.as_str())
    }

    /// The raw posted form payload. `Null` when nothing was posted.
    pub fn form(&self) -> &Value {
        &self.form
    }

    /// The client session.
    pub fn session(&self) -> &Session {
        &self.session
    }
}
