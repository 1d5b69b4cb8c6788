//! Error types for workflow operations.
//!
//! Only request-fatal conditions live here. Expected validation failures
//! are not errors — they travel as `ValidationErrors` inside a `Render`
//! outcome so the form can be re-shown.

use std::error::Error;
use std::fmt;

use crate::behavior::UnknownBlockType;
use crate::model::StoreError;

use super::context::Method;

/// Error type for workflow operations.
#[derive(Debug)]
pub enum WorkflowError {
    /// Unknown block id on view/update/delete/config-by-id.
    NotFound(String),
    /// Malformed request: missing discriminator, or a non-asynchronous
    /// call to the asynchronous-only endpoint.
    BadRequest(String),
    /// No behavior registered for the class tag.
    UnknownBlockType(String),
    /// Verb filter rejected the request.
    MethodNotAllowed { action: String, method: Method },
    /// No such workflow action.
    UnknownAction(String),
    /// Persistence or session storage failure.
    Store(StoreError),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::NotFound(id) => write!(f, "block not found: {}", id),
            WorkflowError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            WorkflowError::UnknownBlockType(tag) => write!(f, "unknown block type: {}", tag),
            WorkflowError::MethodNotAllowed { action, method } => {
                write!(f, "{} not allowed for action: {}", method, action)
            }
            WorkflowError::UnknownAction(name) => write!(f, "unknown action: {}", name),
            WorkflowError::Store(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl Error for WorkflowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkflowError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        WorkflowError::Store(err)
    }
}

impl From<UnknownBlockType> for WorkflowError {
    fn from(err: UnknownBlockType) -> Self {
        WorkflowError::UnknownBlockType(err.0)
    }
}

impl WorkflowError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            WorkflowError::NotFound(_) => 404,
            WorkflowError::BadRequest(_) => 400,
            WorkflowError::UnknownBlockType(_) => 400,
            WorkflowError::MethodNotAllowed { .. } => 405,
            WorkflowError::UnknownAction(_) => 404,
            WorkflowError::Store(_) => 500,
        }
    }
}
