//! HTTP transport — maps HTTP requests onto workflow actions.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET|POST /:action` — run a workflow action. Body = JSON form input,
//!   query string → query parameters, request headers → session
//!   (`x-session-id` names the session, `x-requested-with:
//!   XMLHttpRequest` marks an asynchronous client).
//! - `GET /health` — health check returning `{ "ok": true, "actions": [...] }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cms_blocks::workflow::{self, BlockWorkflow};
//! use cms_blocks::InMemoryModelStore;
//!
//! let wf = Arc::new(BlockWorkflow::new(InMemoryModelStore::new()));
//!
//! // Get the router to compose with other axum routes
//! let app = workflow::router(wf.clone());
//!
//! // Or serve directly
//! workflow::serve(wf, "0.0.0.0:3000").await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, Method as HttpMethod, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::model::ModelStore;
use crate::session::Session;

use super::context::RequestContext;
use super::outcome::Outcome;
use super::service::{BlockWorkflow, ACTIONS};

/// Build an axum `Router` that runs workflow actions.
pub fn router<S: ModelStore + 'static>(workflow: Arc<BlockWorkflow<S>>) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({ "ok": true, "actions": ACTIONS })) }))
        .route("/:action", get(action_handler).post(action_handler))
        .with_state(workflow)
}

/// Serve the workflow over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S: ModelStore + 'static>(
    workflow: Arc<BlockWorkflow<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(workflow);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// `GET|POST /:action` — build a `RequestContext` and dispatch.
async fn action_handler<S: ModelStore + 'static>(
    State(workflow): State<Arc<BlockWorkflow<S>>>,
    Path(action): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    method: HttpMethod,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut ctx = match method {
        HttpMethod::GET => RequestContext::get(),
        HttpMethod::POST => {
            let form = if body.is_empty() {
                Value::Null
            } else {
                match serde_json::from_slice(&body) {
                    Ok(value) => value,
                    Err(e) => {
                        let body = json!({ "error": format!("invalid JSON body: {}", e) });
                        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
                    }
                }
            };
            RequestContext::post(form)
        }
        _ => return StatusCode::METHOD_NOT_ALLOWED.into_response(),
    };

    for (key, value) in params {
        ctx = ctx.with_query(key, value);
    }
    ctx = ctx.with_session(session_from_headers(&headers));
    if is_ajax(&headers) {
        ctx = ctx.ajax();
    }

    match workflow.dispatch(&action, &ctx) {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({ "error": e.to_string() });
            (status, Json(body)).into_response()
        }
    }
}

fn outcome_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Redirect(redirect) => {
            (StatusCode::SEE_OTHER, [(header::LOCATION, redirect.location())]).into_response()
        }
        Outcome::Json(value) => (StatusCode::OK, Json(value)).into_response(),
        Outcome::Render(rendering) => {
            let body = json!({ "template": rendering.template, "data": rendering.data });
            (StatusCode::OK, Json(body)).into_response()
        }
    }
}

/// Build the session from HTTP headers.
///
/// `x-session-id` names the session; all headers are included as session
/// variables.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let id = headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous");

    let mut vars = HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(id, vars)
}

fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("xmlhttprequest"))
        .unwrap_or(false)
}
