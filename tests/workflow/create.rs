//! Create-step tests: shell binding, draft staging, and the asynchronous
//! create variant.

use cms_blocks::workflow::{RequestContext, WorkflowError};
use cms_blocks::{Session, Visibility};
use serde_json::json;

use crate::support::test_workflow;

#[test]
fn create_get_renders_the_form() {
    let t = test_workflow();
    let outcome = t.workflow.dispatch("create", &RequestContext::get()).unwrap();

    let rendering = outcome.as_render().unwrap();
    assert_eq!(rendering.template, "create");
    assert_eq!(rendering.data["errors"], json!({}));
}

#[test]
fn create_stages_draft_and_redirects_to_config() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({ "class_name": "text" }))
        .with_query("page_id", "7")
        .with_session(Session::with_id("sess-1"));

    let outcome = t.workflow.dispatch("create", &ctx).unwrap();

    let redirect = outcome.as_redirect().unwrap();
    assert_eq!(redirect.route, "config");
    assert_eq!(redirect.query("page_id"), Some("7"));

    let draft = t.workflow.drafts().get("sess-1").unwrap().unwrap();
    assert_eq!(draft.class_name, "text");
    assert_eq!(draft.visibility, Visibility::Protected);
    assert!(draft.id.is_empty());
}

#[test]
fn create_without_page_context_stays_public() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({ "class_name": "text" }))
        .with_session(Session::with_id("sess-1"));

    t.workflow.dispatch("create", &ctx).unwrap();

    let draft = t.workflow.drafts().get("sess-1").unwrap().unwrap();
    assert_eq!(draft.visibility, Visibility::Public);
}

#[test]
fn create_with_blank_class_rerenders_with_errors() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({ "class_name": "" }))
        .with_session(Session::with_id("sess-1"));

    let outcome = t.workflow.dispatch("create", &ctx).unwrap();

    let rendering = outcome.as_render().unwrap();
    assert_eq!(rendering.template, "create");
    assert!(rendering.data["errors"]["class_name"].is_array());
    assert_eq!(t.workflow.drafts().get("sess-1").unwrap(), None);
}

#[test]
fn create_with_unregistered_class_is_a_field_error() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({ "class_name": "carousel" }))
        .with_session(Session::with_id("sess-1"));

    let outcome = t.workflow.dispatch("create", &ctx).unwrap();

    let rendering = outcome.as_render().unwrap();
    assert!(rendering.data["errors"]["class_name"].is_array());
    assert_eq!(t.workflow.drafts().get("sess-1").unwrap(), None);
}

#[test]
fn staged_draft_is_invisible_to_other_sessions() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({ "class_name": "text" }))
        .with_session(Session::with_id("sess-1"));
    t.workflow.dispatch("create", &ctx).unwrap();

    assert!(t.workflow.drafts().get("sess-1").unwrap().is_some());
    assert_eq!(t.workflow.drafts().get("sess-2").unwrap(), None);
}

#[test]
fn ajax_create_rejects_synchronous_clients() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({}))
        .with_query("class_name", "text")
        .with_session(Session::with_id("sess-1"));

    let err = t.workflow.dispatch("ajax-create", &ctx).unwrap_err();
    assert!(matches!(err, WorkflowError::BadRequest(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn ajax_create_requires_a_class_name() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({}))
        .ajax()
        .with_session(Session::with_id("sess-1"));

    let err = t.workflow.dispatch("ajax-create", &ctx).unwrap_err();
    assert!(matches!(err, WorkflowError::BadRequest(_)));
}

#[test]
fn ajax_create_rejects_unregistered_class() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({}))
        .ajax()
        .with_query("class_name", "carousel")
        .with_session(Session::with_id("sess-1"));

    let err = t.workflow.dispatch("ajax-create", &ctx).unwrap_err();
    assert!(matches!(err, WorkflowError::UnknownBlockType(ref tag) if tag == "carousel"));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn ajax_create_echoes_the_staged_model() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({ "visibility": "protected" }))
        .ajax()
        .with_query("class_name", "text")
        .with_session(Session::with_id("sess-1"));

    let outcome = t.workflow.dispatch("ajax-create", &ctx).unwrap();

    let payload = outcome.as_json().unwrap();
    assert_eq!(payload["class_name"], "text");
    assert_eq!(payload["visibility"], "protected");
    assert_eq!(payload["isNewRecord"], true);

    let id = payload["id"].as_str().unwrap();
    assert_eq!(id.len(), 22);

    let draft = t.workflow.drafts().get("sess-1").unwrap().unwrap();
    assert_eq!(draft.id, id);
}

#[test]
fn ajax_create_with_invalid_shell_renders_and_still_stages() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({ "id": "has spaces" }))
        .ajax()
        .with_query("class_name", "text")
        .with_session(Session::with_id("sess-1"));

    let outcome = t.workflow.dispatch("ajax-create", &ctx).unwrap();

    let rendering = outcome.as_render().unwrap();
    assert_eq!(rendering.template, "ajax-create");
    assert!(rendering.data["errors"]["id"].is_array());

    // The half-filled draft stays resumable from the config step.
    let draft = t.workflow.drafts().get("sess-1").unwrap().unwrap();
    assert_eq!(draft.id, "has spaces");
}
