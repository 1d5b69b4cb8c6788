//! Listing, viewing, updating, and deleting persisted blocks.

use cms_blocks::workflow::{RequestContext, WorkflowError};
use cms_blocks::{block_tag, Block, ModelsExt, Session, Visibility};
use serde_json::json;

use crate::support::{test_workflow, TestWorkflow};

fn seed(t: &TestWorkflow, id: &str, class_name: &str, visibility: Visibility) {
    let mut block = Block::new(class_name);
    block.id = id.into();
    block.visibility = visibility;
    block.data = json!({ "title": "", "content": "seeded" });
    t.workflow.store().models::<Block>().save(&block).unwrap();
}

#[test]
fn index_lists_blocks_sorted_by_id() {
    let t = test_workflow();
    seed(&t, "b", "text", Visibility::Public);
    seed(&t, "a", "html", Visibility::Public);

    let outcome = t.workflow.dispatch("index", &RequestContext::get()).unwrap();

    let rendering = outcome.as_render().unwrap();
    assert_eq!(rendering.template, "index");
    let ids: Vec<&str> = rendering.data["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn index_filters_by_class_and_visibility() {
    let t = test_workflow();
    seed(&t, "a", "text", Visibility::Public);
    seed(&t, "b", "html", Visibility::Protected);
    seed(&t, "c", "text", Visibility::Protected);

    let ctx = RequestContext::get()
        .with_query("class_name", "text")
        .with_query("visibility", "protected");
    let outcome = t.workflow.dispatch("index", &ctx).unwrap();

    let blocks = outcome.as_render().unwrap().data["blocks"].clone();
    let blocks = blocks.as_array().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["id"], "c");
}

#[test]
fn view_renders_the_block() {
    let t = test_workflow();
    seed(&t, "intro", "text", Visibility::Public);

    let ctx = RequestContext::get().with_query("id", "intro");
    let outcome = t.workflow.dispatch("view", &ctx).unwrap();

    let rendering = outcome.as_render().unwrap();
    assert_eq!(rendering.template, "view");
    assert_eq!(rendering.data["block"]["id"], "intro");
}

#[test]
fn view_of_unknown_id_is_not_found() {
    let t = test_workflow();
    let ctx = RequestContext::get().with_query("id", "missing");
    let err = t.workflow.dispatch("view", &ctx).unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[test]
fn update_rebinds_and_redirects_to_config() {
    let t = test_workflow();
    seed(&t, "intro", "text", Visibility::Public);

    let ctx = RequestContext::post(json!({ "visibility": "protected" }))
        .with_query("id", "intro")
        .with_query("page_id", "7")
        .with_session(Session::with_id("sess-1"));
    let outcome = t.workflow.dispatch("update", &ctx).unwrap();

    let redirect = outcome.as_redirect().unwrap();
    assert_eq!(redirect.route, "config");
    assert_eq!(redirect.query("id"), Some("intro"));
    assert_eq!(redirect.query("page_id"), Some("7"));

    let stored = t
        .workflow
        .store()
        .models::<Block>()
        .get("intro")
        .unwrap()
        .unwrap();
    assert_eq!(stored.data.visibility, Visibility::Protected);
}

#[test]
fn update_rename_moves_the_row_and_invalidates_both_tags() {
    let t = test_workflow();
    seed(&t, "old-name", "text", Visibility::Public);

    let ctx = RequestContext::post(json!({ "id": "new-name" }))
        .with_query("id", "old-name")
        .with_session(Session::with_id("sess-1"));
    let outcome = t.workflow.dispatch("update", &ctx).unwrap();

    assert_eq!(outcome.as_redirect().unwrap().query("id"), Some("new-name"));

    let blocks = t.workflow.store().models::<Block>();
    assert!(blocks.get("old-name").unwrap().is_none());
    assert!(blocks.get("new-name").unwrap().is_some());

    assert_eq!(
        t.cache.invalidations(),
        vec![block_tag("new-name"), block_tag("old-name")]
    );
}

#[test]
fn update_with_invalid_shell_rerenders() {
    let t = test_workflow();
    seed(&t, "intro", "text", Visibility::Public);

    let ctx = RequestContext::post(json!({ "class_name": "" }))
        .with_query("id", "intro")
        .with_session(Session::with_id("sess-1"));
    let outcome = t.workflow.dispatch("update", &ctx).unwrap();

    let rendering = outcome.as_render().unwrap();
    assert_eq!(rendering.template, "update");
    assert!(rendering.data["errors"]["class_name"].is_array());

    let stored = t
        .workflow
        .store()
        .models::<Block>()
        .get("intro")
        .unwrap()
        .unwrap();
    assert_eq!(stored.data.class_name, "text");
    assert!(t.cache.invalidations().is_empty());
}

#[test]
fn update_of_unknown_id_is_not_found() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!({ "visibility": "public" })).with_query("id", "missing");
    let err = t.workflow.dispatch("update", &ctx).unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[test]
fn update_requires_post() {
    let t = test_workflow();
    seed(&t, "intro", "text", Visibility::Public);

    let ctx = RequestContext::get().with_query("id", "intro");
    let err = t.workflow.dispatch("update", &ctx).unwrap_err();
    assert!(matches!(err, WorkflowError::MethodNotAllowed { .. }));
    assert_eq!(err.status_code(), 405);
}

#[test]
fn delete_removes_the_row_and_invalidates_its_tag() {
    let t = test_workflow();
    seed(&t, "intro", "text", Visibility::Public);

    let ctx = RequestContext::post(json!(null)).with_query("id", "intro");
    let outcome = t.workflow.dispatch("delete", &ctx).unwrap();

    assert_eq!(outcome.as_redirect().unwrap().route, "index");
    assert!(t
        .workflow
        .store()
        .models::<Block>()
        .get("intro")
        .unwrap()
        .is_none());
    assert_eq!(t.cache.invalidations(), vec![block_tag("intro")]);
}

#[test]
fn delete_of_unknown_id_makes_no_invalidation_call() {
    let t = test_workflow();
    let ctx = RequestContext::post(json!(null)).with_query("id", "missing");

    let err = t.workflow.dispatch("delete", &ctx).unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
    assert!(t.cache.invalidations().is_empty());
}
