//! BlockWorkflow — orchestration of the block lifecycle endpoints.
//!
//! `BlockWorkflow<S>` holds the model store, the behavior registry, the
//! session draft store, and the tag cache. Each endpoint is a method
//! taking a `RequestContext` and returning a terminal `Outcome`;
//! `dispatch` routes by action name and enforces HTTP verbs.
//!
//! ## Example
//!
//! ```ignore
//! use cms_blocks::workflow::{BlockWorkflow, RequestContext};
//! use cms_blocks::{InMemoryModelStore, Session};
//! use serde_json::json;
//!
//! let workflow = BlockWorkflow::new(InMemoryModelStore::new());
//!
//! let ctx = RequestContext::post(json!({ "class_name": "text" }))
//!     .with_session(Session::with_id("sess-1"));
//! workflow.create(&ctx)?;
//!
//! let ctx = RequestContext::post(json!({ "content": "Hello" }))
//!     .with_session(Session::with_id("sess-1"));
//! let outcome = workflow.config(&ctx, None)?;
//! ```

use std::sync::Arc;

use serde_json::{json, Value};

use crate::behavior::{BlockBehavior, BlockRegistry, ValidationErrors};
use crate::block::{random_id, Block, BlockFilter, PageHasBlock, Visibility};
use crate::cache::{block_tag, InMemoryTagCache, TagCache};
use crate::model::{ModelStore, ModelsExt, StoreError};
use crate::session::DraftStore;

use super::context::RequestContext;
use super::error::WorkflowError;
use super::outcome::{Outcome, Redirect};

/// Action names served by `dispatch`, in routing order.
pub const ACTIONS: [&str; 7] = [
    "index",
    "view",
    "create",
    "ajax-create",
    "config",
    "update",
    "delete",
];

/// The block lifecycle workflow.
///
/// Generic over `S`, the model store type, so hosts can plug in their own
/// persistence while tests run against `InMemoryModelStore`.
pub struct BlockWorkflow<S> {
    store: S,
    registry: BlockRegistry,
    drafts: DraftStore,
    cache: Arc<dyn TagCache>,
}

impl<S: ModelStore> BlockWorkflow<S> {
    /// Create a workflow over the given store, with the built-in behavior
    /// registry, an in-memory draft store, and an in-memory tag cache.
    pub fn new(store: S) -> Self {
        Self {
            store,
            registry: BlockRegistry::builtin(),
            drafts: DraftStore::new(),
            cache: Arc::new(InMemoryTagCache::new()),
        }
    }

    /// Replace the behavior registry. Builder pattern.
    pub fn with_registry(mut self, registry: BlockRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the draft store. Builder pattern.
    pub fn with_drafts(mut self, drafts: DraftStore) -> Self {
        self.drafts = drafts;
        self
    }

    /// Replace the tag cache. Builder pattern.
    pub fn with_cache(mut self, cache: Arc<dyn TagCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Get a reference to the model store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the draft store.
    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// Route an action by name, enforcing HTTP verbs.
    ///
    /// `update` and `delete` are POST-only; required parameters are read
    /// from the query string.
    pub fn dispatch(&self, action: &str, ctx: &RequestContext) -> Result<Outcome, WorkflowError> {
        match action {
            "index" => self.index(ctx),
            "view" => self.view(ctx, require_query(ctx, "id")?),
            "create" => self.create(ctx),
            "ajax-create" => {
                let class_name = ctx.query("class_name").ok_or_else(|| {
                    WorkflowError::BadRequest("missing class_name parameter".into())
                })?;
                self.ajax_create(ctx, class_name)
            }
            "config" => self.config(ctx, ctx.query("id")),
            "update" => {
                require_post(ctx, action)?;
                self.update(ctx, require_query(ctx, "id")?)
            }
            "delete" => {
                require_post(ctx, action)?;
                self.delete(ctx, require_query(ctx, "id")?)
            }
            _ => Err(WorkflowError::UnknownAction(action.to_string())),
        }
    }

    /// List blocks, filtered by `id` / `class_name` / `visibility` query
    /// parameters.
    pub fn index(&self, ctx: &RequestContext) -> Result<Outcome, WorkflowError> {
        let filter = BlockFilter {
            id: ctx.query("id").map(str::to_string),
            class_name: ctx.query("class_name").map(str::to_string),
            visibility: ctx.query("visibility").and_then(Visibility::parse),
        };

        let mut blocks: Vec<Block> = self
            .store
            .models::<Block>()
            .find(&|block| filter.matches(block))?
            .into_iter()
            .map(|versioned| versioned.data)
            .collect();
        blocks.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(Outcome::render(
            "index",
            json!({
                "blocks": to_value(&blocks),
                "filter": to_value(&filter),
            }),
        ))
    }

    /// Display a single block.
    pub fn view(&self, _ctx: &RequestContext, id: &str) -> Result<Outcome, WorkflowError> {
        let block = self.find_block(id)?;
        Ok(Outcome::render("view", json!({ "block": to_value(&block) })))
    }

    /// Create a new block shell and stage it as the session draft.
    ///
    /// A page context forces `Protected` visibility; `class_name` may be
    /// prefilled from the query string. On bound + valid canonical fields
    /// the draft is staged and the client is redirected to the config
    /// step; otherwise the create form is re-rendered. Id assignment is
    /// deferred to first persistence.
    pub fn create(&self, ctx: &RequestContext) -> Result<Outcome, WorkflowError> {
        let mut block = Block::default();
        let page_id = ctx.query("page_id");
        if page_id.is_some() {
            block.visibility = Visibility::Protected;
        }
        if let Some(class_name) = ctx.query("class_name") {
            block.class_name = class_name.to_string();
        }

        if ctx.is_post() && block.bind(ctx.form()) {
            let errors = self.validate_shell(&block);
            if errors.is_empty() {
                self.drafts.put(ctx.session().id(), &block)?;
                let mut redirect = Redirect::to("config");
                if let Some(page_id) = page_id {
                    redirect = redirect.param("page_id", page_id);
                }
                return Ok(redirect.into());
            }
            return Ok(render_shell_form("create", &block, errors));
        }

        Ok(render_shell_form("create", &block, ValidationErrors::new()))
    }

    /// Asynchronous create: assign a random id token, stage the draft,
    /// and echo the model as JSON when the shell is valid.
    ///
    /// Rejects non-asynchronous callers with `BadRequest` and unregistered
    /// class tags with `UnknownBlockType`. The draft is staged on the
    /// invalid path too, so the config step can resume it.
    pub fn ajax_create(
        &self,
        ctx: &RequestContext,
        class_name: &str,
    ) -> Result<Outcome, WorkflowError> {
        if !ctx.is_ajax() {
            return Err(WorkflowError::BadRequest(
                "ajax-create requires an asynchronous client".into(),
            ));
        }
        if !self.registry.contains(class_name) {
            return Err(WorkflowError::UnknownBlockType(class_name.to_string()));
        }

        let mut block = Block::new(class_name);
        block.visibility = Visibility::Protected;
        block.id = random_id();

        let bound = block.bind(ctx.form());
        let errors = self.validate_shell(&block);
        if bound && errors.is_empty() {
            self.drafts.put(ctx.session().id(), &block)?;
            return Ok(Outcome::json(attributes_with_flag(&block, true)));
        }

        self.drafts.put(ctx.session().id(), &block)?;
        Ok(render_shell_form("ajax-create", &block, errors))
    }

    /// Configure a block: bind and validate the type-specific payload,
    /// then commit.
    ///
    /// With an explicit `id` the persisted block is loaded (behavior
    /// seeded from its stored data); without one the session draft is
    /// taken, or the client is softly redirected back to create. On a
    /// valid submission the payload is committed, cache tags for the new
    /// and the pre-save identity are invalidated, the draft slot is
    /// cleared, and a first commit under a page context records the page
    /// association. Validation failure re-renders the form and leaves
    /// both the store and the draft untouched.
    pub fn config(
        &self,
        ctx: &RequestContext,
        id: Option<&str>,
    ) -> Result<Outcome, WorkflowError> {
        let (mut block, is_new) = match id {
            Some(id) => (self.find_block(id)?, false),
            None => match self.drafts.get(ctx.session().id())? {
                Some(draft) => (draft, true),
                None => return Ok(Redirect::to("create").into()),
            },
        };
        let old_id = block.id.clone();

        let mut behavior = self.registry.resolve(&block.class_name)?;
        if !is_new {
            behavior.import_data(&block.data);
        }

        if ctx.is_post() && behavior.bind(ctx.form()) {
            let errors = behavior.validate();
            if !errors.is_empty() {
                return Ok(render_config_form(id, &block, behavior.as_ref(), errors));
            }

            block.data = behavior.export_data();
            if is_new && block.id.is_empty() {
                block.id = random_id();
            }

            let persisted = if is_new {
                self.store.models::<Block>().insert(&block).map(|_| ())
            } else {
                self.persist_existing(&block, &old_id)
            };
            if let Err(err) = persisted {
                if let StoreError::AlreadyExists { .. } = err {
                    let mut errors = ValidationErrors::new();
                    errors.add("id", format!("a block with id {} already exists", block.id));
                    return Ok(render_config_form(id, &block, behavior.as_ref(), errors));
                }
                return Err(err.into());
            }

            self.invalidate_identity(&block.id, &old_id);
            self.drafts.clear(ctx.session().id())?;
            tracing::debug!(id = %block.id, new = is_new, "block configuration committed");

            if let Some(page_id) = ctx.query("page_id") {
                if is_new {
                    let link = PageHasBlock::new(page_id, &block.id);
                    self.store.models::<PageHasBlock>().save(&link)?;
                }
                if ctx.is_ajax() {
                    return Ok(Outcome::json(attributes_with_flag(&block, is_new)));
                }
                return Ok(Redirect::to("page/update").param("id", page_id).into());
            }

            if let Some(target) = ctx.query("redirect_to") {
                return Ok(Redirect::to(target).into());
            }

            if ctx.is_ajax() {
                return Ok(Outcome::json(attributes_with_flag(&block, is_new)));
            }

            return Ok(Redirect::to("view").param("id", &block.id).into());
        }

        Ok(render_config_form(
            id,
            &block,
            behavior.as_ref(),
            ValidationErrors::new(),
        ))
    }

    /// Update the canonical fields of an existing block.
    ///
    /// A successful save invalidates both the new and the pre-save
    /// identity tags (the id may have been re-assigned) and redirects to
    /// the config step.
    pub fn update(&self, ctx: &RequestContext, id: &str) -> Result<Outcome, WorkflowError> {
        let mut block = self.find_block(id)?;
        let old_id = block.id.clone();

        if ctx.is_post() && block.bind(ctx.form()) {
            let errors = self.validate_shell(&block);
            if errors.is_empty() {
                self.persist_existing(&block, &old_id)?;
                self.invalidate_identity(&block.id, &old_id);
                tracing::debug!(id = %block.id, "block updated");

                let mut redirect = Redirect::to("config").param("id", &block.id);
                if let Some(page_id) = ctx.query("page_id") {
                    redirect = redirect.param("page_id", page_id);
                }
                return Ok(redirect.into());
            }
            return Ok(render_shell_form("update", &block, errors));
        }

        Ok(render_shell_form("update", &block, ValidationErrors::new()))
    }

    /// Delete a block and invalidate its cache tag.
    ///
    /// An unknown id fails with `NotFound` before any invalidation runs.
    pub fn delete(&self, _ctx: &RequestContext, id: &str) -> Result<Outcome, WorkflowError> {
        let block = self.find_block(id)?;
        self.store.models::<Block>().delete(&block.id)?;
        self.cache.invalidate(&block_tag(&block.id));
        tracing::debug!(id = %block.id, "block deleted");
        Ok(Redirect::to("index").into())
    }

    fn find_block(&self, id: &str) -> Result<Block, WorkflowError> {
        self.store
            .models::<Block>()
            .get(id)?
            .map(|versioned| versioned.data)
            .ok_or_else(|| WorkflowError::NotFound(id.to_string()))
    }

    /// Canonical-field validation plus a registry membership check.
    fn validate_shell(&self, block: &Block) -> ValidationErrors {
        let mut errors = block.validate();
        if !block.class_name.is_empty() && !self.registry.contains(&block.class_name) {
            errors.add(
                "class_name",
                format!("unknown block type: {}", block.class_name),
            );
        }
        errors
    }

    /// Save an existing block, moving the row when the id was re-assigned.
    fn persist_existing(&self, block: &Block, old_id: &str) -> Result<(), StoreError> {
        if old_id != block.id {
            self.store.models::<Block>().delete(old_id)?;
        }
        self.store.models::<Block>().save(block)?;
        Ok(())
    }

    /// Invalidate the cache tags for the post-save and the pre-save
    /// identity. The id may have been re-assigned between load and save;
    /// a single-tag invalidation would leave the stale entry behind.
    fn invalidate_identity(&self, new_id: &str, old_id: &str) {
        self.cache.invalidate(&block_tag(new_id));
        if !old_id.is_empty() {
            self.cache.invalidate(&block_tag(old_id));
        }
    }
}

fn require_query<'a>(ctx: &'a RequestContext, key: &str) -> Result<&'a str, WorkflowError> {
    ctx.query(key)
        .ok_or_else(|| WorkflowError::BadRequest(format!("missing {} parameter", key)))
}

fn require_post(ctx: &RequestContext, action: &str) -> Result<(), WorkflowError> {
    if !ctx.is_post() {
        return Err(WorkflowError::MethodNotAllowed {
            action: action.to_string(),
            method: ctx.method(),
        });
    }
    Ok(())
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// The block's attributes plus the `isNewRecord` flag, as echoed to
/// asynchronous clients.
fn attributes_with_flag(block: &Block, is_new: bool) -> Value {
    let mut value = to_value(block);
    if let Value::Object(ref mut map) = value {
        map.insert("isNewRecord".to_string(), Value::Bool(is_new));
    }
    value
}

fn render_shell_form(template: &str, block: &Block, errors: ValidationErrors) -> Outcome {
    Outcome::render(
        template,
        json!({
            "block": to_value(block),
            "errors": to_value(&errors),
        }),
    )
}

fn render_config_form(
    id: Option<&str>,
    block: &Block,
    behavior: &dyn BlockBehavior,
    errors: ValidationErrors,
) -> Outcome {
    Outcome::render(
        "config",
        json!({
            "id": id,
            "class_name": block.class_name,
            "form": behavior.form_data(),
            "errors": to_value(&errors),
        }),
    )
}
