//! Canonical block entity, its page association, and list filtering.

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::behavior::ValidationErrors;
use crate::model::Model;

/// Who may see a block outside the page that embeds it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
}

impl Visibility {
    /// Parse a form spelling. Returns None for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            _ => None,
        }
    }
}

/// A content unit with a type discriminator and a type-specific payload.
///
/// The `data` payload is opaque here; the behavior registered for
/// `class_name` is the only code that interprets it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub class_name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub data: Value,
}

impl Default for Block {
    fn default() -> Self {
        Block {
            id: String::new(),
            class_name: String::new(),
            visibility: Visibility::Public,
            data: Value::Null,
        }
    }
}

impl Block {
    /// Create an empty block of the given class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Block {
            class_name: class_name.into(),
            ..Block::default()
        }
    }

    /// Bind canonical form fields from a posted payload.
    ///
    /// Returns false when the input carries none of the canonical fields,
    /// which the workflow treats as "no form submitted".
    pub fn bind(&mut self, input: &Value) -> bool {
        let mut bound = false;
        if let Some(id) = input.get("id").and_then(Value::as_str) {
            self.id = id.trim().to_string();
            bound = true;
        }
        if let Some(class_name) = input.get("class_name").and_then(Value::as_str) {
            self.class_name = class_name.trim().to_string();
            bound = true;
        }
        if let Some(visibility) = input.get("visibility").and_then(Value::as_str) {
            if let Some(parsed) = Visibility::parse(visibility) {
                self.visibility = parsed;
            }
            bound = true;
        }
        bound
    }

    /// Validate the canonical fields, collecting field-level errors.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.class_name.trim().is_empty() {
            errors.add("class_name", "class name cannot be blank");
        }
        if !self.id.is_empty()
            && !self
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.add("id", "id may only contain letters, digits, dashes and underscores");
        }
        errors
    }
}

impl Model for Block {
    const COLLECTION: &'static str = "cms_block";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Association row linking a block to a page. Existence-only lifecycle:
/// the composite `page:block` key is the whole identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageHasBlock {
    id: String,
    pub page_id: String,
    pub block_id: String,
}

impl PageHasBlock {
    pub fn new(page_id: impl Into<String>, block_id: impl Into<String>) -> Self {
        let page_id = page_id.into();
        let block_id = block_id.into();
        PageHasBlock {
            id: format!("{}:{}", page_id, block_id),
            page_id,
            block_id,
        }
    }

    /// The composite key for a (page, block) pair.
    pub fn key(page_id: &str, block_id: &str) -> String {
        format!("{}:{}", page_id, block_id)
    }
}

impl Model for PageHasBlock {
    const COLLECTION: &'static str = "cms_page_has_block";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Filter for the block listing, built from query parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BlockFilter {
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub visibility: Option<Visibility>,
}

impl BlockFilter {
    pub fn matches(&self, block: &Block) -> bool {
        if let Some(id) = &self.id {
            if &block.id != id {
                return false;
            }
        }
        if let Some(class_name) = &self.class_name {
            if &block.class_name != class_name {
                return false;
            }
        }
        if let Some(visibility) = self.visibility {
            if block.visibility != visibility {
                return false;
            }
        }
        true
    }
}

/// Generate a random block id token: URL-safe base64 of fresh UUID bytes.
pub fn random_id() -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes())
}
