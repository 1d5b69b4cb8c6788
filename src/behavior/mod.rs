//! Block behaviors — the type-specific logic behind each `class_name`.
//!
//! A behavior knows how to seed itself from a persisted payload, bind
//! posted form input, validate the bound state, and export the payload
//! that gets stored on the block. The workflow resolves behaviors through
//! a [`BlockRegistry`] keyed by the block's discriminator tag.

mod html;
mod registry;
mod text;

pub use html::HtmlBehavior;
pub use registry::{BlockRegistry, UnknownBlockType};
pub use text::TextBehavior;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Field-level validation errors collected during binding.
///
/// Expected validation failures travel through this type, not through
/// `Result::Err` — the workflow re-renders the form with them attached.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for one field. Empty if the field is clean.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Type-specific logic for one block class.
pub trait BlockBehavior: Send {
    /// The discriminator tag this behavior serves.
    fn class_name(&self) -> &str;

    /// Seed state from a previously persisted payload, so partial edits
    /// preserve untouched fields.
    fn import_data(&mut self, payload: &Value);

    /// Bind posted form input. Returns false when the input carries no
    /// fields this behavior recognizes.
    fn bind(&mut self, input: &Value) -> bool;

    /// Validate the bound state, collecting field errors.
    fn validate(&self) -> ValidationErrors;

    /// Export the payload to persist on the block.
    fn export_data(&self) -> Value;

    /// Data bag handed to the configuration form template.
    fn form_data(&self) -> Value {
        self.export_data()
    }
}
