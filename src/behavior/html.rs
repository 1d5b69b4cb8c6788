//! Built-in `html` block — raw markup stored verbatim.

use serde_json::{json, Value};

use super::{BlockBehavior, ValidationErrors};

/// Behavior for the `html` block class.
#[derive(Debug, Default, Clone)]
pub struct HtmlBehavior {
    markup: String,
}

impl BlockBehavior for HtmlBehavior {
    fn class_name(&self) -> &str {
        "html"
    }

    fn import_data(&mut self, payload: &Value) {
        if let Some(markup) = payload.get("markup").and_then(Value::as_str) {
            self.markup = markup.to_string();
        }
    }

    fn bind(&mut self, input: &Value) -> bool {
        if let Some(markup) = input.get("markup").and_then(Value::as_str) {
            self.markup = markup.to_string();
            return true;
        }
        false
    }

    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.markup.trim().is_empty() {
            errors.add("markup", "markup cannot be blank");
        }
        errors
    }

    fn export_data(&self) -> Value {
        json!({ "markup": self.markup })
    }
}
