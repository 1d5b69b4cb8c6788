//! Built-in `text` block — a titled body of plain content.

use serde_json::{json, Value};

use super::{BlockBehavior, ValidationErrors};

/// Behavior for the `text` block class.
#[derive(Debug, Default, Clone)]
pub struct TextBehavior {
    title: String,
    content: String,
}

impl BlockBehavior for TextBehavior {
    fn class_name(&self) -> &str {
        "text"
    }

    fn import_data(&mut self, payload: &Value) {
        if let Some(title) = payload.get("title").and_then(Value::as_str) {
            self.title = title.to_string();
        }
        if let Some(content) = payload.get("content").and_then(Value::as_str) {
            self.content = content.to_string();
        }
    }

    fn bind(&mut self, input: &Value) -> bool {
        let mut bound = false;
        if let Some(title) = input.get("title").and_then(Value::as_str) {
            self.title = title.to_string();
            bound = true;
        }
        if let Some(content) = input.get("content").and_then(Value::as_str) {
            self.content = content.to_string();
            bound = true;
        }
        bound
    }

    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.content.trim().is_empty() {
            errors.add("content", "content cannot be blank");
        }
        errors
    }

    fn export_data(&self) -> Value {
        json!({
            "title": self.title,
            "content": self.content,
        })
    }
}
