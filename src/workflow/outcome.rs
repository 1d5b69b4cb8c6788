//! Terminal outcomes of a workflow operation.
//!
//! Every operation ends in exactly one of three ways: a redirect, a JSON
//! payload for asynchronous clients, or a named template plus data bag
//! for the (opaque) view renderer. Modeling this explicitly keeps flow
//! control out of the transport layer.

use serde_json::Value;

/// Terminal response of a workflow operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Redirect(Redirect),
    Json(Value),
    Render(Rendering),
}

impl Outcome {
    /// A JSON payload outcome.
    pub fn json(value: Value) -> Self {
        Outcome::Json(value)
    }

    /// A render outcome: template name plus data bag.
    pub fn render(template: impl Into<String>, data: Value) -> Self {
        Outcome::Render(Rendering {
            template: template.into(),
            data,
        })
    }

    pub fn as_redirect(&self) -> Option<&Redirect> {
        match self {
            Outcome::Redirect(redirect) => Some(redirect),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Outcome::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_render(&self) -> Option<&Rendering> {
        match self {
            Outcome::Render(rendering) => Some(rendering),
            _ => None,
        }
    }
}

impl From<Redirect> for Outcome {
    fn from(redirect: Redirect) -> Self {
        Outcome::Redirect(redirect)
    }
}

/// A redirect target: route name plus query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub route: String,
    pub params: Vec<(String, String)>,
}

impl Redirect {
    pub fn to(route: impl Into<String>) -> Self {
        Redirect {
            route: route.into(),
            params: Vec::new(),
        }
    }

    /// Append a query parameter. Builder pattern.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// The parameter value for a key, if present.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render the target as a path with query string.
    pub fn location(&self) -> String {
        let mut location = if self.route.starts_with('/') {
            self.route.clone()
        } else {
            format!("/{}", self.route)
        };
        for (i, (key, value)) in self.params.iter().enumerate() {
            location.push(if i == 0 && !location.contains('?') { '?' } else { '&' });
            location.push_str(key);
            location.push('=');
            location.push_str(value);
        }
        location
    }
}

/// A named template plus the data bag handed to the view renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    pub template: String,
    pub data: Value,
}
