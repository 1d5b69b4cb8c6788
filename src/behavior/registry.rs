//! BlockRegistry — maps discriminator tags to behavior factories.

use std::collections::HashMap;
use std::fmt;

use super::{BlockBehavior, HtmlBehavior, TextBehavior};

type BehaviorFactory = Box<dyn Fn() -> Box<dyn BlockBehavior> + Send + Sync>;

/// No behavior is registered for the requested class tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBlockType(pub String);

impl fmt::Display for UnknownBlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown block type: {}", self.0)
    }
}

impl std::error::Error for UnknownBlockType {}

/// Registry of block behaviors, keyed by `class_name`.
///
/// Behaviors are registered builder-style and resolved to a fresh boxed
/// instance per request, so bound state never leaks between requests.
///
/// ## Example
///
/// ```ignore
/// let registry = BlockRegistry::new()
///     .register("text", TextBehavior::default)
///     .register("gallery", GalleryBehavior::default);
/// let behavior = registry.resolve("text")?;
/// ```
pub struct BlockRegistry {
    factories: HashMap<String, BehaviorFactory>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in `text` and `html` behaviors.
    pub fn builtin() -> Self {
        Self::new()
            .register("text", TextBehavior::default)
            .register("html", HtmlBehavior::default)
    }

    /// Register a behavior factory for a class tag.
    ///
    /// Uses builder pattern — returns `self` for chaining. Registering the
    /// same tag twice replaces the earlier factory.
    pub fn register<F, B>(mut self, class_name: &str, factory: F) -> Self
    where
        F: Fn() -> B + Send + Sync + 'static,
        B: BlockBehavior + 'static,
    {
        self.factories.insert(
            class_name.to_string(),
            Box::new(move || Box::new(factory())),
        );
        self
    }

    /// Resolve a class tag to a fresh behavior instance.
    pub fn resolve(&self, class_name: &str) -> Result<Box<dyn BlockBehavior>, UnknownBlockType> {
        self.factories
            .get(class_name)
            .map(|factory| factory())
            .ok_or_else(|| UnknownBlockType(class_name.to_string()))
    }

    /// Whether a class tag has a registered behavior.
    pub fn contains(&self, class_name: &str) -> bool {
        self.factories.contains_key(class_name)
    }

    /// List registered class tags.
    pub fn class_names(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}
