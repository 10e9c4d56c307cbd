use crate::builder::FieldFactory;
use crate::error::ConfigError;
use crate::fields::node::Node;
use indexmap::IndexMap;
use serde_json::Value as Json;
use std::sync::Arc;

/// Builds a node from its definition. Receives the factory so composite types
/// can build their children and resolve validator rules.
pub type FieldConstructor =
    Arc<dyn Fn(&FieldFactory, Json) -> Result<Node, ConfigError> + Send + Sync>;

#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, FieldConstructor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<String>, constructor: FieldConstructor) {
        self.types.insert(tag.into(), constructor);
    }

    pub fn get(&self, tag: &str) -> Option<&FieldConstructor> {
        self.types.get(tag)
    }

    pub fn remove(&mut self, tag: &str) -> Option<FieldConstructor> {
        self.types.shift_remove(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tags()).finish()
    }
}
