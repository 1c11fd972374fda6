//! Tag registry.

use crate::tag::normalize_name;
use crate::{ConfigurationError, TagDefinition, TagKind};

/// Immutable-after-build collection of tag definitions.
///
/// Opening tags are resolved by `(name, parameterized)`, closing tags by name
/// alone. When two definitions share the same key, the one registered first
/// wins for [`find_open`](Self::find_open).
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: Vec<TagDefinition>,
}

impl TagRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already-validated definitions.
    #[must_use]
    pub fn from_definitions(tags: impl IntoIterator<Item = TagDefinition>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
        }
    }

    /// Register a definition.
    pub fn register(&mut self, tag: TagDefinition) {
        self.tags.push(tag);
    }

    /// Create and register a definition in one step.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`TagDefinition::new`].
    pub fn define(
        &mut self,
        name: &str,
        parameterized: bool,
        open: &str,
        close: &str,
        kind: TagKind,
    ) -> Result<&mut Self, ConfigurationError> {
        self.register(TagDefinition::new(name, parameterized, open, close, kind)?);
        Ok(self)
    }

    /// Find the definition an opening tag resolves to.
    #[must_use]
    pub fn find_open(&self, name: &str, parameterized: bool) -> Option<&TagDefinition> {
        let key = normalize_name(name);
        self.tags
            .iter()
            .find(|t| t.parameterized() == parameterized && t.key() == key)
    }

    /// All definitions sharing `name`, parameterized or not.
    #[must_use]
    pub fn find_all_by_name(&self, name: &str) -> Vec<&TagDefinition> {
        let key = normalize_name(name);
        self.tags.iter().filter(|t| t.key() == key).collect()
    }

    /// Iterate over definitions in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, TagDefinition> {
        self.tags.iter()
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<'a> IntoIterator for &'a TagRegistry {
    type Item = &'a TagDefinition;
    type IntoIter = std::slice::Iter<'a, TagDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
