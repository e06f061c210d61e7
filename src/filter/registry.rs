//! Filter factory registry.

use super::FilterNode;
use crate::error::{Error, Result};

/// Factory producing a fresh, unconfigured filter node.
pub type FilterFactory = fn() -> Box<dyn FilterNode>;

/// Immutable registry of filter factories.
///
/// The filter-side twin of
/// [`FormatRegistry`](crate::demux::FormatRegistry): built once at startup,
/// read-only afterwards, iteration and lookup in registration order.
pub struct FilterRegistry {
    entries: Vec<(&'static str, FilterFactory)>,
}

impl FilterRegistry {
    /// Start building a registry.
    pub fn builder() -> FilterRegistryBuilder {
        FilterRegistryBuilder {
            entries: Vec::new(),
        }
    }

    /// A registry with the built-in filters: `setsar` and `passthrough`.
    pub fn with_defaults() -> Self {
        Self::builder()
            .register("setsar", || Box::new(super::SetSar::new()))
            .register("passthrough", || Box::new(super::PassThrough::new()))
            .build()
            .expect("built-in filters have unique names")
    }

    /// Create an unconfigured node by filter name.
    pub fn create(&self, name: &str) -> Result<Box<dyn FilterNode>> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| Error::Registry(format!("unknown filter '{name}'")))
    }

    /// Names of all registered filters, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(n, _)| *n).collect()
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

/// Builder for a [`FilterRegistry`].
pub struct FilterRegistryBuilder {
    entries: Vec<(&'static str, FilterFactory)>,
}

impl FilterRegistryBuilder {
    /// Register a filter factory under a name.
    pub fn register(mut self, name: &'static str, factory: FilterFactory) -> Self {
        self.entries.push((name, factory));
        self
    }

    /// Seal the registry. Fails if two factories share a name.
    pub fn build(self) -> Result<FilterRegistry> {
        for (i, (name, _)) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|(n, _)| n == name) {
                return Err(Error::Registry(format!("duplicate filter name '{name}'")));
            }
        }
        Ok(FilterRegistry {
            entries: self.entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = FilterRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["setsar", "passthrough"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_create_known_filter() {
        let registry = FilterRegistry::with_defaults();
        let node = registry.create("setsar").unwrap();
        assert_eq!(node.name(), "setsar");
    }

    #[test]
    fn test_create_unknown_filter() {
        let registry = FilterRegistry::with_defaults();
        assert!(matches!(
            registry.create("vflip"),
            Err(Error::Registry(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = FilterRegistry::builder()
            .register("setsar", || Box::new(super::super::SetSar::new()))
            .register("setsar", || Box::new(super::super::SetSar::new()))
            .build();
        assert!(matches!(result, Err(Error::Registry(_))));
    }
}
