//! Container format descriptors and their registry.

use super::Demuxer;
use crate::error::{Error, Result};

/// Descriptor for one container format.
///
/// A descriptor is cheap, stateless, and lives for the whole process; the
/// per-container state lives in the [`Demuxer`] it creates. `probe` must be
/// a pure function of the prefix: no side effects, no source consumption.
pub trait ContainerFormat: Send + Sync {
    /// Unique short name (registry key), e.g. `"aac"`.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        ""
    }

    /// File-extension hints. Advisory only: extensions are never used for
    /// format selection, only probing is.
    fn extensions(&self) -> &'static [&'static str] {
        &[]
    }

    /// Score a byte prefix in `[0, SCORE_MAX]`. Higher means more likely
    /// a correct match; zero means "not this format".
    fn probe(&self, prefix: &[u8]) -> u8;

    /// Create a fresh demuxer for one container.
    fn create(&self) -> Box<dyn Demuxer>;
}

/// Immutable, process-lifetime list of container format descriptors.
///
/// Built once at startup via [`FormatRegistry::builder`] (or
/// [`with_defaults`](FormatRegistry::with_defaults)) and shared by
/// reference afterwards. There is no interior mutability: once built, no
/// writer exists, so concurrent read-only use needs no synchronization.
///
/// Iteration order is registration order; the registry is small (tens of
/// entries), so lookup is a linear scan.
pub struct FormatRegistry {
    formats: Vec<Box<dyn ContainerFormat>>,
}

impl FormatRegistry {
    /// Start building a registry.
    pub fn builder() -> FormatRegistryBuilder {
        FormatRegistryBuilder {
            formats: Vec::new(),
        }
    }

    /// A registry with the built-in formats: ADTS AAC, then the raw
    /// fallback.
    pub fn with_defaults() -> Self {
        Self::builder()
            .register(Box::new(super::AdtsFormat))
            .register(Box::new(super::RawFormat))
            .build()
            .expect("built-in formats have unique names")
    }

    /// Look up a format by name.
    pub fn find(&self, name: &str) -> Option<&dyn ContainerFormat> {
        self.formats
            .iter()
            .map(|f| f.as_ref())
            .find(|f| f.name() == name)
    }

    /// Iterate over the descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ContainerFormat> {
        self.formats.iter().map(|f| f.as_ref())
    }

    /// Names of all registered formats, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.names())
            .finish()
    }
}

/// Builder for a [`FormatRegistry`].
///
/// Registration happens here, before any concurrent use; `build` seals the
/// registry.
pub struct FormatRegistryBuilder {
    formats: Vec<Box<dyn ContainerFormat>>,
}

impl FormatRegistryBuilder {
    /// Register a format descriptor. Registration order determines probe
    /// iteration order and tie-breaking.
    pub fn register(mut self, format: Box<dyn ContainerFormat>) -> Self {
        self.formats.push(format);
        self
    }

    /// Seal the registry. Fails if two descriptors share a name.
    pub fn build(self) -> Result<FormatRegistry> {
        for (i, format) in self.formats.iter().enumerate() {
            if self.formats[..i].iter().any(|f| f.name() == format.name()) {
                return Err(Error::Registry(format!(
                    "duplicate format name '{}'",
                    format.name()
                )));
            }
        }
        Ok(FormatRegistry {
            formats: self.formats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demux::{AdtsFormat, RawFormat};

    #[test]
    fn test_registry_defaults() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["aac", "data"]);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_registry_find() {
        let registry = FormatRegistry::with_defaults();
        assert!(registry.find("aac").is_some());
        assert_eq!(registry.find("aac").unwrap().extensions(), &["aac"]);
        assert!(registry.find("mkv").is_none());
    }

    #[test]
    fn test_registry_order_is_registration_order() {
        let registry = FormatRegistry::builder()
            .register(Box::new(RawFormat))
            .register(Box::new(AdtsFormat))
            .build()
            .unwrap();
        assert_eq!(registry.names(), vec!["data", "aac"]);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let result = FormatRegistry::builder()
            .register(Box::new(AdtsFormat))
            .register(Box::new(AdtsFormat))
            .build();
        assert!(matches!(result, Err(Error::Registry(_))));
    }
}
