//! Content-Type registry.
//!
//! Maps file extensions to MIME types. The registry is assembled once at
//! startup and then shared read-only between all connections.

use std::collections::HashMap;

/// Entries every registry starts with.
pub const DEFAULT_CONTENT_TYPES: [(&str, &str); 5] = [
    ("css", "text/css"),
    ("html", "text/html"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("ico", "image/x-icon"),
];

#[derive(Debug, Clone, Default)]
pub struct ContentTypeRegistry {
    entries: HashMap<String, String>,
    limit: Option<usize>,
}

impl ContentTypeRegistry {
    /// Creates an empty, unbounded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that holds at most `limit` entries.
    pub fn bounded(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            limit: Some(limit),
        }
    }

    /// Creates an unbounded registry seeded with [`DEFAULT_CONTENT_TYPES`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    pub fn register_defaults(&mut self) {
        for (ext, mime) in DEFAULT_CONTENT_TYPES {
            self.register(ext, mime);
        }
    }

    /// Adds or replaces the MIME type for `extension`.
    ///
    /// Once the registry is full, new extensions are dropped with a warning;
    /// replacing an existing entry is always allowed. Returns whether the
    /// entry is now present.
    ///
    /// # Example
    ///
    /// ```
    /// # use filament::http::mime::ContentTypeRegistry;
    /// let mut registry = ContentTypeRegistry::bounded(1);
    /// assert!(registry.register("css", "text/css"));
    /// assert!(!registry.register("html", "text/html"));
    /// assert_eq!(registry.lookup("html"), None);
    /// ```
    pub fn register(&mut self, extension: impl Into<String>, mime_type: impl Into<String>) -> bool {
        let extension = extension.into();

        if let Some(limit) = self.limit {
            if self.entries.len() >= limit && !self.entries.contains_key(&extension) {
                tracing::warn!(
                    extension = %extension,
                    limit,
                    "Content type registry full, entry ignored"
                );
                return false;
            }
        }

        self.entries.insert(extension, mime_type.into());
        true
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, extension: &str) -> Option<&str> {
        self.entries.get(extension).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let registry = ContentTypeRegistry::with_defaults();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.lookup("json"), Some("application/json"));
        assert_eq!(registry.lookup("ico"), Some("image/x-icon"));
        assert_eq!(registry.lookup("txt"), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = ContentTypeRegistry::with_defaults();

        assert_eq!(registry.lookup("HTML"), None);
        assert_eq!(registry.lookup(""), None);
    }

    #[test]
    fn bounded_registry_allows_replacing_when_full() {
        let mut registry = ContentTypeRegistry::bounded(1);
        registry.register("css", "text/css");

        assert!(registry.register("css", "text/plain"));
        assert_eq!(registry.lookup("css"), Some("text/plain"));
        assert_eq!(registry.len(), 1);
    }
}
