//! Read-only state shared by every connection.

use std::time::Duration;

use anyhow::Context;

use crate::config::{Config, GzipConfig};
use crate::http::mime::ContentTypeRegistry;
use crate::http::resolver::FileResolver;

/// Built once at startup and handed to connections behind an `Arc`.
/// Nothing in here changes while the server runs.
#[derive(Debug, Clone)]
pub struct ServeContext {
    pub content_types: ContentTypeRegistry,
    pub resolver: FileResolver,
    pub default_content_type: Option<String>,
    pub max_request_bytes: usize,
    pub read_timeout: Duration,
    pub request_timeout: Duration,
    pub cache_max_age: u64,
    pub gzip: GzipConfig,
}

impl ServeContext {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let resolver = FileResolver::new(&cfg.root)
            .with_context(|| format!("cannot serve from {}", cfg.root.display()))?;

        let mut content_types = match cfg.content_type_limit {
            Some(limit) => ContentTypeRegistry::bounded(limit),
            None => ContentTypeRegistry::new(),
        };
        content_types.register_defaults();

        // Sorted so a bounded registry keeps the same entries on every start.
        let mut extra: Vec<_> = cfg.content_types.iter().collect();
        extra.sort();
        for (ext, mime) in extra {
            content_types.register(ext.as_str(), mime.as_str());
        }

        Ok(Self {
            content_types,
            resolver,
            default_content_type: cfg.default_content_type.clone(),
            max_request_bytes: cfg.max_request_bytes.max(1),
            read_timeout: cfg.read_timeout(),
            request_timeout: cfg.request_timeout(),
            cache_max_age: cfg.cache_max_age,
            gzip: cfg.gzip.clone(),
        })
    }

    /// Content type for an extension, falling back to the configured default.
    pub fn content_type(&self, extension: &str) -> Option<&str> {
        self.content_types
            .lookup(extension)
            .or(self.default_content_type.as_deref())
    }

    /// Whether a body of `len` bytes should be gzipped for a client that accepts it.
    pub fn should_gzip(&self, len: u64) -> bool {
        self.gzip.enabled && len >= self.gzip.min_bytes && len <= self.gzip.max_bytes
    }
}
