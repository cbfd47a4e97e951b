//! Server configuration.
//!
//! Settings come from an optional YAML file named by `FILAMENT_CONFIG`, with
//! `LISTEN`, `FILAMENT_ROOT` and `FILAMENT_LOG` overriding individual fields.
//! Every field has a default so an empty environment yields a working server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "FILAMENT_CONFIG";
pub const LISTEN_ENV: &str = "LISTEN";
pub const ROOT_ENV: &str = "FILAMENT_ROOT";
pub const LOG_ENV: &str = "FILAMENT_LOG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the listener binds to.
    pub listen_addr: String,
    /// Pending-connection queue length passed to `listen(2)`.
    pub backlog: i32,
    /// Directory files are served from.
    pub root: PathBuf,
    /// Upper bound on bytes read for a single request.
    pub max_request_bytes: usize,
    /// Timeout for each individual read while receiving the request.
    pub read_timeout_ms: u64,
    /// Timeout for the whole request, receive through body transfer.
    pub request_timeout_ms: u64,
    /// `max-age` value of the `Cache-Control` header on successful responses.
    pub cache_max_age: u64,
    /// Content type sent for extensions the registry does not know.
    /// `None` omits the header entirely.
    pub default_content_type: Option<String>,
    pub gzip: GzipConfig,
    /// Extra extension to MIME type entries, applied over the built-in ones.
    pub content_types: HashMap<String, String>,
    /// Optional ceiling on the number of registry entries.
    pub content_type_limit: Option<usize>,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GzipConfig {
    pub enabled: bool,
    /// Files smaller than this are always sent as-is.
    pub min_bytes: u64,
    /// Files larger than this are always sent as-is; compression buffers the
    /// whole body in memory.
    pub max_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            backlog: 10,
            root: PathBuf::from("."),
            max_request_bytes: 8 * 1024,
            read_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
            cache_max_age: 31_536_000,
            default_content_type: None,
            gzip: GzipConfig::default(),
            content_types: HashMap::new(),
            content_type_limit: None,
            log_level: "info".to_string(),
        }
    }
}

impl Default for GzipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_bytes: 0,
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Loads the configuration from the environment.
    ///
    /// Reads the YAML file named by `FILAMENT_CONFIG` when set, then applies
    /// the single-field environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var(LISTEN_ENV) {
            cfg.listen_addr = addr;
        }
        if let Ok(root) = std::env::var(ROOT_ENV) {
            cfg.root = PathBuf::from(root);
        }
        if let Ok(level) = std::env::var(LOG_ENV) {
            cfg.log_level = level;
        }

        Ok(cfg)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config file {path}"))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(raw)?;
        Ok(cfg)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen_addr
            .parse()
            .with_context(|| format!("invalid listen address {}", self.listen_addr))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
