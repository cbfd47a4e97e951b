//! Filament - minimal HTTP/1.0 static file server
//!
//! Serves files from a single root directory, one request per connection,
//! with optional gzip compression.

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod server;
