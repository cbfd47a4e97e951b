use std::collections::HashMap;

use crate::http::parser;

/// A request as far as the server cares about it.
///
/// Method and version are never consulted; every request is treated as a GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Requested path without the leading `/` (e.g. `"index.html"`)
    pub path: String,
    /// Request headers, keyed by lowercased name
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    /// Retrieves a header value by name, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use filament::http::request::Request;
    /// let req = Request::new("index.html").with_header("Accept-Encoding", "gzip");
    /// assert_eq!(req.header("accept-encoding"), Some("gzip"));
    /// assert_eq!(req.header("Host"), None);
    /// ```
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Whether the client listed gzip as an acceptable content coding.
    pub fn accepts_gzip(&self) -> bool {
        self.header("Accept-Encoding")
            .map(parser::accepts_gzip)
            .unwrap_or(false)
    }

    /// The path with any query string or fragment removed.
    pub fn file_path(&self) -> &str {
        parser::strip_query(&self.path)
    }

    /// The extension used for the content-type lookup.
    pub fn extension(&self) -> &str {
        parser::extension(self.file_path())
    }
}
