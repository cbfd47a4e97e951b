#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use filament::config::Config;
use filament::context::ServeContext;
use tempfile::TempDir;

pub const INDEX_HTML: &[u8] = b"<p>hi</p>\n";

/// Serving root with a few files, kept alive by the returned `TempDir`.
pub fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.path().join("data.json"), "{\"k\":1}".repeat(200)).unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"plain").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    dir
}

pub fn config(root: &TempDir) -> Config {
    let mut cfg = Config::default();
    cfg.root = root.path().to_path_buf();
    cfg.listen_addr = "127.0.0.1:0".to_string();
    cfg.read_timeout_ms = 200;
    cfg.request_timeout_ms = 5_000;
    cfg
}

pub fn context(cfg: &Config) -> Arc<ServeContext> {
    Arc::new(ServeContext::from_config(cfg).unwrap())
}

/// A response split into status line, headers and body.
pub struct RawResponse {
    pub status_line: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn parse(raw: &[u8]) -> Self {
        let end = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has no header terminator");
        let head = std::str::from_utf8(&raw[..end]).unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();

        let headers = lines
            .map(|line| {
                let (k, v) = line.split_once(": ").expect("header line");
                (k.to_string(), v.to_string())
            })
            .collect();

        Self {
            status_line,
            headers,
            body: raw[end + 4..].to_vec(),
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    pub fn content_length(&self) -> usize {
        self.header("Content-Length").unwrap().parse().unwrap()
    }
}
