use std::collections::HashMap;
use std::fmt;

use crate::http::request::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// No `/` anywhere in the received bytes.
    MissingPath,
    /// A `/` was found but no space follows it.
    UnterminatedPath,
    /// The path bytes are not UTF-8.
    InvalidPath,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingPath => write!(f, "no request path"),
            ParseError::UnterminatedPath => write!(f, "request path not terminated"),
            ParseError::InvalidPath => write!(f, "request path is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses the raw bytes of a request.
///
/// The buffer may be truncated; the path only needs its terminating space and
/// headers are read for as far as they go.
pub fn parse_request(buf: &[u8]) -> Result<Request, ParseError> {
    let path = extract_path(buf)?;

    Ok(Request {
        path: path.to_string(),
        headers: parse_headers(buf),
    })
}

/// Returns the bytes between the first `/` and the next space, exclusive.
pub fn extract_path(buf: &[u8]) -> Result<&str, ParseError> {
    let start = buf
        .iter()
        .position(|&b| b == b'/')
        .ok_or(ParseError::MissingPath)?
        + 1;

    let len = buf[start..]
        .iter()
        .position(|&b| b == b' ')
        .ok_or(ParseError::UnterminatedPath)?;

    std::str::from_utf8(&buf[start..start + len]).map_err(|_| ParseError::InvalidPath)
}

/// Collects `Name: value` lines after the request line.
///
/// Names are lowercased. Lines without a colon, and a trailing partial line
/// cut off by the receive bound, are skipped.
fn parse_headers(buf: &[u8]) -> HashMap<String, String> {
    let text = String::from_utf8_lossy(buf);
    let head = match text.find("\r\n\r\n") {
        Some(end) => &text[..end],
        None => text.as_ref(),
    };

    let mut lines = head.split("\r\n");
    lines.next(); // request line

    let mut headers = HashMap::new();
    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
    }

    headers
}

/// Drops a query string or fragment from a request path.
pub fn strip_query(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Returns the substring after the last `.` in `path`, or `""` if there is none.
///
/// # Example
///
/// ```
/// # use filament::http::parser::extension;
/// assert_eq!(extension("assets/app.min.js"), "js");
/// assert_eq!(extension("LICENSE"), "");
/// ```
pub fn extension(path: &str) -> &str {
    path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

/// Checks an `Accept-Encoding` value for an acceptable gzip coding.
///
/// An explicit `gzip` or `x-gzip` entry decides on its own quality; `*` only
/// applies when neither is listed. A quality of zero means refused.
pub fn accepts_gzip(value: &str) -> bool {
    let mut gzip: Option<f32> = None;
    let mut wildcard: Option<f32> = None;

    for item in value.split(',') {
        let mut parts = item.split(';');
        let coding = parts.next().unwrap_or("").trim();
        let q = quality(parts);

        if coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip") {
            gzip = Some(gzip.map_or(q, |prev| prev.max(q)));
        } else if coding == "*" {
            wildcard = Some(q);
        }
    }

    gzip.or(wildcard).is_some_and(|q| q > 0.0)
}

/// The `q` parameter of a coding, `1.0` when absent or unparsable.
fn quality<'a>(params: impl Iterator<Item = &'a str>) -> f32 {
    params
        .filter_map(|p| {
            let (key, value) = p.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("q") {
                value.trim().parse::<f32>().ok()
            } else {
                None
            }
        })
        .next()
        .unwrap_or(1.0)
}
