/// HTTP status codes the server can emit.
///
/// - `Ok` (200): File found and sent
/// - `BadRequest` (400): No path could be extracted from the request
/// - `Forbidden` (403): File exists but cannot be read
/// - `NotFound` (404): Path does not name a file under the serving root
/// - `InternalServerError` (500): Any other failure before headers were sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use filament::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Status line and headers of a response.
///
/// Headers keep insertion order so identical requests produce identical bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
}

/// Builder for a [`ResponseHead`].
///
/// # Example
///
/// ```
/// # use filament::http::response::{ResponseBuilder, StatusCode};
/// let head = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .content_length(10)
///     .build();
/// assert_eq!(head.header("Content-Length"), Some("10"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Adds a header, replacing any earlier header with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Adds a header only when `value` is present.
    pub fn optional_header(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.header(key, v),
            None => self,
        }
    }

    pub fn content_length(self, len: u64) -> Self {
        self.header("Content-Length", len.to_string())
    }

    pub fn build(self) -> ResponseHead {
        ResponseHead {
            status: self.status,
            headers: self.headers,
        }
    }
}

impl ResponseHead {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Head for a short plain-text error body of `body_len` bytes.
    pub fn error(status: StatusCode, body_len: usize) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", "text/plain")
            .content_length(body_len as u64)
            .build()
    }
}

/// Body text sent with an error status, e.g. `"404 Not Found\n"`.
pub fn error_body(status: StatusCode) -> String {
    format!("{} {}\n", status.as_u16(), status.reason_phrase())
}
