use std::io;

use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{ResponseBuilder, ResponseHead, StatusCode};
use crate::http::transfer::FileSink;

const HTTP_VERSION: &str = "HTTP/1.0";

fn serialize_head(head: &ResponseHead) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        head.status.as_u16(),
        head.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &head.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Head of a successful file response.
///
/// `Content-Encoding` and `Vary` are only present when the body really is
/// gzip data.
pub fn file_head(content_type: Option<&str>, len: u64, gzipped: bool, cache_max_age: u64) -> ResponseHead {
    let mut builder = ResponseBuilder::new(StatusCode::Ok)
        .optional_header("Content-Type", content_type)
        .content_length(len);

    if gzipped {
        builder = builder
            .header("Content-Encoding", "gzip")
            .header("Vary", "Accept-Encoding");
    }

    builder
        .header("Cache-Control", format!("max-age={cache_max_age}"))
        .build()
}

/// Writes a response onto a connection and counts the body bytes sent.
pub struct ResponseWriter<'a, W> {
    stream: &'a mut W,
    body_written: u64,
}

impl<'a, W> ResponseWriter<'a, W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(stream: &'a mut W) -> Self {
        Self {
            stream,
            body_written: 0,
        }
    }

    pub async fn send_headers(&mut self, head: &ResponseHead) -> io::Result<()> {
        self.stream.write_all(&serialize_head(head)).await
    }

    pub async fn send_bytes(&mut self, body: &[u8]) -> io::Result<()> {
        self.stream.write_all(body).await?;
        self.body_written += body.len() as u64;
        self.stream.flush().await
    }

    /// Writes a complete error response with a short text body.
    pub async fn send_error(&mut self, status: StatusCode) -> io::Result<()> {
        let body = crate::http::response::error_body(status);
        self.send_headers(&ResponseHead::error(status, body.len()))
            .await?;
        self.send_bytes(body.as_bytes()).await
    }

    pub fn body_written(&self) -> u64 {
        self.body_written
    }
}

impl<W> ResponseWriter<'_, W>
where
    W: FileSink,
{
    /// Sends exactly `len` bytes of `file` to the connection.
    ///
    /// Fails with `UnexpectedEof` if the file ends early; the declared
    /// `Content-Length` can then no longer be honored.
    pub async fn send_body(&mut self, file: &mut File, len: u64) -> io::Result<u64> {
        let sent = self.stream.send_file(file, len).await?;
        self.body_written += sent;

        if sent != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("sent {sent} of {len} declared bytes"),
            ));
        }

        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_uses_crlf_and_blank_line() {
        let head = file_head(Some("text/html"), 10, false, 31_536_000);

        assert_eq!(
            serialize_head(&head),
            b"HTTP/1.0 200 OK\r\n\
              Content-Type: text/html\r\n\
              Content-Length: 10\r\n\
              Cache-Control: max-age=31536000\r\n\r\n"
                .to_vec()
        );
    }

    #[test]
    fn unknown_type_omits_content_type() {
        let head = file_head(None, 3, false, 60);

        assert_eq!(head.header("Content-Type"), None);
        assert_eq!(head.header("Content-Length"), Some("3"));
    }
}
