use std::io;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

use crate::context::ServeContext;
use crate::error::ServeError;
use crate::http::compress;
use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::resolver::ResolvedFile;
use crate::http::transfer::FileSink;
use crate::http::writer::{ResponseWriter, file_head};

/// Handles exactly one request on one connection, then closes it.
pub struct Connection<S> {
    stream: S,
    ctx: Arc<ServeContext>,
    state: ConnectionState,
    body_sent: u64,
}

pub enum ConnectionState {
    Receiving,
    Parsing(BytesMut),
    Resolving(Request),
    Negotiating(Request, ResolvedFile),
    HeaderSent(Body),
    BodySent,
    Failed(ServeError),
    Closed,
}

/// What follows the headers once they are on the wire.
pub enum Body {
    File(ResolvedFile),
    Bytes(Bytes),
}

impl<S> Connection<S>
where
    S: AsyncRead + FileSink,
{
    pub fn new(stream: S, ctx: Arc<ServeContext>) -> Self {
        Self {
            stream,
            ctx,
            state: ConnectionState::Receiving,
            body_sent: 0,
        }
    }

    /// Runs the connection to completion under the overall request deadline.
    ///
    /// Returns the number of body bytes sent for a successful response. On
    /// timeout the in-flight work is dropped, which closes the socket and any
    /// open file.
    pub async fn serve(self) -> Result<u64, ServeError> {
        let deadline = self.ctx.request_timeout;
        match timeout(deadline, self.run()).await {
            Ok(result) => result,
            Err(_) => Err(ServeError::Timeout),
        }
    }

    pub async fn run(mut self) -> Result<u64, ServeError> {
        let mut failure = None;

        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Receiving => match self.read_request().await {
                    Ok(buf) => ConnectionState::Parsing(buf),
                    Err(e) => ConnectionState::Failed(e),
                },

                ConnectionState::Parsing(buf) => match parse_request(&buf) {
                    Ok(req) => ConnectionState::Resolving(req),
                    Err(e) => ConnectionState::Failed(e.into()),
                },

                ConnectionState::Resolving(req) => {
                    match self.ctx.resolver.resolve(req.file_path()).await {
                        Ok(file) => ConnectionState::Negotiating(req, file),
                        Err(e) => ConnectionState::Failed(e.into()),
                    }
                }

                ConnectionState::Negotiating(req, file) => match self.negotiate(&req, file).await {
                    Ok(body) => ConnectionState::HeaderSent(body),
                    Err(e) => ConnectionState::Failed(e),
                },

                ConnectionState::HeaderSent(body) => match self.send_body(body).await {
                    Ok(()) => ConnectionState::BodySent,
                    Err(e) => ConnectionState::Failed(ServeError::Transfer(e)),
                },

                ConnectionState::BodySent => {
                    let _ = self.stream.shutdown().await;
                    ConnectionState::Closed
                }

                ConnectionState::Failed(e) => {
                    if let Some(status) = e.status() {
                        let mut writer = ResponseWriter::new(&mut self.stream);
                        if let Err(write_err) = writer.send_error(status).await {
                            tracing::debug!(error = %write_err, "Failed to send error response");
                        }
                        let _ = self.stream.shutdown().await;
                    }
                    failure = Some(e);
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(self.body_sent),
        }
    }

    /// Reads until the end of the request headers, EOF, or the size bound.
    ///
    /// A read that times out after some bytes arrived ends the request rather
    /// than failing it.
    async fn read_request(&mut self) -> Result<BytesMut, ServeError> {
        let limit = self.ctx.max_request_bytes;
        let mut buf = BytesMut::with_capacity(limit.min(4096));

        while buf.len() < limit && find_headers_end(&buf).is_none() {
            let remaining = (limit - buf.len()) as u64;
            let mut limited = (&mut self.stream).take(remaining);

            match timeout(self.ctx.read_timeout, limited.read_buf(&mut buf)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(_)) => {}
                Ok(Err(e)) => return Err(ServeError::Receive(Some(e))),
                Err(_) if buf.is_empty() => {
                    return Err(ServeError::Receive(Some(io::Error::new(
                        io::ErrorKind::TimedOut,
                        "no request data before read timeout",
                    ))));
                }
                Err(_) => break,
            }
        }

        if buf.is_empty() {
            return Err(ServeError::Receive(None));
        }

        Ok(buf)
    }

    /// Decides on the representation and sends the headers for it.
    ///
    /// A compressed body is fully produced first so its length is known
    /// before anything is written.
    async fn negotiate(&mut self, req: &Request, mut file: ResolvedFile) -> Result<Body, ServeError> {
        let ctx = Arc::clone(&self.ctx);
        let content_type = ctx.content_type(req.extension());

        let body = if req.accepts_gzip() && ctx.should_gzip(file.len) {
            let compressed = compress::gzip_file(&mut file.file, file.len)
                .await
                .map_err(|e| ServeError::Internal(format!("gzip failed: {e}")))?;
            tracing::debug!(
                path = %req.path,
                original = file.len,
                compressed = compressed.len(),
                "Compressed response body"
            );
            Body::Bytes(compressed)
        } else {
            Body::File(file)
        };

        let head = match &body {
            Body::File(f) => file_head(content_type, f.len, false, ctx.cache_max_age),
            Body::Bytes(b) => file_head(content_type, b.len() as u64, true, ctx.cache_max_age),
        };

        ResponseWriter::new(&mut self.stream)
            .send_headers(&head)
            .await
            .map_err(ServeError::Transfer)?;

        Ok(body)
    }

    async fn send_body(&mut self, body: Body) -> io::Result<()> {
        let mut writer = ResponseWriter::new(&mut self.stream);

        let result = match body {
            Body::File(mut f) => writer.send_body(&mut f.file, f.len).await.map(|_| ()),
            Body::Bytes(b) => writer.send_bytes(&b).await,
        };

        self.body_sent = writer.body_written();
        result
    }
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
