//! HTTP/1.0 static file serving.
//!
//! Every connection carries exactly one request. The server reads it, picks
//! out the requested path and the `Accept-Encoding` header, and answers with
//! the file or an error status before closing.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine driving the pipeline below
//! - **`parser`**: Extracts the path and headers from the raw request bytes
//! - **`request`**: The parsed request
//! - **`resolver`**: Maps the path onto an open file under the serving root
//! - **`mime`**: Extension to Content-Type registry
//! - **`compress`**: gzip encoding for clients that accept it
//! - **`response`**: Status codes and response heads
//! - **`writer`**: Writes status line, headers and body to the connection
//! - **`transfer`**: File body copy, `sendfile(2)` for TCP on Linux
//!
//! # Connection State Machine
//!
//! ```text
//!   Receiving ──► Parsing ──► Resolving ──► Negotiating ──► HeaderSent ──► BodySent
//!       │            │            │              │               │            │
//!       └────────────┴────────────┴──────┬───────┴───────────────┘            │
//!                                        ▼                                    │
//!                                     Failed ─► (400/403/404/500 if any) ─►  Closed
//! ```
//!
//! The file handle and the socket are owned by the connection and released
//! when it reaches `Closed`, whichever path led there.

pub mod compress;
pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod transfer;
pub mod writer;
