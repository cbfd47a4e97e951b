//! gzip encoding of response bodies.

use std::io::{self, Write};

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Upper bound on the read buffer reserved ahead of time.
const PREALLOC_LIMIT: u64 = 1 << 20;

pub fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Reads exactly `len` bytes from `file` and gzips them off the async runtime.
///
/// The whole body is produced before returning so its length can go into
/// the `Content-Length` header.
pub async fn gzip_file(file: &mut File, len: u64) -> io::Result<Bytes> {
    let mut raw = Vec::with_capacity(len.min(PREALLOC_LIMIT) as usize);
    (&mut *file).take(len).read_to_end(&mut raw).await?;

    if raw.len() as u64 != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("file shrank from {len} to {} bytes", raw.len()),
        ));
    }

    let compressed = tokio::task::spawn_blocking(move || gzip(&raw))
        .await
        .map_err(io::Error::other)??;

    Ok(Bytes::from(compressed))
}
