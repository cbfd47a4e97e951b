//! Copying file bodies onto a connection.
//!
//! TCP sockets on Linux use `sendfile(2)` so file bytes go straight from the
//! page cache to the socket. Every other stream gets a buffered copy.

use std::future::Future;
use std::io;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tokio::net::TcpStream;

/// A connection that can take a file body.
pub trait FileSink: AsyncWrite + Unpin + Send {
    /// Sends at most `len` bytes from the start of `file` and returns how
    /// many were sent. Fewer than `len` means the file ended early.
    fn send_file<'a>(
        &'a mut self,
        file: &'a mut File,
        len: u64,
    ) -> impl Future<Output = io::Result<u64>> + Send + 'a;
}

/// Buffered copy through user space.
pub async fn copy_file<W>(writer: &mut W, file: &mut File, len: u64) -> io::Result<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut limited = (&mut *file).take(len);
    let copied = tokio::io::copy(&mut limited, writer).await?;
    writer.flush().await?;
    Ok(copied)
}

impl FileSink for TcpStream {
    fn send_file<'a>(
        &'a mut self,
        file: &'a mut File,
        len: u64,
    ) -> impl Future<Output = io::Result<u64>> + Send + 'a {
        async move {
            #[cfg(target_os = "linux")]
            {
                linux::sendfile_all(self, file, len).await
            }
            #[cfg(not(target_os = "linux"))]
            {
                copy_file(self, file, len).await
            }
        }
    }
}

impl FileSink for DuplexStream {
    fn send_file<'a>(
        &'a mut self,
        file: &'a mut File,
        len: u64,
    ) -> impl Future<Output = io::Result<u64>> + Send + 'a {
        copy_file(self, file, len)
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use std::io;

    use nix::libc;
    use nix::sys::sendfile::sendfile;
    use tokio::fs::File;
    use tokio::io::Interest;
    use tokio::net::TcpStream;

    // Largest count a single sendfile call accepts is just under 2 GiB.
    const MAX_CHUNK: u64 = 0x7fff_f000;

    /// Drives non-blocking `sendfile` calls off socket write readiness.
    ///
    /// Falls back to a buffered copy when the file does not support
    /// sendfile and nothing has been sent yet.
    pub(super) async fn sendfile_all(stream: &mut TcpStream, file: &mut File, len: u64) -> io::Result<u64> {
        let mut offset: libc::off_t = 0;
        let mut sent = 0u64;

        while sent < len {
            stream.writable().await?;

            let count = (len - sent).min(MAX_CHUNK) as usize;
            let result = stream.try_io(Interest::WRITABLE, || {
                sendfile(&*stream, &*file, Some(&mut offset), count).map_err(io::Error::from)
            });

            match result {
                Ok(0) => break,
                Ok(n) => sent += n as u64,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
                Err(e) if sent == 0 && is_unsupported(&e) => {
                    tracing::debug!(error = %e, "sendfile unavailable, copying instead");
                    return super::copy_file(stream, file, len).await;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(sent)
    }

    fn is_unsupported(e: &io::Error) -> bool {
        matches!(e.raw_os_error(), Some(libc::EINVAL) | Some(libc::ENOSYS))
    }
}
