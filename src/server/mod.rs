//! Server lifecycle: listening socket, accept loop and shutdown.

pub mod listener;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::context::ServeContext;
use crate::http::connection::Connection;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Owns the listening socket for as long as the server runs.
pub struct Server {
    listener: TcpListener,
    ctx: Arc<ServeContext>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

/// Stops a running [`Server`]. Cheap to clone.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

impl Server {
    /// Binds the configured address. Must be called inside a Tokio runtime.
    pub fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let ctx = ServeContext::from_config(cfg)?;
        let addr = cfg.socket_addr()?;
        let listener = listener::bind(addr, cfg.backlog)?;
        Ok(Self::with_listener(listener, ctx))
    }

    pub fn with_listener(listener: TcpListener, ctx: ServeContext) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            listener,
            ctx: Arc::new(ctx),
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Accepts connections until shut down, one task per connection.
    ///
    /// After shutdown the listener is closed first, then in-flight
    /// connections are allowed to finish.
    pub async fn run(self) -> anyhow::Result<()> {
        let Server {
            listener,
            ctx,
            shutdown_tx: _shutdown_tx,
            mut shutdown_rx,
        } = self;

        info!(
            addr = %listener.local_addr()?,
            root = %ctx.resolver.root().display(),
            "Listening"
        );

        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (socket, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            back_off_after_accept_error(&e).await;
                            continue;
                        }
                    };

                    tracing::debug!(%peer, "Accepted connection");
                    let ctx = Arc::clone(&ctx);
                    let span = tracing::info_span!("conn", %peer);

                    connections.spawn(
                        async move {
                            match Connection::new(socket, ctx).serve().await {
                                Ok(bytes) => info!(status = 200, bytes, "Request served"),
                                Err(e) => match e.status() {
                                    Some(status) => info!(status = status.as_u16(), error = %e, "Request failed"),
                                    None => tracing::debug!(error = %e, "Connection closed without response"),
                                },
                            }
                        }
                        .instrument(span),
                    );
                }

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }

                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        drop(listener);
        info!(in_flight = connections.len(), "Shutting down");

        while connections.join_next().await.is_some() {}

        Ok(())
    }
}

/// Usually fd exhaustion; retrying at once would spin until a connection closes.
async fn back_off_after_accept_error(e: &std::io::Error) {
    tracing::warn!(error = %e, "Accept failed");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accept_error_waits_before_retry() {
        let err = std::io::Error::from_raw_os_error(24); // EMFILE
        let started = std::time::Instant::now();

        back_off_after_accept_error(&err).await;

        assert!(started.elapsed() >= ACCEPT_BACKOFF);
    }
}
