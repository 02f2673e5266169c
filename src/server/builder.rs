// src/server/builder.rs
use crate::server::listener::bind_tcp;
use anyhow::{anyhow, Result};
use hyper::{server::conn::Http, Body, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::Service;

/// Builds the status API listener around any tower service.
pub struct ServerBuilder<H> {
    addr: SocketAddr,
    handler: Option<H>,
}

/// A listener that is bound but not yet accepting.
pub struct BoundServer<H> {
    listener: TcpListener,
    handler: H,
}

impl<H> ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr, handler: None }
    }

    pub fn with_handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    pub async fn bind(self) -> Result<BoundServer<H>> {
        let handler = self
            .handler
            .ok_or_else(|| anyhow!("handler must be set via with_handler()"))?;
        let listener = bind_tcp(self.addr).await?;

        Ok(BoundServer { listener, handler })
    }
}

impl<H> BoundServer<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    /// Port 0 resolves to the port the OS picked.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` completes. Connections already
    /// being served finish on their own tasks.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        tracing::info!("Status API listening on {}", addr);
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = self.listener.accept() => accepted?,
                _ = &mut shutdown => {
                    tracing::info!("Status API on {} stopped accepting", addr);
                    return Ok(());
                }
            };
            let svc = self.handler.clone();

            tokio::spawn(async move {
                if let Err(err) = Http::new().serve_connection(stream, svc).await {
                    tracing::warn!(%peer, %err, "connection error");
                }
            });
        }
    }
}
