//! WebSocket transport implementation.
//!
//! Accepts WebSocket upgrades on the configured path and runs one session
//! task per connection. Every text or binary frame carries exactly one
//! JSON-RPC request; the reply goes back as a single text frame.

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    Router,
    extract::{ConnectInfo, State, ws::WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::config::WebSocketConfig;
use super::session::{SessionContext, run_session};
use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// WebSocket transport handler.
pub struct WebSocketTransport {
    config: WebSocketConfig,
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Bind the listening socket. Port `0` picks a free port.
    pub async fn bind(config: WebSocketConfig) -> TransportResult<Self> {
        let addr = config.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;
        Ok(Self { config, listener })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> TransportResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl+C.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        self.run_until(server, shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then stop accepting connections, close
    /// open ones after their in-flight request and wait for them to finish.
    pub async fn run_until<F>(self, server: McpServer, signal: F) -> TransportResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = self.local_addr()?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (drain_tx, mut drain_rx) = mpsc::channel::<()>(1);

        let ctx = SessionContext {
            server,
            keepalive: self.config.keepalive(),
            shutdown: shutdown_rx,
            drain: drain_tx,
        };

        let app = Router::new()
            .route(&self.config.path, get(upgrade_handler))
            .with_state(ctx)
            .layer(TraceLayer::new_for_http());

        info!("WebSocket server listening on ws://{}{}", local_addr, self.config.path);
        match self.config.keepalive() {
            Some(k) => info!(
                "  → Keepalive: ping every {:?}, timeout {:?}",
                k.interval, k.timeout
            ),
            None => info!("  → Keepalive: disabled"),
        }

        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            signal.await;
            info!("Shutdown requested, closing connections");
            let _ = shutdown_tx.send(true);
        })
        .await?;

        // Resolves once the last session has dropped its sender.
        let _ = drain_rx.recv().await;
        info!("WebSocket server stopped");
        Ok(())
    }
}

async fn upgrade_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    State(ctx): State<SessionContext>,
) -> Response {
    if *ctx.shutdown.borrow() {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    ws.on_upgrade(move |socket| run_session(socket, remote, ctx))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
