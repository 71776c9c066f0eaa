//! Per-connection WebSocket session.
//!
//! A session reads one frame, hands it to the dispatcher, writes the reply
//! and only then reads the next frame, so replies on a connection always
//! come back in request order. Sessions share nothing but the dispatcher,
//! which means a slow tool call on one connection never holds up another.

use std::net::SocketAddr;
use std::pin::Pin;

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Sleep};
use tracing::{debug, info, warn};

use super::config::KeepaliveConfig;
use crate::core::McpServer;

// ============================================================================
// Session context
// ============================================================================

/// Everything a session needs from the listener.
#[derive(Clone)]
pub(crate) struct SessionContext {
    pub server: McpServer,
    pub keepalive: Option<KeepaliveConfig>,
    /// Flips to `true` once the listener starts shutting down.
    pub shutdown: watch::Receiver<bool>,
    /// Held for the lifetime of the session; the listener waits for every
    /// clone to drop before it returns.
    pub drain: mpsc::Sender<()>,
}

// ============================================================================
// Connection state
// ============================================================================

/// Lifecycle phase of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionPhase {
    Open,
    Closing,
    Closed,
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    /// The peer sent a close frame or the stream ended.
    PeerClosed,
    /// No frame arrived within the keepalive timeout after a ping.
    KeepaliveTimeout,
    /// The server is shutting down.
    Shutdown,
    /// Reading or writing the socket failed.
    Transport(String),
}

impl SessionEnd {
    /// Close frame to send, if the server is the side ending the session.
    fn close_frame(&self) -> Option<CloseFrame> {
        let (code, reason) = match self {
            Self::Shutdown => (close_code::AWAY, "server shutting down"),
            Self::KeepaliveTimeout => (close_code::POLICY, "keepalive timeout"),
            Self::PeerClosed | Self::Transport(_) => return None,
        };
        Some(CloseFrame {
            code,
            reason: reason.into(),
        })
    }
}

/// One client connection.
#[derive(Debug)]
pub(crate) struct Connection {
    remote: SocketAddr,
    phase: ConnectionPhase,
    handled: u64,
}

impl Connection {
    fn new(remote: SocketAddr) -> Self {
        Self {
            remote,
            phase: ConnectionPhase::Open,
            handled: 0,
        }
    }

    fn transition(&mut self, next: ConnectionPhase) {
        debug!("{}: {:?} -> {:?}", self.remote, self.phase, next);
        self.phase = next;
    }
}

// ============================================================================
// Keepalive
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeState {
    Idle,
    AwaitingPong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    SendPing,
    TimedOut,
}

/// Ping after `interval` of silence; give up if nothing arrives within
/// `timeout` of the ping. Any inbound frame counts as a sign of life.
struct Keepalive {
    config: Option<KeepaliveConfig>,
    state: ProbeState,
    deadline: Option<Pin<Box<Sleep>>>,
}

impl Keepalive {
    fn new(config: Option<KeepaliveConfig>) -> Self {
        let deadline = config.map(|c| Box::pin(tokio::time::sleep(c.interval)));
        Self {
            config,
            state: ProbeState::Idle,
            deadline,
        }
    }

    /// Record inbound activity.
    fn activity(&mut self) {
        self.state = ProbeState::Idle;
        if let (Some(config), Some(deadline)) = (self.config, self.deadline.as_mut()) {
            deadline.as_mut().reset(Instant::now() + config.interval);
        }
    }

    /// Wait for the next keepalive action. Never resolves when disabled.
    ///
    /// Cancel safe: state only changes after the deadline has fired.
    async fn tick(&mut self) -> Probe {
        let (Some(config), Some(deadline)) = (self.config, self.deadline.as_mut()) else {
            return std::future::pending().await;
        };
        deadline.as_mut().await;

        match self.state {
            ProbeState::Idle => {
                self.state = ProbeState::AwaitingPong;
                deadline.as_mut().reset(Instant::now() + config.timeout);
                Probe::SendPing
            }
            ProbeState::AwaitingPong => Probe::TimedOut,
        }
    }
}

// ============================================================================
// Session loop
// ============================================================================

enum Event {
    Frame(Option<Result<Message, axum::Error>>),
    Probe(Probe),
    Shutdown,
}

/// Drive a single WebSocket connection to completion.
pub(crate) async fn run_session(socket: WebSocket, remote: SocketAddr, ctx: SessionContext) {
    let mut connection = Connection::new(remote);
    info!("{}: connection opened", remote);

    let (mut sink, stream) = socket.split();
    let SessionContext {
        server,
        keepalive,
        shutdown,
        drain: _drain,
    } = ctx;

    let end = serve_frames(&mut connection, &server, &mut sink, stream, keepalive, shutdown).await;

    connection.transition(ConnectionPhase::Closing);
    if let Some(frame) = end.close_frame() {
        if let Err(e) = sink.send(Message::Close(Some(frame))).await {
            debug!("{}: failed to send close frame: {}", remote, e);
        }
    }
    let _ = sink.close().await;
    connection.transition(ConnectionPhase::Closed);

    match &end {
        SessionEnd::Transport(e) => warn!(
            "{}: connection lost ({:?}): {}",
            remote, connection.phase, e
        ),
        other => info!(
            "{}: connection {:?} ({:?}, {} messages handled)",
            remote, connection.phase, other, connection.handled
        ),
    }
}

async fn serve_frames(
    connection: &mut Connection,
    server: &McpServer,
    sink: &mut SplitSink<WebSocket, Message>,
    mut stream: SplitStream<WebSocket>,
    keepalive: Option<KeepaliveConfig>,
    mut shutdown: watch::Receiver<bool>,
) -> SessionEnd {
    let mut keepalive = Keepalive::new(keepalive);

    loop {
        if *shutdown.borrow() {
            return SessionEnd::Shutdown;
        }

        let event = tokio::select! {
            biased;
            _ = shutdown.changed() => Event::Shutdown,
            frame = stream.next() => Event::Frame(frame),
            probe = keepalive.tick() => Event::Probe(probe),
        };

        let message = match event {
            Event::Shutdown => return SessionEnd::Shutdown,
            Event::Probe(Probe::TimedOut) => return SessionEnd::KeepaliveTimeout,
            Event::Probe(Probe::SendPing) => {
                debug!("{}: sending keepalive ping", connection.remote);
                if let Err(e) = sink.send(Message::Ping(Bytes::new())).await {
                    return SessionEnd::Transport(e.to_string());
                }
                continue;
            }
            Event::Frame(None) => return SessionEnd::PeerClosed,
            Event::Frame(Some(Err(e))) => return SessionEnd::Transport(e.to_string()),
            Event::Frame(Some(Ok(message))) => message,
        };

        keepalive.activity();

        let reply = match message {
            Message::Text(text) => server.handle_message(text.as_str()).await,
            Message::Binary(bytes) => server.handle_bytes(&bytes).await,
            Message::Close(_) => return SessionEnd::PeerClosed,
            // Pings are answered by the socket itself.
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        connection.handled += 1;
        if let Err(e) = sink.send(Message::Text(reply.into())).await {
            return SessionEnd::Transport(e.to_string());
        }
    }
}
