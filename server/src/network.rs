//! Server network layer: HTTP routing and the per-connection WebSocket loop
//!
//! Each upgraded socket runs through three phases. While connecting, the
//! handshake parameters are turned into a registered identity and the
//! initial view is queued. While active, inbound frames are decoded and
//! applied to the round. Once closed, for whatever reason, the connection is
//! unregistered and its writer task stopped.

use crate::config::ServerConfig;
use crate::coordinator::Coordinator;
use crate::error::{ConnectionError, ServerError};
use crate::round::ConnectionId;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{ClientMessage, HandshakeParams, Role, StateMessage, WS_PATH};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Builds the HTTP router serving the WebSocket endpoint
pub fn build_router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route(WS_PATH, get(ws_upgrade))
        .route("/health", get(health))
        .with_state(coordinator)
}

/// Binds the configured address and serves until Ctrl-C
pub async fn serve(config: &ServerConfig, coordinator: Arc<Coordinator>) -> Result<(), ServerError> {
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("Server listening on {}", addr);

    run(listener, coordinator, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves
pub async fn run<F>(
    listener: TcpListener,
    coordinator: Arc<Coordinator>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(coordinator))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down gracefully...");
}

async fn health(State(coordinator): State<Arc<Coordinator>>) -> String {
    format!("ok ({} connections)", coordinator.len().await)
}

/// Upgrades `GET /ws?role=..&name=..` to a buzzer connection
///
/// `name` arrives URL-decoded; an unknown `role` is rejected with 400 before
/// the upgrade.
async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Query(params): Query<HandshakeParams>,
    State(coordinator): State<Arc<Coordinator>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, coordinator, params))
}

/// Drives one connection from handshake to teardown
pub async fn handle_socket(socket: WebSocket, coordinator: Arc<Coordinator>, params: HandshakeParams) {
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let role = params.role;

    let (id, identity) = coordinator
        .register(tx, role, params.name.as_deref())
        .await;
    let mut writer = tokio::spawn(write_states(sink, rx, identity.clone(), role));

    if coordinator.send_state(id).await.is_ok() {
        let result = tokio::select! {
            result = read_actions(&mut stream, &coordinator, id, &identity, role) => result,
            _ = &mut writer => {
                debug!("Writer for {} ({}) stopped", identity, role);
                Ok(())
            }
        };

        match result {
            Ok(()) => info!("WebSocket disconnected for {} ({})", identity, role),
            Err(e) => error!("Error in WebSocket handler for {} ({}): {}", identity, role, e),
        }
    }

    // A failed broadcast may already have removed the connection
    if !coordinator.unregister(id).await {
        debug!("{} ({}) was already unregistered", identity, role);
    }
    writer.abort();
}

/// Applies inbound actions until the peer closes or the channel faults
async fn read_actions(
    stream: &mut SplitStream<WebSocket>,
    coordinator: &Coordinator,
    id: ConnectionId,
    identity: &str,
    role: Role,
) -> Result<(), ConnectionError> {
    while let Some(frame) = stream.next().await {
        let message = match frame? {
            Message::Text(text) => ClientMessage::decode(text.as_str().as_bytes())?,
            Message::Binary(data) => ClientMessage::decode(&data)?,
            Message::Close(_) => return Ok(()),
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        match message.action() {
            Some(action) => {
                info!(
                    "Received action '{}' from {} ({})",
                    action.as_str(),
                    identity,
                    role
                );
                coordinator.apply(id, action).await;
            }
            None => warn!(
                "Unknown action {:?} received from {} ({})",
                message.action, identity, role
            ),
        }
    }

    Ok(())
}

/// Forwards queued state records to the socket as JSON text frames
///
/// Returning drops the receiver, which is how a failed socket shows up as a
/// send failure to the broadcast engine.
async fn write_states(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<StateMessage>,
    identity: String,
    role: Role,
) {
    while let Some(state) = rx.recv().await {
        let json = match state.encode() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize state for {} ({}): {}", identity, role, e);
                continue;
            }
        };

        if let Err(e) = sink.send(Message::Text(json.into())).await {
            debug!("Send to {} ({}) failed: {}", identity, role, e);
            return;
        }
    }

    if let Err(e) = sink.close().await {
        debug!("Closing socket for {} ({}) failed: {}", identity, role, e);
    }
}
