//! Error types for the buzzer server
//!
//! Rejected buzzes and resets are not errors; they are reported as `false`
//! by the registry. The enums here cover startup failures and faults that
//! end a single connection.

use crate::round::ConnectionId;

/// Failures while starting or running the HTTP server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bind failed on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serve error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Faults that terminate a single connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("failed to decode inbound frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] axum::Error),
}

/// A state record could not be handed to a connection's writer
#[derive(Debug, thiserror::Error)]
#[error("connection {0} is no longer accepting messages")]
pub struct SendError(pub ConnectionId);
