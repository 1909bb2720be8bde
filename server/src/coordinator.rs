//! Process-wide owner of the registry and round, and the broadcast engine
//!
//! All reads and writes of shared state go through a single lock around the
//! [`ClientManager`], so the check-then-act steps of buzzing and resetting
//! are atomic across connections. Broadcasting projects every recipient and
//! queues the record on its writer channel under that same lock, so records
//! reach each writer in the order the round changed. Queueing never blocks;
//! the socket writes happen in the writer tasks, outside the lock.
//! Connections whose writer is gone are collected during the pass and
//! unregistered once it completes.

use crate::client_manager::{ClientManager, StateSender};
use crate::error::SendError;
use crate::projector::project;
use crate::round::ConnectionId;
use log::{error, info, warn};
use shared::{Action, Role, StateMessage};
use tokio::sync::Mutex;

/// Outcome of one broadcast pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Connections that failed to accept the state and were unregistered
    pub dropped: Vec<ConnectionId>,
}

#[derive(Default)]
pub struct Coordinator {
    clients: Mutex<ClientManager>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(
        &self,
        sender: StateSender,
        role: Role,
        requested_name: Option<&str>,
    ) -> (ConnectionId, String) {
        let mut clients = self.clients.lock().await;
        clients.register(sender, role, requested_name)
    }

    /// Removes a connection; returns false if it was already gone
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        clients.unregister(id).is_some()
    }

    pub async fn lookup(&self, id: ConnectionId) -> (String, Role) {
        let clients = self.clients.lock().await;
        clients.lookup(id)
    }

    pub async fn record_buzz(&self, id: ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        clients.record_buzz(id)
    }

    pub async fn reset_round(&self, id: ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        clients.reset_round(id)
    }

    pub async fn project(&self, id: ConnectionId) -> StateMessage {
        let clients = self.clients.lock().await;
        project(&clients, id)
    }

    /// Applies a decoded action and broadcasts if the round changed
    ///
    /// Returns whether the action was accepted.
    pub async fn apply(&self, id: ConnectionId, action: Action) -> bool {
        let accepted = match action {
            Action::Buzz => self.record_buzz(id).await,
            Action::Reset => self.reset_round(id).await,
        };

        if accepted {
            self.broadcast_state().await;
        }
        accepted
    }

    /// Sends the current view to a single connection without touching others
    pub async fn send_state(&self, id: ConnectionId) -> Result<(), SendError> {
        let clients = self.clients.lock().await;
        let client = clients.get(id).ok_or(SendError(id))?;

        client
            .sender
            .send(project(&clients, id))
            .map_err(|_| SendError(id))
            .inspect_err(|e| {
                error!(
                    "Error sending state to {} ({}): {}",
                    client.identity, client.role, e
                );
            })
    }

    /// Pushes every connection its projected view
    ///
    /// A failed send never stops the pass. Failed connections are
    /// unregistered after every recipient has been tried.
    pub async fn broadcast_state(&self) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut clients = self.clients.lock().await;
        info!(
            "Broadcasting state. Buzz order: {:?}",
            clients.round().order()
        );

        for client in clients.clients() {
            match client.sender.send(project(&clients, client.id)) {
                Ok(()) => report.delivered += 1,
                Err(_) => {
                    warn!(
                        "Failed to send to {} ({}): {}. Marking for removal.",
                        client.identity,
                        client.role,
                        SendError(client.id)
                    );
                    report.dropped.push(client.id);
                }
            }
        }

        for id in &report.dropped {
            clients.unregister(*id);
        }

        report
    }

    /// Identity and role of every live connection, sorted by identity
    pub async fn roster(&self) -> Vec<(String, Role)> {
        let clients = self.clients.lock().await;
        let mut roster: Vec<(String, Role)> = clients
            .clients()
            .map(|client| (client.identity.clone(), client.role))
            .collect();
        roster.sort_by(|a, b| a.0.cmp(&b.0));
        roster
    }

    /// Number of live connections
    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }
}
