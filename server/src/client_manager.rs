//! Connection registry and the gate to the shared round
//!
//! This module tracks every live connection of the buzzer server:
//! - Identity assignment at handshake (player names, numbered admins)
//! - Role lookup for each connection
//! - The outbound channel used to push state to the connection
//!
//! The registry also owns the [`Round`], so every buzz or reset goes through
//! it and is checked against the caller's role before the round changes.

use crate::round::{ConnectionId, Round};
use crate::utils::get_timestamp;
use log::{debug, info, warn};
use shared::{admin_identity, player_identity, Role, StateMessage, UNKNOWN_CLIENT};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Outbound half of a connection as seen by the registry
pub type StateSender = mpsc::UnboundedSender<StateMessage>;

/// A registered connection
#[derive(Debug)]
pub struct Client {
    pub id: ConnectionId,
    /// Display name for players, "Admin N" for admins
    pub identity: String,
    pub role: Role,
    /// Channel drained by the connection's writer task
    pub sender: StateSender,
}

impl Client {
    pub fn new(id: ConnectionId, identity: String, role: Role, sender: StateSender) -> Self {
        Self {
            id,
            identity,
            role,
            sender,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Why a buzz was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuzzRejection {
    #[error("connection is not registered")]
    NotRegistered,
    #[error("admins cannot buzz")]
    Admin,
    #[error("already buzzed this round")]
    AlreadyBuzzed,
}

/// Why a reset was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResetRejection {
    #[error("only admins can reset")]
    NotAdmin,
    #[error("round is already clear")]
    AlreadyClear,
}

/// Live connections, the admin sequence and the current round
pub struct ClientManager {
    clients: HashMap<ConnectionId, Client>,
    /// Next key handed to a new connection, never reused
    next_connection_id: u64,
    /// Number of admin identities issued so far
    admin_count: u32,
    round: Round,
}

impl Default for ClientManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientManager {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            next_connection_id: 1,
            admin_count: 0,
            round: Round::new(),
        }
    }

    /// Registers a freshly accepted connection and assigns its identity
    ///
    /// Players are named after `requested_name` (or the unnamed placeholder);
    /// admins get the next number in the admin sequence. Names are not
    /// required to be unique.
    pub fn register(
        &mut self,
        sender: StateSender,
        role: Role,
        requested_name: Option<&str>,
    ) -> (ConnectionId, String) {
        let id = ConnectionId(self.next_connection_id);
        self.next_connection_id += 1;

        let identity = match role {
            Role::Player => player_identity(requested_name),
            Role::Admin => {
                self.admin_count += 1;
                admin_identity(self.admin_count)
            }
        };

        self.clients
            .insert(id, Client::new(id, identity.clone(), role, sender));
        info!(
            "{} ({}) connected as {}. Total clients: {}",
            identity,
            role,
            id,
            self.clients.len()
        );

        (id, identity)
    }

    /// Removes a connection and drops it from the buzzed set
    ///
    /// Safe to call more than once; later calls return None and change
    /// nothing. The admin sequence is never rewound.
    pub fn unregister(&mut self, id: ConnectionId) -> Option<Client> {
        let client = self.clients.remove(&id)?;
        self.round.forget(id);
        info!(
            "{} ({}) disconnected. Total clients: {}",
            client.identity,
            client.role,
            self.clients.len()
        );
        Some(client)
    }

    /// Identity and role of a connection, or the unknown-client sentinel
    pub fn lookup(&self, id: ConnectionId) -> (String, Role) {
        match self.clients.get(&id) {
            Some(client) => (client.identity.clone(), client.role),
            None => (UNKNOWN_CLIENT.to_string(), Role::Player),
        }
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Appends a buzz for the connection if its role and round state allow it
    ///
    /// Returns the new rank on success.
    pub fn try_buzz(&mut self, id: ConnectionId) -> Result<usize, BuzzRejection> {
        let client = self.clients.get(&id).ok_or(BuzzRejection::NotRegistered)?;
        if client.is_admin() {
            return Err(BuzzRejection::Admin);
        }

        self.round
            .record(id, &client.identity, get_timestamp())
            .ok_or(BuzzRejection::AlreadyBuzzed)
    }

    /// Clears the round on behalf of an admin connection
    pub fn try_reset(&mut self, id: ConnectionId) -> Result<(), ResetRejection> {
        match self.clients.get(&id) {
            Some(client) if client.is_admin() => {}
            _ => return Err(ResetRejection::NotAdmin),
        }

        if self.round.clear() {
            Ok(())
        } else {
            Err(ResetRejection::AlreadyClear)
        }
    }

    /// Records a buzz; true only when the round changed
    pub fn record_buzz(&mut self, id: ConnectionId) -> bool {
        match self.try_buzz(id) {
            Ok(rank) => {
                let (identity, _) = self.lookup(id);
                info!("Buzz recorded for {}. Rank: {}", identity, rank);
                true
            }
            Err(rejection) => {
                let (identity, role) = self.lookup(id);
                match rejection {
                    BuzzRejection::AlreadyBuzzed => {
                        debug!("{} ({}) buzz ignored: {}", identity, role, rejection)
                    }
                    _ => warn!("{} ({}) buzz ignored: {}", identity, role, rejection),
                }
                false
            }
        }
    }

    /// Resets the round; true only when there was something to clear
    pub fn reset_round(&mut self, id: ConnectionId) -> bool {
        let (identity, role) = self.lookup(id);
        match self.try_reset(id) {
            Ok(()) => {
                info!("Buzzer reset by {}", identity);
                true
            }
            Err(ResetRejection::NotAdmin) => {
                warn!("{} ({}) attempted to reset. Denied.", identity, role);
                false
            }
            Err(ResetRejection::AlreadyClear) => {
                info!("{} attempted reset, but round is already clear", identity);
                false
            }
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Number of admin identities issued so far
    pub fn admin_count(&self) -> u32 {
        self.admin_count
    }

    /// All registered connections, in no particular order
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Returns the number of currently connected clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> StateSender {
        mpsc::unbounded_channel().0
    }

    #[test]
    fn test_client_manager_creation() {
        let manager = ClientManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
        assert_eq!(manager.admin_count(), 0);
        assert!(manager.round().is_empty());
    }

    #[test]
    fn test_register_player_uses_requested_name() {
        let mut manager = ClientManager::new();

        let (id, identity) = manager.register(sender(), Role::Player, Some("Alice"));
        assert_eq!(identity, "Alice");
        assert_eq!(manager.lookup(id), ("Alice".to_string(), Role::Player));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_register_player_without_name() {
        let mut manager = ClientManager::new();

        let (_, blank) = manager.register(sender(), Role::Player, Some("   "));
        let (_, missing) = manager.register(sender(), Role::Player, None);
        assert_eq!(blank, shared::UNNAMED_PLAYER);
        assert_eq!(missing, shared::UNNAMED_PLAYER);
    }

    #[test]
    fn test_duplicate_names_get_distinct_connections() {
        let mut manager = ClientManager::new();

        let (id1, name1) = manager.register(sender(), Role::Player, Some("Sam"));
        let (id2, name2) = manager.register(sender(), Role::Player, Some("Sam"));
        assert_eq!(name1, name2);
        assert_ne!(id1, id2);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_admin_sequence_is_monotonic() {
        let mut manager = ClientManager::new();

        let (admin1, name1) = manager.register(sender(), Role::Admin, None);
        assert_eq!(name1, "Admin 1");

        let (_, name2) = manager.register(sender(), Role::Admin, None);
        assert_eq!(name2, "Admin 2");

        manager.unregister(admin1);
        let (_, name3) = manager.register(sender(), Role::Admin, Some("ignored"));
        assert_eq!(name3, "Admin 3");
        assert_eq!(manager.admin_count(), 3);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut manager = ClientManager::new();
        let (id, _) = manager.register(sender(), Role::Player, Some("Alice"));

        assert!(manager.unregister(id).is_some());
        assert!(manager.unregister(id).is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_lookup_unknown_connection() {
        let manager = ClientManager::new();
        assert_eq!(
            manager.lookup(ConnectionId(999)),
            (UNKNOWN_CLIENT.to_string(), Role::Player)
        );
    }

    #[test]
    fn test_record_buzz_rules() {
        let mut manager = ClientManager::new();
        let (player, _) = manager.register(sender(), Role::Player, Some("Alice"));
        let (admin, _) = manager.register(sender(), Role::Admin, None);

        assert_eq!(manager.try_buzz(admin), Err(BuzzRejection::Admin));
        assert_eq!(
            manager.try_buzz(ConnectionId(999)),
            Err(BuzzRejection::NotRegistered)
        );

        assert!(manager.record_buzz(player));
        assert!(!manager.record_buzz(player));
        assert_eq!(manager.try_buzz(player), Err(BuzzRejection::AlreadyBuzzed));

        assert_eq!(manager.round().order(), vec!["Alice"]);
        assert_eq!(manager.round().buzzed_count(), 1);
    }

    #[test]
    fn test_reset_round_rules() {
        let mut manager = ClientManager::new();
        let (player, _) = manager.register(sender(), Role::Player, Some("Alice"));
        let (admin, _) = manager.register(sender(), Role::Admin, None);

        // Empty round: nothing to reset
        assert_eq!(manager.try_reset(admin), Err(ResetRejection::AlreadyClear));

        manager.record_buzz(player);

        assert!(!manager.reset_round(player));
        assert_eq!(manager.round().len(), 1);

        assert!(manager.reset_round(admin));
        assert!(manager.round().is_empty());
        assert!(!manager.reset_round(admin));
    }

    #[test]
    fn test_disconnect_keeps_buzz_history() {
        let mut manager = ClientManager::new();
        let (alice, _) = manager.register(sender(), Role::Player, Some("Alice"));
        let (bob, _) = manager.register(sender(), Role::Player, Some("Bob"));

        manager.record_buzz(alice);
        manager.record_buzz(bob);
        manager.unregister(alice);

        assert_eq!(manager.round().order(), vec!["Alice", "Bob"]);
        assert!(!manager.round().has_buzzed(alice));
        assert_eq!(manager.round().rank_of(bob), Some(2));
    }
}
