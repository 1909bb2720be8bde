//! Authoritative model of the current buzz round
//!
//! A round is an append-only list of buzzes in arrival order plus the set of
//! connections that buzzed. Entries are keyed by [`ConnectionId`] so players
//! sharing a display name are tracked independently; names are only used
//! when the order is rendered.

use std::collections::HashSet;
use std::fmt;

/// Process-unique key of a live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single accepted buzz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buzz {
    pub connection: ConnectionId,
    pub identity: String,
    /// Unix time in milliseconds when the buzz was recorded
    pub timestamp: u64,
}

#[derive(Debug, Default)]
pub struct Round {
    buzz_order: Vec<Buzz>,
    buzzed: HashSet<ConnectionId>,
}

impl Round {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a buzz for `connection` unless it already buzzed this round
    ///
    /// Returns the 1-based rank of the new buzz, or None if the connection
    /// was already in the buzzed set.
    pub fn record(&mut self, connection: ConnectionId, identity: &str, timestamp: u64) -> Option<usize> {
        if !self.buzzed.insert(connection) {
            return None;
        }

        self.buzz_order.push(Buzz {
            connection,
            identity: identity.to_string(),
            timestamp,
        });
        Some(self.buzz_order.len())
    }

    /// Clears the round, returning false if there was nothing to clear
    pub fn clear(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.buzz_order.clear();
        self.buzzed.clear();
        true
    }

    /// True when neither buzzes nor buzzed connections are recorded
    pub fn is_empty(&self) -> bool {
        self.buzz_order.is_empty() && self.buzzed.is_empty()
    }

    /// True while at least one buzz is on record
    pub fn is_active(&self) -> bool {
        !self.buzz_order.is_empty()
    }

    pub fn has_buzzed(&self, connection: ConnectionId) -> bool {
        self.buzzed.contains(&connection)
    }

    /// 1-based position of the connection's buzz, recomputed on each call
    pub fn rank_of(&self, connection: ConnectionId) -> Option<usize> {
        self.buzz_order
            .iter()
            .position(|buzz| buzz.connection == connection)
            .map(|index| index + 1)
    }

    /// Drops a connection from the buzzed set; its entry in the order stays
    pub fn forget(&mut self, connection: ConnectionId) -> bool {
        self.buzzed.remove(&connection)
    }

    /// Identities in arrival order
    pub fn order(&self) -> Vec<String> {
        self.buzz_order
            .iter()
            .map(|buzz| buzz.identity.clone())
            .collect()
    }

    pub fn buzzes(&self) -> &[Buzz] {
        &self.buzz_order
    }

    pub fn len(&self) -> usize {
        self.buzz_order.len()
    }

    pub fn buzzed_count(&self) -> usize {
        self.buzzed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_starts_empty() {
        let round = Round::new();
        assert!(round.is_empty());
        assert!(!round.is_active());
        assert_eq!(round.len(), 0);
        assert!(round.order().is_empty());
    }

    #[test]
    fn test_record_preserves_arrival_order() {
        let mut round = Round::new();

        assert_eq!(round.record(ConnectionId(3), "Carol", 100), Some(1));
        assert_eq!(round.record(ConnectionId(1), "Alice", 100), Some(2));
        assert_eq!(round.record(ConnectionId(2), "Bob", 99), Some(3));

        assert_eq!(round.order(), vec!["Carol", "Alice", "Bob"]);
        assert_eq!(round.len(), 3);
        assert_eq!(round.buzzed_count(), 3);
        assert!(round.is_active());
    }

    #[test]
    fn test_record_rejects_second_buzz() {
        let mut round = Round::new();

        assert_eq!(round.record(ConnectionId(1), "Alice", 10), Some(1));
        assert_eq!(round.record(ConnectionId(1), "Alice", 20), None);

        assert_eq!(round.len(), 1);
        assert_eq!(round.buzzes()[0].timestamp, 10);
    }

    #[test]
    fn test_rank_tracks_connection_not_name() {
        let mut round = Round::new();

        round.record(ConnectionId(1), "Sam", 1);
        round.record(ConnectionId(2), "Sam", 2);

        assert_eq!(round.rank_of(ConnectionId(1)), Some(1));
        assert_eq!(round.rank_of(ConnectionId(2)), Some(2));
        assert_eq!(round.rank_of(ConnectionId(3)), None);
    }

    #[test]
    fn test_clear() {
        let mut round = Round::new();
        assert!(!round.clear());

        round.record(ConnectionId(1), "Alice", 1);
        assert!(round.clear());
        assert!(round.is_empty());
        assert!(!round.has_buzzed(ConnectionId(1)));

        // A cleared round accepts the same connection again
        assert_eq!(round.record(ConnectionId(1), "Alice", 2), Some(1));
    }

    #[test]
    fn test_forget_keeps_history() {
        let mut round = Round::new();
        round.record(ConnectionId(1), "Alice", 1);
        round.record(ConnectionId(2), "Bob", 2);

        assert!(round.forget(ConnectionId(1)));
        assert!(!round.forget(ConnectionId(1)));

        assert_eq!(round.order(), vec!["Alice", "Bob"]);
        assert_eq!(round.rank_of(ConnectionId(2)), Some(2));
        assert!(!round.has_buzzed(ConnectionId(1)));
        assert!(!round.is_empty());
    }
}
