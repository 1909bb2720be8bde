//! Per-connection view of the shared round

use crate::client_manager::ClientManager;
use crate::round::ConnectionId;
use shared::{Role, StateMessage};

/// Builds the state record a single connection is allowed to see
///
/// Every recipient gets the full buzz order. Rank and buzz eligibility are
/// only filled in for players; a connection the registry no longer knows is
/// projected as a player that has not buzzed.
pub fn project(manager: &ClientManager, id: ConnectionId) -> StateMessage {
    let round = manager.round();
    let (_, role) = manager.lookup(id);

    let (your_rank, can_buzz) = match role {
        Role::Player => (round.rank_of(id), !round.has_buzzed(id)),
        Role::Admin => (None, false),
    };

    StateMessage {
        buzz_order: round.order(),
        your_rank,
        can_buzz,
        round_active: round.is_active(),
    }
}
