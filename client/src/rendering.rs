//! Plain-text rendering of state updates

use shared::{Role, StateMessage};
use std::fmt::Write;

/// Formats a state record for the terminal, tailored to the client's role
pub fn render(state: &StateMessage, role: Role) -> String {
    let mut out = String::new();

    if state.buzz_order.is_empty() {
        out.push_str("No buzzes yet.\n");
    } else {
        out.push_str("Buzz order:\n");
        for (index, identity) in state.buzz_order.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", index + 1, identity);
        }
    }

    match role {
        Role::Player => match (state.your_rank, state.can_buzz) {
            (Some(rank), _) => {
                let _ = write!(out, "You buzzed! Rank #{}", rank);
            }
            (None, true) => out.push_str("Ready: press Enter to buzz"),
            (None, false) => out.push_str("Waiting for the next round"),
        },
        Role::Admin if state.round_active => out.push_str("Type 'reset' to start a new round"),
        Role::Admin => out.push_str("Waiting for buzzes"),
    }

    out
}
