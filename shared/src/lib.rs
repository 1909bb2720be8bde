//! Wire protocol shared by the buzzer server and its clients
//!
//! Every message on the wire is a JSON text frame. Clients send
//! [`ClientMessage`] records carrying an `action` string, the server answers
//! with [`StateMessage`] records projected for the receiving connection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity given to players that connect without a usable name
pub const UNNAMED_PLAYER: &str = "Unnamed Player";
/// Identity reported for connections the server no longer tracks
pub const UNKNOWN_CLIENT: &str = "Unknown Client";
/// Prefix of every admin identity, followed by the admin sequence number
pub const ADMIN_PREFIX: &str = "Admin";
/// Path of the WebSocket upgrade endpoint
pub const WS_PATH: &str = "/ws";

/// Role selected by a connection during the handshake
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Player,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(Role::Player),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Query parameters carried by the upgrade request
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct HandshakeParams {
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
}

/// Actions a client may request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buzz,
    Reset,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buzz => "buzz",
            Action::Reset => "reset",
        }
    }
}

/// Inbound record as it arrives on the wire
///
/// `action` stays a free-form JSON value so that unrecognised actions, or
/// actions that are not strings at all, decode successfully and can be
/// ignored instead of tearing the connection down.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ClientMessage {
    #[serde(default)]
    pub action: Option<serde_json::Value>,
}

impl ClientMessage {
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(serde_json::Value::from(action.as_str())),
        }
    }

    /// Maps the raw action string onto a known [`Action`]
    pub fn action(&self) -> Option<Action> {
        match self.action.as_ref().and_then(serde_json::Value::as_str) {
            Some("buzz") => Some(Action::Buzz),
            Some("reset") => Some(Action::Reset),
            _ => None,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Role-specific view of the round sent to a single connection
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct StateMessage {
    /// Identities in arrival order, identical for every recipient
    pub buzz_order: Vec<String>,
    /// 1-based rank of the recipient, `None` for admins and players that
    /// have not buzzed this round
    pub your_rank: Option<usize>,
    pub can_buzz: bool,
    pub round_active: bool,
}

impl StateMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// Resolves the identity a player is shown under
///
/// Surrounding whitespace is trimmed; an absent or blank name falls back to
/// [`UNNAMED_PLAYER`].
pub fn player_identity(requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNNAMED_PLAYER.to_string(),
    }
}

pub fn admin_identity(sequence: u32) -> String {
    format!("{} {}", ADMIN_PREFIX, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_player() {
        assert_eq!(Role::default(), Role::Player);
        let params: HandshakeParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.role, Role::Player);
        assert!(params.name.is_none());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("player".parse::<Role>(), Ok(Role::Player));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("judge".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_decode_known_actions() {
        let buzz = ClientMessage::decode(br#"{"action":"buzz"}"#).unwrap();
        assert_eq!(buzz.action(), Some(Action::Buzz));

        let reset = ClientMessage::decode(br#"{"action":"reset","extra":1}"#).unwrap();
        assert_eq!(reset.action(), Some(Action::Reset));
    }

    #[test]
    fn test_decode_unknown_or_missing_action() {
        let unknown = ClientMessage::decode(br#"{"action":"dance"}"#).unwrap();
        assert_eq!(unknown.action(), None);
        assert_eq!(unknown.action, Some(serde_json::json!("dance")));

        let missing = ClientMessage::decode(b"{}").unwrap();
        assert_eq!(missing.action(), None);
    }

    #[test]
    fn test_decode_non_string_action() {
        let frames: [&[u8]; 5] = [
            br#"{"action":5}"#,
            br#"{"action":true}"#,
            br#"{"action":{}}"#,
            br#"{"action":["buzz"]}"#,
            br#"{"action":null}"#,
        ];
        for frame in frames {
            let message = ClientMessage::decode(frame).unwrap();
            assert_eq!(message.action(), None);
        }
    }

    #[test]
    fn test_encode_known_action() {
        let json = ClientMessage::new(Action::Buzz).encode().unwrap();
        assert_eq!(json, r#"{"action":"buzz"}"#);
    }

    #[test]
    fn test_decode_malformed_frame() {
        assert!(ClientMessage::decode(b"buzz").is_err());
        assert!(ClientMessage::decode(br#"{"action":"#).is_err());
        // Valid JSON, but not a record
        assert!(ClientMessage::decode(br#""buzz""#).is_err());
        assert!(ClientMessage::decode(b"5").is_err());
    }

    #[test]
    fn test_state_message_wire_shape() {
        let state = StateMessage {
            buzz_order: vec!["Alice".to_string(), "Bob".to_string()],
            your_rank: None,
            can_buzz: true,
            round_active: true,
        };

        let value: serde_json::Value = serde_json::from_str(&state.encode().unwrap()).unwrap();
        assert_eq!(value["buzz_order"], serde_json::json!(["Alice", "Bob"]));
        assert!(value["your_rank"].is_null());
        assert_eq!(value["can_buzz"], serde_json::json!(true));
        assert_eq!(value["round_active"], serde_json::json!(true));
    }

    #[test]
    fn test_player_identity_fallback() {
        assert_eq!(player_identity(Some("Alice")), "Alice");
        assert_eq!(player_identity(Some("  Bob ")), "Bob");
        assert_eq!(player_identity(Some("   ")), UNNAMED_PLAYER);
        assert_eq!(player_identity(Some("")), UNNAMED_PLAYER);
        assert_eq!(player_identity(None), UNNAMED_PLAYER);
    }

    #[test]
    fn test_admin_identity() {
        assert_eq!(admin_identity(1), "Admin 1");
        assert_eq!(admin_identity(12), "Admin 12");
    }
}
