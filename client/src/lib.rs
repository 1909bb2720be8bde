//! # Buzzer Client Library
//!
//! A terminal client for the buzzer server. It connects as a player or an
//! admin, prints every state record the server pushes, and turns typed
//! commands into protocol actions.
//!
//! ## Module Organization
//!
//! ### Input Module (`input`)
//! Parses typed lines (`buzz`, `reset`, `help`, `quit`) into commands.
//!
//! ### Network Module (`network`)
//! Builds the handshake URL and runs the WebSocket session.
//!
//! ### Rendering Module (`rendering`)
//! Formats state records as plain text for the player or admin view.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//! use shared::Role;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::new("ws://127.0.0.1:8000/ws", Role::Player, Some("Alice"))?;
//!     client.run().await?;
//!     Ok(())
//! }
//! ```

pub mod input;
pub mod network;
pub mod rendering;
