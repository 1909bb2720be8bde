//! # Buzzer Server Library
//!
//! This library provides the authoritative server for a real-time buzzer
//! game. Players connect over WebSockets and press a buzz button; the server
//! ranks them by arrival order within a round. Admins watch the ranked order
//! and reset the round.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Round
//! The server holds the only copy of the round. Clients never compute ranks
//! themselves, they render whatever state record the server last sent.
//!
//! ### Connection Management
//! Handles the complete lifecycle of connections:
//! - Handshake with role selection and identity assignment
//! - Action decoding and role checks
//! - Disconnection handling and cleanup
//!
//! ### State Broadcasting
//! After every accepted buzz or reset, each connection receives its own
//! projection of the round: the shared buzz order plus its rank and whether
//! it may still buzz.
//!
//! ## Architecture Design
//!
//! ### Single Lock
//! The registry and the round live behind one lock inside the
//! [`coordinator::Coordinator`]. Check-then-act operations such as "buzz
//! unless already buzzed" are atomic with respect to every other connection.
//!
//! ### Writer Tasks
//! Each socket has a writer task fed by an unbounded channel. Broadcasting
//! only pushes onto those channels after the lock is released; a closed
//! channel marks the connection for removal once the pass completes.
//!
//! ## Module Organization
//!
//! - `round`: buzz order and buzzed set of the current round
//! - `client_manager`: live connections, identities and round mutations
//! - `projector`: per-connection view of the round
//! - `coordinator`: shared ownership, single-recipient sends and broadcasts
//! - `network`: axum router and the per-connection message loop
//! - `config`: command line options
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::coordinator::Coordinator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let coordinator = Arc::new(Coordinator::new());
//!
//!     // Serves `GET /ws?role=player&name=Alice` until Ctrl+C
//!     server::network::serve(&config, coordinator).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod network;
pub mod projector;
pub mod round;
pub mod utils;
