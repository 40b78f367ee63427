//! Room lifecycle management for Flipmatch.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one game
//! of memory: the card deck, the reveal state, the player roster, and the
//! turn pointer. Operations arrive as commands over a channel, so all
//! mutation of a room is strictly serialized while different rooms stay
//! fully independent.
//!
//! # Key types
//!
//! - [`Room`] — the pure state machine (no I/O, unit-testable)
//! - [`RoomRegistry`] — creates/deletes rooms, maps codes to handles,
//!   and indexes which connection is in which room
//! - [`RoomHandle`] — send operations to a running room actor
//! - [`RoomError`] — every client-visible failure kind
//! - [`CodeSource`] / [`DeckSource`] — pluggable randomness seams

mod codes;
mod config;
mod deck;
mod error;
mod registry;
mod room;
mod state;

pub use codes::{CodeSource, RandomCodes};
pub use config::GameConfig;
pub use deck::{DeckSource, ShuffledDecks, deal_with, symbol};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{FlipReply, LeaveReply, PlayerSender, RoomHandle};
pub use state::{Flip, FlipAction, JoinOutcome, LeaveOutcome, Player, Room};
