//! Wire protocol for Flipmatch.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Identity** ([`ConnectionId`], [`RoomCode`], [`CardValue`]) — the
//!   newtypes every other layer passes around.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]) — the tagged
//!   structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! layer (game state). It doesn't know about connections or rooms — it
//! only knows how to name and serialize events.

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{ClientEvent, LobbyPlayer, ScoreEntry, ServerEvent};
pub use types::{CardValue, ConnectionId, RoomCode};
