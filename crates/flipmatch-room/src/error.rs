//! Error types for the room layer.
//!
//! Every variant is a client-visible, recoverable, per-request failure.
//! The display strings double as the `msg`/`reason` text sent back to the
//! originating connection, so they are phrased for players, not logs.

use flipmatch_protocol::RoomCode;

/// Everything that can go wrong in a room operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// No room with this code exists (or it just reached its terminal
    /// state and was deleted).
    #[error("Room {0} not found")]
    RoomNotFound(RoomCode),

    /// An explicit create targeted a code that is already registered.
    #[error("Room {0} already exists")]
    RoomAlreadyExists(RoomCode),

    /// A different connection already claimed hostship of this room.
    #[error("Room already has a host")]
    HostConflict(RoomCode),

    /// Only the host can start the game.
    #[error("Only the host can start the game")]
    NotHost,

    /// The sender is not a player in this room.
    #[error("You are not in this room")]
    NotInRoom,

    /// It is another player's turn.
    #[error("Not your turn")]
    NotYourTurn,

    /// The card index is outside the deck.
    #[error("Invalid card index")]
    InvalidIndex,

    /// The card is already matched, already face-up, or a two-card
    /// resolution is still pending.
    #[error("Card already matched or currently flipped")]
    AlreadyFlippedOrMatched,

    /// Code generation kept colliding with live rooms.
    #[error("Could not allocate a room code")]
    CapacityExhausted,
}
