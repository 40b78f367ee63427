//! Unified error type for the Flipmatch server.

use flipmatch_protocol::ProtocolError;
use flipmatch_room::RoomError;
use flipmatch_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum FlipmatchError {
    /// A transport-level error (accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid event).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, host conflict, turn rules).
    #[error(transparent)]
    Room(#[from] RoomError),
}
