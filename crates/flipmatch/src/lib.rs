//! # Flipmatch
//!
//! A real-time multiplayer memory-matching game server.
//!
//! Clients create or join rooms via short codes over a WebSocket
//! connection; the host starts the game and players take turns flipping
//! paired cards. The server is authoritative: every rule lives in the
//! room layer, and the gateway here only routes events between
//! connections and rooms.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flipmatch::prelude::*;
//!
//! # async fn run() -> Result<(), FlipmatchError> {
//! let server = FlipmatchServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod gateway;
mod server;

pub use error::FlipmatchError;
pub use server::{FlipmatchServer, FlipmatchServerBuilder};

/// The common imports for running a server.
pub mod prelude {
    pub use crate::{FlipmatchError, FlipmatchServer, FlipmatchServerBuilder};
    pub use flipmatch_protocol::{
        ClientEvent, ConnectionId, RoomCode, ServerEvent,
    };
    pub use flipmatch_room::{GameConfig, RoomError};
}
