//! `FlipmatchServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → gateway → rooms.

use std::sync::Arc;

use flipmatch_protocol::{Codec, JsonCodec};
use flipmatch_room::{CodeSource, DeckSource, GameConfig, RoomRegistry};
use flipmatch_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::FlipmatchError;
use crate::gateway::{ServerState, handle_connection};

/// Builder for configuring and starting a Flipmatch server.
///
/// # Example
///
/// ```rust,no_run
/// use flipmatch::prelude::*;
///
/// # async fn run() -> Result<(), FlipmatchError> {
/// let server = FlipmatchServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .game_config(GameConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct FlipmatchServerBuilder {
    bind_addr: String,
    config: GameConfig,
    codes: Option<Arc<dyn CodeSource>>,
    decks: Option<Arc<dyn DeckSource>>,
}

impl FlipmatchServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            config: GameConfig::default(),
            codes: None,
            decks: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the game configuration for all rooms.
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the room-code generator (deterministic codes in tests).
    pub fn code_source(mut self, codes: Arc<dyn CodeSource>) -> Self {
        self.codes = Some(codes);
        self
    }

    /// Overrides the deck generator (fixed layouts in tests).
    pub fn deck_source(mut self, decks: Arc<dyn DeckSource>) -> Self {
        self.decks = Some(decks);
        self
    }

    /// Builds and binds the server. Uses `JsonCodec` and the WebSocket
    /// transport.
    pub async fn build(
        self,
    ) -> Result<FlipmatchServer<JsonCodec>, FlipmatchError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let registry = match (self.codes, self.decks) {
            (None, None) => RoomRegistry::new(self.config),
            (codes, decks) => RoomRegistry::with_sources(
                self.config,
                codes.unwrap_or_else(|| Arc::new(flipmatch_room::RandomCodes)),
                decks.unwrap_or_else(|| Arc::new(flipmatch_room::ShuffledDecks)),
            ),
        };

        let state = Arc::new(ServerState {
            registry: Mutex::new(registry),
            codec: JsonCodec,
        });

        Ok(FlipmatchServer { transport, state })
    }
}

impl Default for FlipmatchServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Flipmatch server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct FlipmatchServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C> FlipmatchServer<C>
where
    C: Codec + Clone + 'static,
{
    /// Creates a new builder.
    pub fn builder() -> FlipmatchServerBuilder {
        FlipmatchServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a gateway task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), FlipmatchError> {
        tracing::info!("Flipmatch server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
