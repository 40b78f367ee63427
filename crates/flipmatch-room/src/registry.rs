//! Room registry: creates, tracks, and deletes rooms, and indexes which
//! connection belongs to which room.
//!
//! # Concurrency note
//!
//! `RoomRegistry` is NOT thread-safe by itself — it is owned by the
//! gateway behind a single `tokio::sync::Mutex` that is held only for
//! insert/lookup/delete. Room operations happen on cloned
//! [`RoomHandle`]s after that lock is released, so a slow room never
//! stalls the registry and rooms never stall each other.

use std::collections::HashMap;
use std::sync::Arc;

use flipmatch_protocol::{ConnectionId, RoomCode};

use crate::room::spawn_room;
use crate::{CodeSource, DeckSource, GameConfig, RandomCodes, RoomError, RoomHandle, ShuffledDecks};

/// How many generator draws to try before declaring the code space
/// exhausted. 16 misses in a row against a 36^6 space means something is
/// wrong with the generator, not the registry.
const MAX_CODE_ATTEMPTS: usize = 16;

/// Command channel size for each room actor.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// The process-wide map from room code to live room, plus the
/// connection → room index required for O(1) disconnect cleanup.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, RoomHandle>,
    /// Which room each connection is in. A connection is in at most one
    /// room at a time (key invariant).
    members: HashMap<ConnectionId, RoomCode>,
    codes: Arc<dyn CodeSource>,
    decks: Arc<dyn DeckSource>,
    config: GameConfig,
}

impl RoomRegistry {
    /// Creates a registry with the default random code and deck sources.
    pub fn new(config: GameConfig) -> Self {
        Self::with_sources(config, Arc::new(RandomCodes), Arc::new(ShuffledDecks))
    }

    /// Creates a registry with explicit generator seams (tests inject
    /// fixed decks and colliding codes through here).
    pub fn with_sources(
        config: GameConfig,
        codes: Arc<dyn CodeSource>,
        decks: Arc<dyn DeckSource>,
    ) -> Self {
        Self {
            rooms: HashMap::new(),
            members: HashMap::new(),
            codes,
            decks,
            config: config.validated(),
        }
    }

    /// Creates a room and spawns its actor.
    ///
    /// With `None`, a fresh unique code is drawn from the code source
    /// (bounded retries, then [`RoomError::CapacityExhausted`]). With an
    /// explicit code that is already live, [`RoomError::RoomAlreadyExists`].
    ///
    /// The check and the insert happen under the caller's single registry
    /// lock hold, so at most one room ever exists per code.
    pub fn create_room(
        &mut self,
        code: Option<RoomCode>,
    ) -> Result<RoomHandle, RoomError> {
        let code = match code {
            Some(code) => {
                if self.rooms.contains_key(&code) {
                    return Err(RoomError::RoomAlreadyExists(code));
                }
                code
            }
            None => self.fresh_code()?,
        };

        let cards = self.decks.deal(self.config.pair_count);
        let handle = spawn_room(
            code.clone(),
            cards,
            self.config.mismatch_delay,
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(code.clone(), handle.clone());
        tracing::info!(room = %code, rooms = self.rooms.len(), "room created");
        Ok(handle)
    }

    fn fresh_code(&self) -> Result<RoomCode, RoomError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = self.codes.generate(self.config.code_length);
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
        }
        tracing::warn!(
            attempts = MAX_CODE_ATTEMPTS,
            "room code generation exhausted"
        );
        Err(RoomError::CapacityExhausted)
    }

    /// Looks up a room by code. Returns a cloned handle so the caller can
    /// drop the registry lock before awaiting the room.
    pub fn room(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).cloned()
    }

    /// Removes a room. Idempotent; also evicts every membership-index
    /// entry that pointed at it.
    pub fn delete_room(&mut self, code: &RoomCode) {
        if self.rooms.remove(code).is_some() {
            self.members.retain(|_, c| c != code);
            tracing::info!(room = %code, rooms = self.rooms.len(), "room deleted");
        }
    }

    /// Records that `conn` belongs to `code`.
    pub fn bind(&mut self, conn: ConnectionId, code: RoomCode) {
        self.members.insert(conn, code);
    }

    /// Forgets `conn`'s membership, returning the room it was in.
    pub fn unbind(&mut self, conn: ConnectionId) -> Option<RoomCode> {
        self.members.remove(&conn)
    }

    /// The room `conn` currently belongs to, if any. O(1) — this is the
    /// disconnect hot path.
    pub fn room_of(&self, conn: ConnectionId) -> Option<RoomCode> {
        self.members.get(&conn).cloned()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
