//! Client and server event types — the full wire vocabulary.
//!
//! Every event is internally tagged: `#[serde(tag = "type")]` plus
//! `rename_all = "snake_case"` produce JSON like
//! `{ "type": "flip_card", "room": "K7QX2M", "index": 3 }`, which is what
//! browser clients expect and what shows up readably in DevTools.

use serde::{Deserialize, Serialize};

use crate::{CardValue, RoomCode};

// ---------------------------------------------------------------------------
// Shared payload fragments
// ---------------------------------------------------------------------------

/// A player entry in a lobby snapshot (name only — scores live in
/// [`ScoreEntry`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyPlayer {
    /// The player's display name.
    pub name: String,
}

/// A player entry with their current score, in join (= turn) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// The player's display name.
    pub name: String,
    /// Pairs matched so far.
    pub score: u32,
}

// ---------------------------------------------------------------------------
// ClientEvent — inbound
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
///
/// Fields arrive as raw strings/numbers; the gateway normalizes them
/// (trims and uppercases room codes, substitutes default display names)
/// before anything reaches a room. `index` is a defaulted `i64` rather
/// than `usize` so a missing or negative value decodes and is then
/// rejected as `InvalidIndex` instead of killing the whole frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Create a room, or claim hostship of a pre-provisioned one.
    CreateRoom {
        #[serde(default)]
        name: String,
        #[serde(default)]
        room: Option<String>,
    },

    /// Join an existing room as a player.
    JoinRoom {
        #[serde(default)]
        name: String,
        room: String,
    },

    /// Start the game (host only).
    StartGame { room: String },

    /// Flip the card at `index`.
    FlipCard {
        room: String,
        #[serde(default = "missing_index")]
        index: i64,
    },

    /// Leave the room.
    LeaveRoom { room: String },
}

/// Sentinel for an absent `index` field — out of range by construction.
fn missing_index() -> i64 {
    -1
}

// ---------------------------------------------------------------------------
// ServerEvent — outbound
// ---------------------------------------------------------------------------

/// Events the server sends to clients.
///
/// Field names mirror the browser client's expectations (`temp` for the
/// unconfirmed flips, `match` for the verdict, `msg` for errors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// The claim/create succeeded; here is your room code.
    RoomCreated { room: RoomCode },

    /// The claim/create failed (host conflict, codes exhausted).
    CreateFailed { reason: String },

    /// Join succeeded (also sent on an idempotent re-join).
    JoinOk { room: RoomCode },

    /// Join failed (unknown room).
    JoinFailed { reason: String },

    /// Membership or host changed — the lobby roster snapshot.
    LobbyUpdate {
        room: RoomCode,
        players: Vec<LobbyPlayer>,
        /// Display name of the current host, if one is set.
        host: Option<String>,
        started: bool,
    },

    /// The host started the game. Card values are NOT revealed here.
    GameStarted {
        card_count: usize,
        players: Vec<ScoreEntry>,
        current_turn: usize,
    },

    /// Full board snapshot after any resolved flip (and on start).
    BoardState {
        revealed: Vec<bool>,
        /// Indices currently face-up but unconfirmed.
        temp: Vec<usize>,
        players: Vec<ScoreEntry>,
        current_turn: usize,
    },

    /// A single card was flipped face-up (pre-resolution).
    CardFlipped { index: usize, value: CardValue },

    /// The verdict on a completed two-card flip.
    MatchResult {
        #[serde(rename = "match")]
        matched: bool,
        indices: [usize; 2],
        /// Turn-order index of the acting player.
        player: usize,
    },

    /// All pairs matched — final standings. The room is gone after this.
    GameOver { players: Vec<ScoreEntry> },

    /// A request failed validation.
    Error { msg: String },

    /// Specifically: it is not your turn.
    TurnError { msg: String },
}

// =========================================================================
// Tests
// =========================================================================
