//! Identity types shared by every layer.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// ConnectionId
// ---------------------------------------------------------------------------

/// A unique identifier for a live client connection.
///
/// Newtype over `u64` so a connection id can't be confused with a card
/// index or any other number in a signature. The transport assigns one per
/// accepted connection; it is stable for the lifetime of that connection
/// and doubles as the player's identity inside a room.
///
/// `#[serde(transparent)]` keeps the JSON representation a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// A short uppercase alphanumeric room identifier (e.g. `"K7QX2M"`).
///
/// Clients type these, so [`RoomCode::parse`] normalizes whatever they
/// send: surrounding whitespace is trimmed and letters are uppercased,
/// matching how codes are generated. An empty string is not a code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wraps an already-normalized code (as produced by a code generator).
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Normalizes raw client input into a code. Returns `None` when the
    /// input is empty after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// CardValue
// ---------------------------------------------------------------------------

/// The symbolic face value of a card (`"A"`, `"B"`, …).
///
/// Two cards match when their values are equal. The value is opaque to the
/// protocol — the deck generator decides the symbol scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardValue(pub String);

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
