//! The pure room state machine.
//!
//! [`Room`] holds one game of memory and validates/applies every
//! operation transactionally — no I/O, no clocks, no channels. The actor
//! in `room.rs` owns a `Room`, serializes access to it, and turns the
//! outcomes returned here into broadcasts. Keeping the rules pure makes
//! every edge case unit-testable without a runtime.

use flipmatch_protocol::{
    CardValue, ConnectionId, LobbyPlayer, RoomCode, ScoreEntry, ServerEvent,
};

use crate::RoomError;

/// One player in a room. Join order is turn order.
#[derive(Debug, Clone)]
pub struct Player {
    /// Identity — the stable id of the player's live connection.
    pub conn: ConnectionId,
    /// Display name shown in lobby and score payloads.
    pub name: String,
    /// Pairs matched so far.
    pub score: u32,
}

impl Player {
    fn new(conn: ConnectionId, name: impl Into<String>) -> Self {
        Self {
            conn,
            name: name.into(),
            score: 0,
        }
    }
}

/// Result of a membership join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A new player was appended to the roster.
    Joined,
    /// The connection was already a player — nothing changed.
    AlreadyPresent,
}

/// Result of removing a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// `false` when the connection wasn't a player (no-op).
    pub removed: bool,
    /// `true` when the roster is now empty and the room must be deleted.
    pub empty: bool,
}

/// An accepted flip: which card turned face-up, and what it triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flip {
    /// The flipped index (validated, in range).
    pub index: usize,
    /// The face value to reveal room-wide.
    pub value: CardValue,
    /// What the flip resolved to.
    pub action: FlipAction,
}

/// What happened after a flip was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlipAction {
    /// First card of a pair is up; waiting for the second.
    AwaitingSecond,
    /// Second card matched the first. Turn does not advance.
    Matched {
        /// Both indices, in flip order.
        indices: [usize; 2],
        /// Turn-order index of the acting player (score already credited).
        player: usize,
        /// `true` when this match revealed the final pair.
        finished: bool,
    },
    /// Second card did not match. The caller owes a
    /// [`Room::resolve_mismatch`] after the pacing delay.
    Mismatched {
        indices: [usize; 2],
        player: usize,
    },
}

/// One game session: deck, reveal state, roster, turn pointer.
///
/// Invariants maintained by the operations below:
/// - `revealed.len() == cards.len()`; a `true` entry never reverts.
/// - `temp_flips` holds at most 2 indices, none revealed, no duplicates.
/// - `current_turn < players.len()` whenever the roster is non-empty.
/// - `host`, when set, is a current player.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    host: Option<ConnectionId>,
    cards: Vec<CardValue>,
    revealed: Vec<bool>,
    temp_flips: Vec<usize>,
    players: Vec<Player>,
    current_turn: usize,
    started: bool,
}

impl Room {
    /// Creates a room around a freshly dealt deck. No host, no players.
    pub fn new(code: RoomCode, cards: Vec<CardValue>) -> Self {
        let revealed = vec![false; cards.len()];
        Self {
            code,
            host: None,
            cards,
            revealed,
            temp_flips: Vec::new(),
            players: Vec::new(),
            current_turn: 0,
            started: false,
        }
    }

    // -- accessors --------------------------------------------------------

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn host(&self) -> Option<ConnectionId> {
        self.host
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn cards(&self) -> &[CardValue] {
        &self.cards
    }

    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    pub fn temp_flips(&self) -> &[usize] {
        &self.temp_flips
    }

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// `true` once every card is revealed.
    pub fn finished(&self) -> bool {
        self.revealed.iter().all(|r| *r)
    }

    // -- membership & host ------------------------------------------------

    /// Claims hostship for `conn`, inserting it as the first player if it
    /// isn't one yet.
    ///
    /// Idempotent for the current host (a re-acknowledgement). Fails with
    /// [`RoomError::HostConflict`] when a different connection holds the
    /// role.
    pub fn claim_host(
        &mut self,
        conn: ConnectionId,
        name: &str,
    ) -> Result<(), RoomError> {
        match self.host {
            None => {
                self.host = Some(conn);
                if !self.is_player(conn) {
                    // Position 0: the host leads the turn order. Existing
                    // players keep their relative order after it.
                    self.players.insert(0, Player::new(conn, name));
                }
                Ok(())
            }
            Some(host) if host == conn => Ok(()),
            Some(_) => Err(RoomError::HostConflict(self.code.clone())),
        }
    }

    /// Appends `conn` to the roster (and so to the turn order).
    /// Joining twice is a no-op acknowledged as [`JoinOutcome::AlreadyPresent`].
    pub fn join(&mut self, conn: ConnectionId, name: &str) -> JoinOutcome {
        if self.is_player(conn) {
            return JoinOutcome::AlreadyPresent;
        }
        self.players.push(Player::new(conn, name));
        JoinOutcome::Joined
    }

    /// Removes `conn` from the roster.
    ///
    /// Host departure promotes the earliest-joined remaining player. The
    /// turn pointer is re-clamped by modulo into the shrunken roster —
    /// indices are not re-aligned to the departing player's slot.
    pub fn leave(&mut self, conn: ConnectionId) -> LeaveOutcome {
        let Some(pos) = self.players.iter().position(|p| p.conn == conn) else {
            return LeaveOutcome {
                removed: false,
                empty: self.players.is_empty(),
            };
        };
        self.players.remove(pos);

        if self.host == Some(conn) {
            self.host = self.players.first().map(|p| p.conn);
        }

        if self.players.is_empty() {
            return LeaveOutcome {
                removed: true,
                empty: true,
            };
        }
        self.current_turn %= self.players.len();
        LeaveOutcome {
            removed: true,
            empty: false,
        }
    }

    // -- game -------------------------------------------------------------

    /// Starts the game. Host only; repeated starts are accepted (the
    /// caller re-broadcasts) since no state changes.
    pub fn start(&mut self, conn: ConnectionId) -> Result<(), RoomError> {
        match self.host {
            Some(host) if host == conn => {
                self.started = true;
                self.current_turn = 0;
                Ok(())
            }
            _ => Err(RoomError::NotHost),
        }
    }

    /// Flips the card at `index` for `conn`.
    ///
    /// Validations run in a fixed order, each short-circuiting:
    /// membership, turn, index range, then availability (revealed,
    /// already face-up, or a two-card resolution still pending).
    ///
    /// On a mismatch the two cards stay in `temp_flips` until
    /// [`Self::resolve_mismatch`] — during that window any further flip
    /// fails the availability check.
    pub fn flip(
        &mut self,
        conn: ConnectionId,
        index: i64,
    ) -> Result<Flip, RoomError> {
        let player = self
            .players
            .iter()
            .position(|p| p.conn == conn)
            .ok_or(RoomError::NotInRoom)?;

        if self.current_turn != player {
            return Err(RoomError::NotYourTurn);
        }

        if index < 0 || index as usize >= self.cards.len() {
            return Err(RoomError::InvalidIndex);
        }
        let index = index as usize;

        if self.revealed[index]
            || self.temp_flips.contains(&index)
            || self.temp_flips.len() == 2
        {
            return Err(RoomError::AlreadyFlippedOrMatched);
        }

        self.temp_flips.push(index);
        let value = self.cards[index].clone();

        let action = if self.temp_flips.len() < 2 {
            FlipAction::AwaitingSecond
        } else {
            let indices = [self.temp_flips[0], self.temp_flips[1]];
            if self.cards[indices[0]] == self.cards[indices[1]] {
                self.revealed[indices[0]] = true;
                self.revealed[indices[1]] = true;
                self.players[player].score += 1;
                self.temp_flips.clear();
                // Turn unchanged: a correct pair earns another go.
                FlipAction::Matched {
                    indices,
                    player,
                    finished: self.finished(),
                }
            } else {
                FlipAction::Mismatched { indices, player }
            }
        };

        Ok(Flip {
            index,
            value,
            action,
        })
    }

    /// Settles a pending mismatch: clears the face-up pair and passes the
    /// turn. Safe to call with an empty roster (everyone left during the
    /// pacing delay) — the turn pointer is then left alone.
    pub fn resolve_mismatch(&mut self) {
        self.temp_flips.clear();
        if !self.players.is_empty() {
            self.current_turn = (self.current_turn + 1) % self.players.len();
        }
    }

    // -- snapshots ---------------------------------------------------------

    /// The roster with scores, in turn order.
    pub fn scores(&self) -> Vec<ScoreEntry> {
        self.players
            .iter()
            .map(|p| ScoreEntry {
                name: p.name.clone(),
                score: p.score,
            })
            .collect()
    }

    /// The lobby snapshot broadcast on any membership/host change.
    pub fn lobby_snapshot(&self) -> ServerEvent {
        ServerEvent::LobbyUpdate {
            room: self.code.clone(),
            players: self
                .players
                .iter()
                .map(|p| LobbyPlayer {
                    name: p.name.clone(),
                })
                .collect(),
            host: self
                .host
                .and_then(|h| self.players.iter().find(|p| p.conn == h))
                .map(|p| p.name.clone()),
            started: self.started,
        }
    }

    /// The board snapshot broadcast after any resolved flip. Reveals
    /// which positions are matched/face-up, never the hidden values.
    pub fn board_snapshot(&self) -> ServerEvent {
        ServerEvent::BoardState {
            revealed: self.revealed.clone(),
            temp: self.temp_flips.clone(),
            players: self.scores(),
            current_turn: self.current_turn,
        }
    }

    /// The start announcement: deck size and roster, no card values.
    pub fn start_snapshot(&self) -> ServerEvent {
        ServerEvent::GameStarted {
            card_count: self.cards.len(),
            players: self.scores(),
            current_turn: self.current_turn,
        }
    }

    fn is_player(&self, conn: ConnectionId) -> bool {
        self.players.iter().any(|p| p.conn == conn)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::symbol;

    // -- Helpers ----------------------------------------------------------

    fn conn(id: u64) -> ConnectionId {
        ConnectionId(id)
    }

    /// A room over an unshuffled deck: `A A B B C C …` — index 2k and
    /// 2k+1 always match, adjacent even indices never do.
    fn room_with_pairs(pair_count: usize) -> Room {
        let cards = (0..pair_count)
            .flat_map(|i| [symbol(i), symbol(i)])
            .collect();
        Room::new(RoomCode::new("TEST01"), cards)
    }

    /// Alice (conn 1) hosts, Bob (conn 2) joins, game started.
    fn started_room(pair_count: usize) -> Room {
        let mut room = room_with_pairs(pair_count);
        room.claim_host(conn(1), "Alice").unwrap();
        assert_eq!(room.join(conn(2), "Bob"), JoinOutcome::Joined);
        room.start(conn(1)).unwrap();
        room
    }

    // =====================================================================
    // Deck shape on creation (scenario A)
    // =====================================================================

    #[test]
    fn test_new_room_has_full_facedown_board() {
        let room = room_with_pairs(8);
        assert_eq!(room.cards().len(), 16);
        assert_eq!(room.revealed().len(), 16);
        assert!(room.revealed().iter().all(|r| !r));
        assert!(room.temp_flips().is_empty());
        assert!(!room.started());
        assert!(room.host().is_none());
    }

    // =====================================================================
    // claim_host()
    // =====================================================================

    #[test]
    fn test_claim_host_on_fresh_room_sets_host_and_first_player() {
        let mut room = room_with_pairs(2);
        room.claim_host(conn(1), "Alice").unwrap();

        assert_eq!(room.host(), Some(conn(1)));
        assert_eq!(room.players().len(), 1);
        assert_eq!(room.players()[0].name, "Alice");
        assert_eq!(room.players()[0].score, 0);
    }

    #[test]
    fn test_claim_host_is_idempotent_for_same_connection() {
        let mut room = room_with_pairs(2);
        room.claim_host(conn(1), "Alice").unwrap();
        room.claim_host(conn(1), "Alice").unwrap();

        assert_eq!(room.players().len(), 1, "no duplicate player entry");
        assert_eq!(room.host(), Some(conn(1)));
    }

    #[test]
    fn test_claim_host_conflict_for_different_connection() {
        let mut room = room_with_pairs(2);
        room.claim_host(conn(1), "Alice").unwrap();

        let result = room.claim_host(conn(2), "Mallory");
        assert!(matches!(result, Err(RoomError::HostConflict(_))));
        assert_eq!(room.host(), Some(conn(1)));
        assert_eq!(room.players().len(), 1);
    }

    #[test]
    fn test_claim_host_on_preprovisioned_room_inserts_at_front() {
        // Players joined a hostless (pre-provisioned) lobby first; the
        // late-claiming host still lands at turn slot 0 and the others
        // keep their relative order.
        let mut room = room_with_pairs(2);
        room.join(conn(2), "Bob");
        room.join(conn(3), "Carol");

        room.claim_host(conn(1), "Alice").unwrap();

        let names: Vec<&str> =
            room.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
        assert_eq!(room.host(), Some(conn(1)));
    }

    #[test]
    fn test_claim_host_existing_player_not_duplicated() {
        let mut room = room_with_pairs(2);
        room.join(conn(1), "Alice");
        room.claim_host(conn(1), "Alice").unwrap();

        assert_eq!(room.players().len(), 1);
        assert_eq!(room.host(), Some(conn(1)));
    }

    // =====================================================================
    // join()
    // =====================================================================

    #[test]
    fn test_join_appends_in_turn_order() {
        let mut room = room_with_pairs(2);
        room.claim_host(conn(1), "Alice").unwrap();
        room.join(conn(2), "Bob");
        room.join(conn(3), "Carol");

        let names: Vec<&str> =
            room.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_join_twice_is_idempotent() {
        let mut room = room_with_pairs(2);
        assert_eq!(room.join(conn(2), "Bob"), JoinOutcome::Joined);
        assert_eq!(room.join(conn(2), "Bob"), JoinOutcome::AlreadyPresent);
        assert_eq!(room.players().len(), 1);
    }

    // =====================================================================
    // start() (scenario B)
    // =====================================================================

    #[test]
    fn test_start_by_host_sets_turn_zero() {
        let room = started_room(2);
        assert!(room.started());
        assert_eq!(room.current_turn(), 0);
    }

    #[test]
    fn test_start_by_non_host_rejected() {
        let mut room = room_with_pairs(2);
        room.claim_host(conn(1), "Alice").unwrap();
        room.join(conn(2), "Bob");

        assert_eq!(room.start(conn(2)), Err(RoomError::NotHost));
        assert!(!room.started());
    }

    #[test]
    fn test_start_without_host_rejected() {
        let mut room = room_with_pairs(2);
        room.join(conn(2), "Bob");
        assert_eq!(room.start(conn(2)), Err(RoomError::NotHost));
    }

    #[test]
    fn test_start_twice_is_accepted_without_state_change() {
        let mut room = started_room(2);
        room.start(conn(1)).unwrap();
        assert!(room.started());
        assert_eq!(room.current_turn(), 0);
    }

    // =====================================================================
    // flip() validation order
    // =====================================================================

    #[test]
    fn test_flip_by_non_member_rejected() {
        let mut room = started_room(2);
        assert_eq!(room.flip(conn(9), 0), Err(RoomError::NotInRoom));
    }

    #[test]
    fn test_flip_out_of_turn_rejected() {
        let mut room = started_room(2);
        // Bob (slot 1) tries while it's Alice's turn.
        assert_eq!(room.flip(conn(2), 0), Err(RoomError::NotYourTurn));
    }

    #[test]
    fn test_flip_out_of_range_rejected() {
        let mut room = started_room(2);
        assert_eq!(room.flip(conn(1), 4), Err(RoomError::InvalidIndex));
        assert_eq!(room.flip(conn(1), -1), Err(RoomError::InvalidIndex));
    }

    #[test]
    fn test_flip_turn_checked_before_index() {
        // Ordered validations: a non-turn player with a garbage index
        // still gets NotYourTurn, not InvalidIndex.
        let mut room = started_room(2);
        assert_eq!(room.flip(conn(2), 99), Err(RoomError::NotYourTurn));
    }

    #[test]
    fn test_flip_same_card_twice_rejected() {
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        assert_eq!(
            room.flip(conn(1), 0),
            Err(RoomError::AlreadyFlippedOrMatched)
        );
    }

    #[test]
    fn test_flip_revealed_card_rejected() {
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        room.flip(conn(1), 1).unwrap(); // match — 0 and 1 now revealed
        assert_eq!(
            room.flip(conn(1), 0),
            Err(RoomError::AlreadyFlippedOrMatched)
        );
    }

    #[test]
    fn test_flip_while_resolution_pending_rejected() {
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        let flip = room.flip(conn(1), 2).unwrap(); // A vs B — mismatch
        assert!(matches!(flip.action, FlipAction::Mismatched { .. }));

        // Both cards stay up until resolve_mismatch; a third flip — even
        // of an untouched card, even by the turn-holder — must not land.
        assert_eq!(
            room.flip(conn(1), 3),
            Err(RoomError::AlreadyFlippedOrMatched)
        );
    }

    // =====================================================================
    // flip() outcomes (scenarios C and D)
    // =====================================================================

    #[test]
    fn test_first_flip_awaits_second() {
        let mut room = started_room(2);
        let flip = room.flip(conn(1), 3).unwrap();

        assert_eq!(flip.index, 3);
        assert_eq!(flip.value, symbol(1)); // deck is A A B B
        assert_eq!(flip.action, FlipAction::AwaitingSecond);
        assert_eq!(room.temp_flips(), [3]);
    }

    #[test]
    fn test_match_reveals_scores_and_keeps_turn() {
        let mut room = started_room(3); // A A B B C C
        room.flip(conn(1), 0).unwrap();
        let flip = room.flip(conn(1), 1).unwrap();

        assert_eq!(
            flip.action,
            FlipAction::Matched {
                indices: [0, 1],
                player: 0,
                finished: false,
            }
        );
        assert!(room.revealed()[0] && room.revealed()[1]);
        assert!(room.temp_flips().is_empty());
        assert_eq!(room.players()[0].score, 1);
        assert_eq!(room.players()[1].score, 0);
        assert_eq!(room.current_turn(), 0, "matching earns another go");
    }

    #[test]
    fn test_mismatch_then_resolve_advances_turn() {
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        let flip = room.flip(conn(1), 2).unwrap();

        assert_eq!(
            flip.action,
            FlipAction::Mismatched {
                indices: [0, 2],
                player: 0,
            }
        );
        // Nothing revealed, no score, turn not yet advanced.
        assert!(room.revealed().iter().all(|r| !r));
        assert_eq!(room.players()[0].score, 0);
        assert_eq!(room.current_turn(), 0);
        assert_eq!(room.temp_flips(), [0, 2]);

        room.resolve_mismatch();
        assert!(room.temp_flips().is_empty());
        assert_eq!(room.current_turn(), 1, "turn passes to Bob");
        assert_eq!(room.players()[0].score, 0, "mismatch never scores");
    }

    #[test]
    fn test_turn_wraps_around_roster() {
        let mut room = started_room(2);
        // Alice mismatches, then Bob mismatches: back to Alice.
        room.flip(conn(1), 0).unwrap();
        room.flip(conn(1), 2).unwrap();
        room.resolve_mismatch();
        assert_eq!(room.current_turn(), 1);

        room.flip(conn(2), 0).unwrap();
        room.flip(conn(2), 2).unwrap();
        room.resolve_mismatch();
        assert_eq!(room.current_turn(), 0);
    }

    #[test]
    fn test_revealed_never_reverts() {
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        room.flip(conn(1), 1).unwrap(); // A A — match
        assert!(room.revealed()[0] && room.revealed()[1]);
        room.flip(conn(1), 2).unwrap();
        room.flip(conn(1), 3).unwrap(); // B B — match
        assert!(room.revealed().iter().all(|r| *r));
    }

    // =====================================================================
    // Terminal state (scenario E, state-level half)
    // =====================================================================

    #[test]
    fn test_final_match_reports_finished() {
        let mut room = started_room(1); // A A — one pair
        room.flip(conn(1), 0).unwrap();
        let flip = room.flip(conn(1), 1).unwrap();

        assert_eq!(
            flip.action,
            FlipAction::Matched {
                indices: [0, 1],
                player: 0,
                finished: true,
            }
        );
        assert!(room.finished());
    }

    #[test]
    fn test_scores_accumulate_across_pairs() {
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        room.flip(conn(1), 1).unwrap();
        room.flip(conn(1), 2).unwrap();
        let flip = room.flip(conn(1), 3).unwrap();

        assert!(matches!(
            flip.action,
            FlipAction::Matched { finished: true, .. }
        ));
        assert_eq!(room.players()[0].score, 2);
    }

    // =====================================================================
    // leave() (host succession, scenario F)
    // =====================================================================

    #[test]
    fn test_leave_removes_player_and_broadcast_roster_shrinks() {
        let mut room = started_room(2);
        let outcome = room.leave(conn(2));
        assert!(outcome.removed);
        assert!(!outcome.empty);
        assert_eq!(room.players().len(), 1);
    }

    #[test]
    fn test_leave_unknown_connection_is_noop() {
        let mut room = started_room(2);
        let outcome = room.leave(conn(9));
        assert!(!outcome.removed);
        assert_eq!(room.players().len(), 2);
    }

    #[test]
    fn test_leave_host_promotes_earliest_joined() {
        let mut room = room_with_pairs(2);
        room.claim_host(conn(1), "Alice").unwrap();
        room.join(conn(2), "Bob");
        room.join(conn(3), "Carol");

        room.leave(conn(1));
        assert_eq!(room.host(), Some(conn(2)), "Bob joined before Carol");
    }

    #[test]
    fn test_leave_last_player_reports_empty_and_clears_host() {
        let mut room = room_with_pairs(2);
        room.claim_host(conn(1), "Alice").unwrap();
        let outcome = room.leave(conn(1));
        assert!(outcome.empty);
        assert!(room.host().is_none());
    }

    #[test]
    fn test_leave_during_own_turn_reclamps_turn_pointer() {
        // Scenario F: Bob (slot 1) disconnects while it is his turn.
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        room.flip(conn(1), 2).unwrap();
        room.resolve_mismatch();
        assert_eq!(room.current_turn(), 1);

        let outcome = room.leave(conn(2));
        assert!(outcome.removed && !outcome.empty);
        assert!(
            room.current_turn() < room.players().len(),
            "turn pointer stays in range"
        );
        assert_eq!(room.current_turn(), 0);
    }

    #[test]
    fn test_leave_before_turn_holder_uses_modulo_clamp_only() {
        // Three players, turn on slot 2 (Carol). Alice (slot 0) leaves:
        // indices shift, and the policy is a plain modulo clamp — no
        // re-alignment to the departed slot.
        let mut room = room_with_pairs(2);
        room.claim_host(conn(1), "Alice").unwrap();
        room.join(conn(2), "Bob");
        room.join(conn(3), "Carol");
        room.start(conn(1)).unwrap();
        // Advance the turn twice via mismatches (A A B B deck: 0 vs 2).
        room.flip(conn(1), 0).unwrap();
        room.flip(conn(1), 2).unwrap();
        room.resolve_mismatch();
        room.flip(conn(2), 0).unwrap();
        room.flip(conn(2), 2).unwrap();
        room.resolve_mismatch();
        assert_eq!(room.current_turn(), 2);

        room.leave(conn(1));
        assert_eq!(room.players().len(), 2);
        assert_eq!(room.current_turn(), 0, "2 % 2 — modulo, not re-indexing");
    }

    #[test]
    fn test_resolve_mismatch_with_empty_roster_is_safe() {
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        room.flip(conn(1), 2).unwrap();
        room.leave(conn(1));
        room.leave(conn(2));

        room.resolve_mismatch();
        assert!(room.temp_flips().is_empty());
    }

    // =====================================================================
    // Snapshots
    // =====================================================================

    #[test]
    fn test_lobby_snapshot_names_host() {
        let room = started_room(2);
        match room.lobby_snapshot() {
            ServerEvent::LobbyUpdate {
                players,
                host,
                started,
                ..
            } => {
                assert_eq!(players.len(), 2);
                assert_eq!(host.as_deref(), Some("Alice"));
                assert!(started);
            }
            other => panic!("expected LobbyUpdate, got {other:?}"),
        }
    }

    #[test]
    fn test_board_snapshot_hides_card_values() {
        let mut room = started_room(2);
        room.flip(conn(1), 0).unwrap();
        match room.board_snapshot() {
            ServerEvent::BoardState {
                revealed,
                temp,
                current_turn,
                ..
            } => {
                assert_eq!(revealed.len(), 4);
                assert_eq!(temp, [0]);
                assert_eq!(current_turn, 0);
            }
            other => panic!("expected BoardState, got {other:?}"),
        }
    }

    #[test]
    fn test_start_snapshot_reports_card_count_only() {
        let room = started_room(8);
        match room.start_snapshot() {
            ServerEvent::GameStarted {
                card_count,
                players,
                current_turn,
            } => {
                assert_eq!(card_count, 16);
                assert_eq!(players.len(), 2);
                assert_eq!(current_turn, 0);
            }
            other => panic!("expected GameStarted, got {other:?}"),
        }
    }
}
