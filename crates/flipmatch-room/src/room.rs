//! Room actor: an isolated Tokio task that owns one game.
//!
//! Each room runs in its own task and talks to the outside world through
//! an mpsc channel, so every operation against a room is strictly
//! serialized and rooms never block each other. The one timer in the
//! system — the visible-mismatch pacing delay — is the second arm of the
//! actor's `select!` loop: while it is pending the actor keeps serving
//! joins, leaves, and broadcasts, but the availability check in
//! [`Room::flip`] turns away any new flip until the resolution lands.

use std::collections::HashMap;
use std::time::Duration;

use flipmatch_protocol::{CardValue, ConnectionId, RoomCode, ServerEvent};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::state::{FlipAction, JoinOutcome};
use crate::{Room, RoomError};

/// Channel sender for delivering outbound events to one connection.
/// The gateway's per-connection writer task drains the other end.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel. The
/// `oneshot::Sender` in each variant is the reply channel the caller
/// waits on.
pub(crate) enum RoomCommand {
    /// Claim hostship (create_room path), registering an outbound channel.
    ClaimHost {
        conn: ConnectionId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Join as a player, registering an outbound channel.
    Join {
        conn: ConnectionId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Remove a player (explicit leave or disconnect — same effect).
    Leave {
        conn: ConnectionId,
        reply: oneshot::Sender<LeaveReply>,
    },

    /// Start the game (host only).
    Start {
        conn: ConnectionId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Flip a card. `index` is raw client input, validated inside.
    Flip {
        conn: ConnectionId,
        index: i64,
        reply: oneshot::Sender<Result<FlipReply, RoomError>>,
    },
}

/// What a leave did. Leaves are never errors — removing an absent player
/// is a no-op, matching how disconnect noise is treated.
#[derive(Debug, Clone, Copy)]
pub struct LeaveReply {
    /// `true` when a player was actually removed.
    pub removed: bool,
    /// `true` when the roster is now empty: the caller must delete the
    /// room's registry entry.
    pub empty: bool,
}

/// What an accepted flip did, as far as the gateway needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipReply {
    /// `true` when this flip ended the game: the room has broadcast
    /// `game_over` and the caller must delete its registry entry.
    pub finished: bool,
}

/// Handle to a running room actor. Cheap to clone — an `mpsc::Sender`
/// plus the code.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The code this room is registered under.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Claims hostship for `conn`, registering its outbound channel.
    pub async fn claim_host(
        &self,
        conn: ConnectionId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::ClaimHost {
                conn,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())?
    }

    /// Joins `conn` as a player, registering its outbound channel.
    pub async fn join(
        &self,
        conn: ConnectionId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                conn,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())?
    }

    /// Removes `conn` from the room.
    pub async fn leave(&self, conn: ConnectionId) -> Result<LeaveReply, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                conn,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())
    }

    /// Starts the game.
    pub async fn start(&self, conn: ConnectionId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Start {
                conn,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())?
    }

    /// Flips a card.
    pub async fn flip(
        &self,
        conn: ConnectionId,
        index: i64,
    ) -> Result<FlipReply, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Flip {
                conn,
                index,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.gone())?;
        reply_rx.await.map_err(|_| self.gone())?
    }

    /// A dead actor means the room reached its terminal state: callers
    /// see the same thing as a never-existing code.
    fn gone(&self) -> RoomError {
        RoomError::RoomNotFound(self.code.clone())
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    /// Per-member outbound channels, the broadcast fan-out set.
    senders: HashMap<ConnectionId, PlayerSender>,
    mismatch_delay: Duration,
    /// When set, a mismatch is face-up and resolves at this instant.
    pending_until: Option<Instant>,
    /// Set once the room is finished or emptied; the loop exits as soon
    /// as no resolution is pending.
    closing: bool,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room = %self.room.code(), "room actor started");

        loop {
            if self.closing && self.pending_until.is_none() {
                break;
            }

            let deadline = self.pending_until;
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => break,
                    }
                }
                // The pacing delay. The future is rebuilt each iteration
                // from the stored deadline, so commands handled mid-delay
                // don't reset it.
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    self.finish_mismatch();
                }
            }
        }

        tracing::info!(room = %self.room.code(), "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::ClaimHost {
                conn,
                name,
                sender,
                reply,
            } => {
                let result = self.handle_claim_host(conn, &name, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Join {
                conn,
                name,
                sender,
                reply,
            } => {
                let result = self.handle_join(conn, &name, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Leave { conn, reply } => {
                let result = self.handle_leave(conn);
                let _ = reply.send(result);
            }
            RoomCommand::Start { conn, reply } => {
                let result = self.handle_start(conn);
                let _ = reply.send(result);
            }
            RoomCommand::Flip { conn, index, reply } => {
                let result = self.handle_flip(conn, index);
                let _ = reply.send(result);
            }
        }
    }

    fn handle_claim_host(
        &mut self,
        conn: ConnectionId,
        name: &str,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if self.closing {
            return Err(RoomError::RoomNotFound(self.room.code().clone()));
        }
        self.room.claim_host(conn, name)?;
        self.senders.insert(conn, sender);
        tracing::info!(
            room = %self.room.code(),
            %conn,
            "host claimed room"
        );
        // Claim and re-acknowledgement both refresh the lobby.
        self.broadcast(self.room.lobby_snapshot());
        Ok(())
    }

    fn handle_join(
        &mut self,
        conn: ConnectionId,
        name: &str,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if self.closing {
            return Err(RoomError::RoomNotFound(self.room.code().clone()));
        }
        let outcome = self.room.join(conn, name);
        self.senders.insert(conn, sender);
        if outcome == JoinOutcome::Joined {
            tracing::info!(
                room = %self.room.code(),
                %conn,
                players = self.room.players().len(),
                "player joined"
            );
            self.broadcast(self.room.lobby_snapshot());
        }
        Ok(())
    }

    fn handle_leave(&mut self, conn: ConnectionId) -> LeaveReply {
        let outcome = self.room.leave(conn);
        self.senders.remove(&conn);

        if !outcome.removed {
            return LeaveReply {
                removed: false,
                empty: outcome.empty,
            };
        }

        tracing::info!(
            room = %self.room.code(),
            %conn,
            players = self.room.players().len(),
            "player left"
        );

        if outcome.empty {
            // Last player gone. If a mismatch is still pending, the loop
            // stays alive until the timer settles it, then exits.
            self.closing = true;
        } else {
            self.broadcast(self.room.lobby_snapshot());
        }

        LeaveReply {
            removed: true,
            empty: outcome.empty,
        }
    }

    fn handle_start(&mut self, conn: ConnectionId) -> Result<(), RoomError> {
        self.room.start(conn)?;
        tracing::info!(
            room = %self.room.code(),
            players = self.room.players().len(),
            "game started"
        );
        self.broadcast(self.room.start_snapshot());
        self.broadcast(self.room.board_snapshot());
        Ok(())
    }

    fn handle_flip(
        &mut self,
        conn: ConnectionId,
        index: i64,
    ) -> Result<FlipReply, RoomError> {
        let flip = self.room.flip(conn, index)?;

        // Every accepted flip is shown room-wide before resolution.
        self.broadcast(ServerEvent::CardFlipped {
            index: flip.index,
            value: flip.value,
        });

        match flip.action {
            FlipAction::AwaitingSecond => Ok(FlipReply { finished: false }),

            FlipAction::Matched {
                indices,
                player,
                finished,
            } => {
                self.broadcast(ServerEvent::MatchResult {
                    matched: true,
                    indices,
                    player,
                });

                if finished {
                    tracing::info!(room = %self.room.code(), "game over");
                    self.broadcast(ServerEvent::GameOver {
                        players: self.room.scores(),
                    });
                    self.closing = true;
                    return Ok(FlipReply { finished: true });
                }

                self.broadcast(self.room.board_snapshot());
                self.broadcast(self.room.lobby_snapshot());
                Ok(FlipReply { finished: false })
            }

            FlipAction::Mismatched { indices, player } => {
                self.broadcast(ServerEvent::MatchResult {
                    matched: false,
                    indices,
                    player,
                });
                // Leave both cards face-up for the pacing delay; the timer
                // arm of the actor loop advances the turn.
                self.pending_until = Some(Instant::now() + self.mismatch_delay);
                Ok(FlipReply { finished: false })
            }
        }
    }

    /// Timer arm: the mismatch pacing delay elapsed.
    fn finish_mismatch(&mut self) {
        self.pending_until = None;
        self.room.resolve_mismatch();

        if self.room.players().is_empty() {
            // Everyone left mid-delay; the registry entry is already
            // gone, so just fall out of the loop.
            self.closing = true;
            return;
        }

        self.broadcast(self.room.board_snapshot());
        self.broadcast(self.room.lobby_snapshot());
    }

    /// Sends an event to every member. Drops silently for members whose
    /// receiver is gone (connection torn down but leave not processed yet).
    fn broadcast(&self, event: ServerEvent) {
        for sender in self.senders.values() {
            let _ = sender.send(event.clone());
        }
    }
}

/// Spawns a room actor task and returns a handle to it.
///
/// `channel_size` bounds the command queue — senders wait when it fills.
pub(crate) fn spawn_room(
    code: RoomCode,
    cards: Vec<CardValue>,
    mismatch_delay: Duration,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room: Room::new(code.clone(), cards),
        senders: HashMap::new(),
        mismatch_delay,
        pending_until: None,
        closing: false,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
