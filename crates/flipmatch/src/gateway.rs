//! Session gateway: per-connection handler and event routing.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. The flow is:
//!   1. Spawn a writer task pumping the connection's outbound channel —
//!      the same channel the room actor broadcasts into — onto the socket.
//!   2. Loop: receive frames → decode [`ClientEvent`] → route to the
//!      registry / room.
//!   3. On teardown (clean close, error, or noisy drop), run the
//!      disconnect cleanup exactly once: leave whatever room the
//!      connection belonged to.
//!
//! Failures are translated into `error` / `turn_error` / `*_failed`
//! events for the originating connection only — never broadcast.

use std::sync::Arc;

use flipmatch_protocol::{ClientEvent, Codec, ConnectionId, RoomCode, ServerEvent};
use flipmatch_room::{RoomError, RoomRegistry};
use flipmatch_transport::{Connection, WebSocketConnection};
use tokio::sync::{Mutex, mpsc};

use crate::FlipmatchError;

/// Shared server state handed to every connection handler task.
pub(crate) struct ServerState<C: Codec> {
    /// The room registry. Locked only for insert/lookup/delete — room
    /// operations run on cloned handles after the lock is dropped.
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// The outbound lane for one connection. Room broadcasts and direct
/// replies share it, so a client sees events in a single consistent order.
type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), FlipmatchError>
where
    C: Codec + Clone,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Writer task: drains the outbound channel onto the socket. Ends when
    // the channel closes (handler exit) or the socket breaks.
    let writer = tokio::spawn({
        let conn = conn.clone();
        let codec = state.codec.clone();
        async move {
            while let Some(event) = rx.recv().await {
                let bytes = match codec.encode(&event) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to encode outbound event");
                        continue;
                    }
                };
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }
        }
    });

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                // Malformed frames don't kill the connection — answer
                // with a plain error and keep reading.
                tracing::debug!(%conn_id, error = %e, "undecodable client event");
                let _ = tx.send(ServerEvent::Error {
                    msg: "malformed event".into(),
                });
                continue;
            }
        };

        dispatch_event(&state, conn_id, &tx, event).await;
    }

    disconnect_cleanup(&state, conn_id).await;

    // Closing the channel stops the writer.
    drop(tx);
    let _ = writer.await;
    Ok(())
}

/// Routes one decoded client event to the registry / room layer.
async fn dispatch_event<C: Codec + Clone>(
    state: &Arc<ServerState<C>>,
    conn_id: ConnectionId,
    tx: &EventSender,
    event: ClientEvent,
) {
    match event {
        ClientEvent::CreateRoom { name, room } => {
            handle_create_room(state, conn_id, tx, &name, room.as_deref()).await;
        }

        ClientEvent::JoinRoom { name, room } => {
            handle_join_room(state, conn_id, tx, &name, &room).await;
        }

        ClientEvent::StartGame { room } => {
            let Some(handle) = lookup(state, &room).await else {
                send_error(tx, "Room not found");
                return;
            };
            if let Err(e) = handle.start(conn_id).await {
                send_error(tx, &e.to_string());
            }
        }

        ClientEvent::FlipCard { room, index } => {
            let Some(handle) = lookup(state, &room).await else {
                send_error(tx, "Room not found");
                return;
            };
            match handle.flip(conn_id, index).await {
                Ok(reply) => {
                    if reply.finished {
                        // Terminal state: the room broadcast game_over and
                        // is shutting down — drop its registry entry now.
                        let mut registry = state.registry.lock().await;
                        registry.delete_room(handle.code());
                    }
                }
                Err(RoomError::NotYourTurn) => {
                    let _ = tx.send(ServerEvent::TurnError {
                        msg: RoomError::NotYourTurn.to_string(),
                    });
                }
                Err(RoomError::RoomNotFound(code)) => {
                    // Lost a race with the room's terminal state.
                    state.registry.lock().await.delete_room(&code);
                    send_error(tx, "Room not found");
                }
                Err(e) => send_error(tx, &e.to_string()),
            }
        }

        ClientEvent::LeaveRoom { room } => {
            // Malformed leave noise is ignored rather than answered.
            let Some(handle) = lookup(state, &room).await else {
                return;
            };
            if let Ok(reply) = handle.leave(conn_id).await {
                let mut registry = state.registry.lock().await;
                if reply.removed {
                    registry.unbind(conn_id);
                }
                if reply.empty {
                    registry.delete_room(handle.code());
                }
            }
        }
    }
}

/// Claim-or-create: resolve or create the room under one registry lock
/// hold, then claim hostship on the (unlocked) room handle.
async fn handle_create_room<C: Codec + Clone>(
    state: &Arc<ServerState<C>>,
    conn_id: ConnectionId,
    tx: &EventSender,
    name: &str,
    room: Option<&str>,
) {
    let name = display_name(name, "Host");
    let requested = room.and_then(RoomCode::parse);

    let handle = {
        let mut registry = state.registry.lock().await;
        match requested.as_ref().and_then(|code| registry.room(code)) {
            Some(handle) => Ok(handle),
            None => registry.create_room(requested),
        }
    };

    let handle = match handle {
        Ok(handle) => handle,
        Err(e) => {
            let _ = tx.send(ServerEvent::CreateFailed {
                reason: e.to_string(),
            });
            return;
        }
    };

    match handle.claim_host(conn_id, name, tx.clone()).await {
        Ok(()) => {
            state
                .registry
                .lock()
                .await
                .bind(conn_id, handle.code().clone());
            let _ = tx.send(ServerEvent::RoomCreated {
                room: handle.code().clone(),
            });
        }
        Err(e) => {
            let _ = tx.send(ServerEvent::CreateFailed {
                reason: e.to_string(),
            });
        }
    }
}

async fn handle_join_room<C: Codec + Clone>(
    state: &Arc<ServerState<C>>,
    conn_id: ConnectionId,
    tx: &EventSender,
    name: &str,
    room: &str,
) {
    let name = display_name(name, "Player");
    let Some(code) = RoomCode::parse(room) else {
        send_join_failed(tx);
        return;
    };
    let Some(handle) = state.registry.lock().await.room(&code) else {
        send_join_failed(tx);
        return;
    };

    match handle.join(conn_id, name, tx.clone()).await {
        Ok(()) => {
            state.registry.lock().await.bind(conn_id, code.clone());
            let _ = tx.send(ServerEvent::JoinOk { room: code });
        }
        Err(RoomError::RoomNotFound(code)) => {
            state.registry.lock().await.delete_room(&code);
            send_join_failed(tx);
        }
        Err(e) => {
            let _ = tx.send(ServerEvent::JoinFailed {
                reason: e.to_string(),
            });
        }
    }
}

/// The exactly-once teardown path: removes the connection from its room
/// (if any) via the O(1) membership index — no room scan.
async fn disconnect_cleanup<C: Codec + Clone>(
    state: &Arc<ServerState<C>>,
    conn_id: ConnectionId,
) {
    let (code, handle) = {
        let mut registry = state.registry.lock().await;
        let Some(code) = registry.unbind(conn_id) else {
            return;
        };
        let handle = registry.room(&code);
        (code, handle)
    };

    let Some(handle) = handle else {
        return;
    };

    if let Ok(reply) = handle.leave(conn_id).await {
        if reply.empty {
            state.registry.lock().await.delete_room(&code);
        }
    }
    tracing::info!(%conn_id, room = %code, "left room on disconnect");
}

/// Looks up a room by raw client input (normalized first).
async fn lookup<C: Codec + Clone>(
    state: &Arc<ServerState<C>>,
    room: &str,
) -> Option<flipmatch_room::RoomHandle> {
    let code = RoomCode::parse(room)?;
    state.registry.lock().await.room(&code)
}

fn send_error(tx: &EventSender, msg: &str) {
    let _ = tx.send(ServerEvent::Error { msg: msg.into() });
}

fn send_join_failed(tx: &EventSender) {
    let _ = tx.send(ServerEvent::JoinFailed {
        reason: "Room does not exist".into(),
    });
}

/// Trims the client-supplied display name, falling back to a default for
/// blank input.
fn display_name(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
