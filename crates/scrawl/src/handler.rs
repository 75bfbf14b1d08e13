//! Per-connection handler: decode events, route them, push room events out.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The task owns the player's [`Session`] and an outbound channel that the
//! room actor writes to. One `select!` loop waits on both:
//!   - a frame from the socket → decode → dispatch by event kind
//!   - an event from the room → encode → send to the socket

use std::sync::Arc;

use scrawl_protocol::{ClientEvent, Codec, Point, RoomCode, ServerEvent, SessionId};
use scrawl_room::{PlayerSender, RoomHandle, RoomInput};
use scrawl_session::{Session, SessionError};
use scrawl_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ScrawlError;
use crate::server::ServerState;

/// Owns the connection's session and performs the implicit leave when
/// the handler exits.
///
/// The leave runs even if the handler returns early with an error or
/// panics. Since `Drop` is synchronous, it's spawned as a fire-and-forget
/// task that takes the registry lock.
struct SessionGuard<C: Codec> {
    session: Session,
    /// Handle to the session's current room, set while `session` is in it.
    room: Option<RoomHandle>,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> SessionGuard<C> {
    fn room_handle(&self, code: &RoomCode) -> Result<&RoomHandle, SessionError> {
        self.session.require_room(code)?;
        self.room
            .as_ref()
            .ok_or_else(|| SessionError::NotInRoom(code.clone()))
    }
}

impl<C: Codec> Drop for SessionGuard<C> {
    fn drop(&mut self) {
        self.room = None;
        let username = self.session.username().unwrap_or_default().to_owned();
        let Some(code) = self.session.leave_room() else {
            return;
        };
        let session_id = self.session.id();
        tracing::info!(%session_id, room = %code, %username, "player disconnected from room");
        let state = Arc::clone(&self.state);
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        runtime.spawn(async move {
            let mut registry = state.registry.lock().await;
            if let Err(e) = registry.leave(session_id, &code).await {
                tracing::debug!(%session_id, room = %code, error = %e, "disconnect leave failed");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), ScrawlError> {
    let conn_id = conn.id();
    let session_id = SessionId(conn_id.into_inner());
    tracing::info!(%conn_id, %session_id, "player connected");

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let mut guard = SessionGuard {
        session: Session::new(session_id),
        room: None,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            frame = conn.recv() => {
                let frame = match frame {
                    Ok(Some(frame)) => frame,
                    Ok(None) => {
                        tracing::info!(
                            %session_id,
                            uptime = ?guard.session.uptime(),
                            "connection closed cleanly"
                        );
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%session_id, error = %e, "recv error");
                        break;
                    }
                };

                let event: ClientEvent = match state.codec.decode(&frame) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(%session_id, error = %e, "failed to decode event");
                        continue;
                    }
                };

                handle_event(&mut guard, &state, &outbound_tx, event).await;
            }
            Some(event) = outbound_rx.recv() => {
                let frame = state.codec.encode(&event)?;
                conn.send(&frame).await?;
            }
        }
    }

    // guard drops here → implicit leave fires.
    Ok(())
}

/// Dispatches one inbound event by kind. Rejections that the player should
/// hear about come back to them as an `error` event; the rest are logged.
async fn handle_event<C: Codec>(
    guard: &mut SessionGuard<C>,
    state: &ServerState<C>,
    outbound: &PlayerSender,
    event: ClientEvent,
) {
    let session_id = guard.session.id();
    let kind = event.kind();

    let result = match event {
        ClientEvent::JoinRoom {
            username,
            room_code,
        } => join_room(guard, state, outbound, username, room_code).await,
        ClientEvent::LeaveRoom { room_code } => leave_room(guard, state, &room_code).await,
        ClientEvent::WordChosen { room_code, word } => {
            forward(guard, &room_code, RoomInput::WordChosen(word)).await
        }
        ClientEvent::Drawing { room_code, x, y } => {
            forward(guard, &room_code, RoomInput::Drawing(Point { x, y })).await
        }
        ClientEvent::ClearCanvas { room_code } => {
            forward(guard, &room_code, RoomInput::ClearCanvas).await
        }
        ClientEvent::ChatMessage {
            room_code, message, ..
        } => forward(guard, &room_code, RoomInput::Chat(message)).await,
    };

    if let Err(e) = result {
        tracing::debug!(%session_id, %kind, error = %e, "event rejected");
        if e.is_user_facing() {
            let _ = outbound.send(ServerEvent::error(e.to_string()));
        }
    }
}

async fn join_room<C: Codec>(
    guard: &mut SessionGuard<C>,
    state: &ServerState<C>,
    outbound: &PlayerSender,
    username: String,
    code: RoomCode,
) -> Result<(), ScrawlError> {
    guard.session.ensure_lobby()?;

    let session_id = guard.session.id();
    let handle = state
        .registry
        .lock()
        .await
        .join(session_id, &username, &code, outbound.clone())
        .await?;

    tracing::info!(%session_id, room = %code, username = username.trim(), "player joined room");
    guard.session.enter_room(code, username.trim().to_owned())?;
    guard.room = Some(handle);
    Ok(())
}

async fn leave_room<C: Codec>(
    guard: &mut SessionGuard<C>,
    state: &ServerState<C>,
    code: &RoomCode,
) -> Result<(), ScrawlError> {
    guard.session.require_room(code)?;
    let session_id = guard.session.id();
    let username = guard.session.username().unwrap_or_default().to_owned();
    guard.room = None;
    guard.session.leave_room();

    state.registry.lock().await.leave(session_id, code).await?;
    tracing::info!(%session_id, room = %code, %username, "player left room");
    Ok(())
}

/// Sends in-room input straight to the session's room actor.
async fn forward<C: Codec>(
    guard: &SessionGuard<C>,
    code: &RoomCode,
    input: RoomInput,
) -> Result<(), ScrawlError> {
    let handle = guard.room_handle(code)?;
    handle.send_input(guard.session.id(), input).await?;
    Ok(())
}
