//! The per-connection session context.
//!
//! A "session" is the server's record of one connected socket: who the
//! player is and which room they are in. It's owned by the connection
//! task and handed to the event handlers, so nothing about room
//! membership has to be bolted onto the transport connection itself.

use std::time::Instant;

use scrawl_protocol::{RoomCode, SessionId};

use crate::SessionError;

/// Where a session currently is.
///
/// ```text
///   Lobby ──(joined)──→ InRoom ──(left / disconnect)──→ Lobby
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Connected but not a member of any room.
    Lobby,
    /// Member of `room` under the display name `username`.
    InRoom { room: RoomCode, username: String },
}

/// One connected player.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    state: SessionState,
    connected_at: Instant,
}

impl Session {
    /// A fresh session that hasn't joined a room yet.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            state: SessionState::Lobby,
            connected_at: Instant::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The room this session is in, if any.
    pub fn room(&self) -> Option<&RoomCode> {
        match &self.state {
            SessionState::InRoom { room, .. } => Some(room),
            SessionState::Lobby => None,
        }
    }

    /// The display name used in the current room, if any.
    pub fn username(&self) -> Option<&str> {
        match &self.state {
            SessionState::InRoom { username, .. } => Some(username),
            SessionState::Lobby => None,
        }
    }

    pub fn is_in_room(&self, code: &RoomCode) -> bool {
        self.room() == Some(code)
    }

    /// Checks that an in-room event is addressed to this session's room.
    ///
    /// # Errors
    /// [`SessionError::NotInRoom`] for any other room, including when the
    /// session is in the lobby.
    pub fn require_room(&self, code: &RoomCode) -> Result<(), SessionError> {
        if self.is_in_room(code) {
            Ok(())
        } else {
            Err(SessionError::NotInRoom(code.clone()))
        }
    }

    /// How long the socket has been open.
    pub fn uptime(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }

    /// Checks that the session may join a room, without changing it.
    ///
    /// # Errors
    /// [`SessionError::AlreadyInRoom`] if the session is already a member
    /// of a room. A session plays in one room at a time.
    pub fn ensure_lobby(&self) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Lobby => Ok(()),
            SessionState::InRoom { room, .. } => Err(SessionError::AlreadyInRoom(room.clone())),
        }
    }

    /// Records a successful join.
    ///
    /// # Errors
    /// [`SessionError::AlreadyInRoom`] if the session is already in a room.
    pub fn enter_room(&mut self, room: RoomCode, username: String) -> Result<(), SessionError> {
        self.ensure_lobby()?;
        tracing::debug!(session = %self.id, %room, %username, "session entered room");
        self.state = SessionState::InRoom { room, username };
        Ok(())
    }

    /// Returns the session to the lobby, yielding the room it left.
    pub fn leave_room(&mut self) -> Option<RoomCode> {
        match std::mem::replace(&mut self.state, SessionState::Lobby) {
            SessionState::InRoom { room, .. } => {
                tracing::debug!(session = %self.id, %room, "session left room");
                Some(room)
            }
            SessionState::Lobby => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_in_lobby() {
        let session = Session::new(SessionId(1));
        assert_eq!(session.id(), SessionId(1));
        assert_eq!(session.state(), &SessionState::Lobby);
        assert!(session.room().is_none());
        assert!(session.username().is_none());
    }

    #[test]
    fn test_enter_room_records_membership() {
        let mut session = Session::new(SessionId(1));
        session.enter_room("R1".into(), "ann".into()).unwrap();

        assert_eq!(session.room(), Some(&RoomCode::from("R1")));
        assert_eq!(session.username(), Some("ann"));
        assert!(session.is_in_room(&"R1".into()));
        assert!(!session.is_in_room(&"r1".into()));
        assert!(session.require_room(&"R1".into()).is_ok());
        assert!(matches!(
            session.require_room(&"R2".into()),
            Err(SessionError::NotInRoom(_))
        ));
    }

    #[test]
    fn test_enter_second_room_is_rejected() {
        let mut session = Session::new(SessionId(1));
        session.enter_room("R1".into(), "ann".into()).unwrap();

        let err = session.enter_room("R2".into(), "ann".into()).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyInRoom(ref code) if code.as_str() == "R1"));
        assert_eq!(session.room(), Some(&RoomCode::from("R1")));
    }

    #[test]
    fn test_leave_room_returns_to_lobby() {
        let mut session = Session::new(SessionId(1));
        session.enter_room("R1".into(), "ann".into()).unwrap();

        assert_eq!(session.leave_room(), Some(RoomCode::from("R1")));
        assert_eq!(session.state(), &SessionState::Lobby);
        assert_eq!(session.leave_room(), None, "leaving twice is a no-op");
        assert!(session.ensure_lobby().is_ok());
    }
}
