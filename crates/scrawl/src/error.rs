//! Unified error type for the Scrawl server.

use scrawl_protocol::ProtocolError;
use scrawl_room::RoomError;
use scrawl_session::SessionError;
use scrawl_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ScrawlError {
    /// A transport-level error (bind, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (already in a room, not in this room).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (validation failure, room gone).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The `PORT` environment variable isn't a valid port number.
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),
}

impl ScrawlError {
    /// Whether the error should be reported to the player as an `error`
    /// event. Everything else is only logged: events aimed at a room the
    /// player isn't in, or at one that has already gone away, are dropped.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::Room(e) => e.is_user_facing(),
            Self::Session(SessionError::AlreadyInRoom(_)) => true,
            _ => false,
        }
    }
}
