//! Error types for the session layer.

use scrawl_protocol::RoomCode;

/// Errors raised by per-connection session bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session already belongs to a room.
    #[error("You are already in room {0}. Leave it before joining another.")]
    AlreadyInRoom(RoomCode),

    /// An event referenced a room the session is not a member of.
    #[error("not a member of room {0}")]
    NotInRoom(RoomCode),
}
