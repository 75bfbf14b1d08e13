//! Error types for the room layer.
//!
//! The `Display` text of the user-facing variants is exactly what the
//! offending player sees in an `error` notification.

use scrawl_protocol::RoomCode;

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// Join request with a blank username or room code.
    #[error("Username and Room ID are required.")]
    MissingJoinFields,

    /// Another player in the room already uses this name.
    #[error("Username already taken in this room. Please choose another.")]
    DuplicateUsername,

    /// The room already holds the configured maximum.
    #[error("This room is full. Please try another room.")]
    RoomFull,

    /// The drawer tried to choose a word outside the choosing window.
    #[error("You already chose a word or it's not your turn to choose.")]
    WordAlreadyChosen,

    /// Someone other than the drawer tried to choose a word.
    #[error("Not authorized to choose a word.")]
    NotAuthorized,

    /// The drawer submitted an empty word.
    #[error("The chosen word cannot be empty.")]
    BlankWord,

    /// Someone other than the drawer tried to clear the canvas.
    #[error("Only the drawer can clear the canvas.")]
    NotDrawer,

    /// The room does not exist (or was already destroyed).
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}

impl RoomError {
    /// `true` if the player should be told about this error.
    ///
    /// Lookups that miss because a room was torn down under a stale
    /// client are dropped quietly instead.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::NotFound(_) | Self::Unavailable(_))
    }
}
