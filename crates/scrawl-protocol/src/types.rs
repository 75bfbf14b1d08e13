//! Core protocol types for Scrawl's wire format.
//!
//! Every frame on the wire is a JSON object of the shape
//! `{ "event": "<name>", "data": <payload> }`. Inbound frames decode into
//! [`ClientEvent`], outbound frames are built from [`ServerEvent`].
//! Event names and field names are camelCase so the browser client can
//! use them as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies one connected player for the lifetime of their socket.
///
/// A newtype over `u64`, so a session id can't be mixed up with any other
/// number. `#[serde(transparent)]` keeps it a plain number in JSON: the
/// client compares `roundStart.drawerId` against the ids it sees in
/// `updatePlayers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// The externally supplied key of a room.
///
/// Codes are case-sensitive: `"R1"` and `"r1"` are different rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wraps a code. No normalisation is applied.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if the code is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive an outbound event.
///
/// Room logic returns `(Recipient, ServerEvent)` pairs and the room actor
/// fans them out to the right player channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific player.
    Player(SessionId),
    /// Everyone except the given player (used to relay strokes back to
    /// everyone but the drawer).
    AllExcept(SessionId),
}

// ---------------------------------------------------------------------------
// Payload pieces
// ---------------------------------------------------------------------------

/// One stroke sample produced by the drawer's canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The public view of a player, as sent in `updatePlayers`.
///
/// Deliberately has no field for the secret word or for whether the
/// player already guessed this round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPlayer {
    pub id: SessionId,
    pub username: String,
    pub score: u32,
    pub is_drawer: bool,
}

/// Distinguishes player chat from server announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// Announcement generated by the server (`username` is `null`).
    System,
    /// A message typed by a player.
    Chat,
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Events a client can send.
///
/// `#[serde(tag = "event", content = "data")]` produces adjacently tagged
/// JSON:
///   `{ "event": "joinRoom", "data": { "username": "ann", "roomCode": "R1" } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// Missing fields decode as blank so the join can be rejected with
    /// an `error` rather than dropped as malformed.
    JoinRoom {
        #[serde(default)]
        username: String,
        #[serde(default)]
        room_code: RoomCode,
    },
    WordChosen { room_code: RoomCode, word: String },
    Drawing { room_code: RoomCode, x: f64, y: f64 },
    ClearCanvas { room_code: RoomCode },
    ChatMessage {
        room_code: RoomCode,
        message: String,
        /// Sent by the stock client but never trusted: the server always
        /// uses the roster name of the sending session.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    LeaveRoom { room_code: RoomCode },
}

/// The kind of a [`ClientEvent`], used as the dispatch key and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    JoinRoom,
    WordChosen,
    Drawing,
    ClearCanvas,
    ChatMessage,
    LeaveRoom,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::JoinRoom => "joinRoom",
            Self::WordChosen => "wordChosen",
            Self::Drawing => "drawing",
            Self::ClearCanvas => "clearCanvas",
            Self::ChatMessage => "chatMessage",
            Self::LeaveRoom => "leaveRoom",
        };
        f.write_str(name)
    }
}

impl ClientEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::JoinRoom { .. } => EventKind::JoinRoom,
            Self::WordChosen { .. } => EventKind::WordChosen,
            Self::Drawing { .. } => EventKind::Drawing,
            Self::ClearCanvas { .. } => EventKind::ClearCanvas,
            Self::ChatMessage { .. } => EventKind::ChatMessage,
            Self::LeaveRoom { .. } => EventKind::LeaveRoom,
        }
    }

    /// The room this event is addressed to.
    pub fn room_code(&self) -> &RoomCode {
        match self {
            Self::JoinRoom { room_code, .. }
            | Self::WordChosen { room_code, .. }
            | Self::Drawing { room_code, .. }
            | Self::ClearCanvas { room_code }
            | Self::ChatMessage { room_code, .. }
            | Self::LeaveRoom { room_code } => room_code,
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Events the server sends to one player or to a whole room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Full public roster, in join order.
    UpdatePlayers(Vec<PublicPlayer>),
    PlayerJoined { username: String },
    PlayerLeft { username: String },
    /// A round is underway. Also sent privately to late joiners.
    RoundStart {
        drawer_id: SessionId,
        word_hint: String,
        timer: u32,
    },
    TimerUpdate { seconds: u32 },
    RoundEnd { message: String },
    ClearCanvas,
    /// Sent to the drawer only.
    YourTurnToChooseWord { candidate_words: Vec<String> },
    CorrectGuess {
        username: String,
        word: String,
        score: u32,
    },
    NewGuess { username: String, guess: String },
    ChatMessage {
        username: Option<String>,
        message: String,
        #[serde(rename = "type")]
        kind: ChatKind,
    },
    Drawing(Point),
    Error { message: String },
}

impl ServerEvent {
    /// Builds a server announcement.
    pub fn system(message: impl Into<String>) -> Self {
        Self::ChatMessage {
            username: None,
            message: message.into(),
            kind: ChatKind::System,
        }
    }

    /// Builds an `error` notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
