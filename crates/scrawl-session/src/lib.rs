//! Per-connection session context for Scrawl.
//!
//! Each socket gets one [`Session`] that records its id and its room
//! membership. Handlers take the session by reference instead of reading
//! ad hoc fields off the connection.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)     ← keyed by SessionId, never sees the Session
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below) ← provides SessionId, RoomCode
//! ```

mod error;
mod session;

pub use error::SessionError;
pub use session::{Session, SessionState};
