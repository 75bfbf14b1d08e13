//! Wire protocol for Scrawl.
//!
//! This crate defines the language that browser clients and the server
//! speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`SessionId`],
//!   [`RoomCode`]): the events that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those events are
//!   converted to and from text frames.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (text frames) → Protocol (ClientEvent) → Room (game rules)
//! ```
//!
//! The protocol layer knows nothing about connections or rooms.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ChatKind, ClientEvent, EventKind, Point, PublicPlayer, Recipient, RoomCode, ServerEvent,
    SessionId,
};
