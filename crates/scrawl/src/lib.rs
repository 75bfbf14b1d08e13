//! # Scrawl
//!
//! Real-time multiplayer drawing-and-guessing game server.
//!
//! Players connect over WebSocket and join rooms by code. In each round one
//! player picks a secret word from a few candidates and draws it; everyone
//! else races to guess it in chat. The first correct guess scores, the
//! round ends, and the drawer role moves to the next player.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrawl::prelude::*;
//!
//! # async fn start() -> Result<(), ScrawlError> {
//! let config = ServerConfig::from_env()?;
//! let server = ScrawlServer::builder().config(&config).build().await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig};
pub use error::ScrawlError;
pub use server::{ScrawlServer, ScrawlServerBuilder};

/// Everything needed to configure and run a server, plus the wire events.
pub mod prelude {
    pub use crate::{ScrawlError, ScrawlServer, ScrawlServerBuilder, ServerConfig};
    pub use scrawl_protocol::{
        ChatKind, ClientEvent, Point, PublicPlayer, RoomCode, ServerEvent, SessionId,
    };
    pub use scrawl_room::{RoomConfig, WordBank};
}
