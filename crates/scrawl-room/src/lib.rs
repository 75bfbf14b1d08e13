//! Rooms and rounds for Scrawl.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! roster, round state and timers.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates/destroys rooms by code, routes joins and leaves
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoundController`]: the synchronous round state machine inside a room
//! - [`TurnScheduler`]: drawer rotation plus the word-choice, round and
//!   intermission timers
//! - [`PlayerRoster`], [`DrawingRelay`], [`WordBank`]: the room's data
//! - [`evaluate_guess`]: decides whether a chat line is a (correct) guess

mod config;
mod error;
mod guess;
mod registry;
mod relay;
mod room;
mod roster;
mod round;
mod scheduler;
mod words;

pub use config::{RoomConfig, RoundPhase};
pub use error::RoomError;
pub use guess::{GuessContext, GuessVerdict, evaluate_guess};
pub use registry::RoomRegistry;
pub use relay::DrawingRelay;
pub use room::{PlayerSender, RoomHandle, RoomInput};
pub use roster::{Player, PlayerRoster};
pub use round::{Outbound, RoomInfo, RoundController};
pub use scheduler::{TimerEvent, TurnScheduler};
pub use words::{WordBank, mask_word};
