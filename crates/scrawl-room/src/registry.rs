//! Room registry: creates, finds and destroys rooms by code.

use std::collections::HashMap;
use std::sync::Arc;

use scrawl_protocol::{RoomCode, SessionId};

use crate::room::spawn_room;
use crate::{PlayerSender, RoomConfig, RoomError, RoomHandle, RoomInfo, WordBank};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Every live room in the process, keyed by room code.
///
/// The only place rooms are created or destroyed. A room exists exactly
/// while it has at least one player: the first join creates it and the
/// last leave tears it down.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, RoomHandle>,
    config: RoomConfig,
    words: Arc<WordBank>,
}

impl RoomRegistry {
    pub fn new(config: RoomConfig, words: WordBank) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
            words: Arc::new(words),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Puts a player into the room with `code`, creating it on first use.
    ///
    /// Returns a handle the caller can use to send that player's input
    /// straight to the room.
    ///
    /// # Errors
    /// [`RoomError::MissingJoinFields`] for a blank username or code, or
    /// whatever the room rejected the join with.
    pub async fn join(
        &mut self,
        session: SessionId,
        username: &str,
        code: &RoomCode,
        sender: PlayerSender,
    ) -> Result<RoomHandle, RoomError> {
        if username.trim().is_empty() || code.is_blank() {
            return Err(RoomError::MissingJoinFields);
        }

        let created = !self.rooms.contains_key(code);
        let handle = self
            .rooms
            .entry(code.clone())
            .or_insert_with(|| {
                tracing::info!(room = %code, "room created");
                spawn_room(
                    code.clone(),
                    self.config.clone(),
                    Arc::clone(&self.words),
                    DEFAULT_CHANNEL_SIZE,
                )
            })
            .clone();

        match handle.join(session, username.to_owned(), sender).await {
            Ok(()) => Ok(handle),
            Err(e) => {
                // A room nobody managed to enter must not linger.
                if created {
                    self.destroy(code).await;
                }
                Err(e)
            }
        }
    }

    /// Takes a player out of a room, destroying the room if it's now
    /// empty.
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if no such room exists, which happens when
    /// a stale leave races the room's teardown.
    pub async fn leave(&mut self, session: SessionId, code: &RoomCode) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        let remaining = match handle.leave(session).await {
            Ok(n) => n,
            // The actor is gone, so the room is as good as empty.
            Err(RoomError::Unavailable(_)) => 0,
            Err(e) => return Err(e),
        };
        if remaining == 0 {
            self.destroy(code).await;
        }
        Ok(())
    }

    async fn destroy(&mut self, code: &RoomCode) {
        if let Some(handle) = self.rooms.remove(code) {
            let _ = handle.shutdown().await;
            tracing::info!(room = %code, "room destroyed");
        }
    }

    pub fn handle(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).cloned()
    }

    pub async fn room_info(&self, code: &RoomCode) -> Result<RoomInfo, RoomError> {
        self.rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?
            .info()
            .await
    }

    pub fn contains(&self, code: &RoomCode) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Live room codes, sorted.
    pub fn room_codes(&self) -> Vec<RoomCode> {
        let mut codes: Vec<_> = self.rooms.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Shuts every room down. Used when the server stops.
    pub async fn shutdown_all(&mut self) {
        for (code, handle) in self.rooms.drain() {
            let _ = handle.shutdown().await;
            tracing::debug!(room = %code, "room shut down");
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default(), WordBank::default())
    }
}
