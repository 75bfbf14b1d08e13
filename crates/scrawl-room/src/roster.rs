//! The players in one room, in join order.
//!
//! Join order matters: drawer rotation walks the roster by index.

use scrawl_protocol::{PublicPlayer, SessionId};

/// One player's record inside a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: SessionId,
    pub username: String,
    /// Never decreases during the room's lifetime.
    pub score: u32,
    pub is_drawer: bool,
    /// Reset at the start and end of every round.
    pub guessed_this_round: bool,
}

impl Player {
    fn new(id: SessionId, username: String) -> Self {
        Self {
            id,
            username,
            score: 0,
            is_drawer: false,
            guessed_this_round: false,
        }
    }

    /// The view other players get. Leaves out the per-round guess flag.
    pub fn to_public(&self) -> PublicPlayer {
        PublicPlayer {
            id: self.id,
            username: self.username.clone(),
            score: self.score,
            is_drawer: self.is_drawer,
        }
    }
}

#[derive(Debug, Default)]
pub struct PlayerRoster {
    players: Vec<Player>,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new player at the end of the rotation.
    pub fn append(&mut self, id: SessionId, username: impl Into<String>) {
        self.players.push(Player::new(id, username.into()));
    }

    /// Removes a player, returning the index they held and their record.
    pub fn remove(&mut self, id: SessionId) -> Option<(usize, Player)> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some((index, self.players.remove(index)))
    }

    pub fn find(&self, id: SessionId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Exact, case-sensitive match.
    pub fn has_username(&self, username: &str) -> bool {
        self.players.iter().any(|p| p.username == username)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Snapshot for `updatePlayers`.
    pub fn public_view(&self) -> Vec<PublicPlayer> {
        self.players.iter().map(Player::to_public).collect()
    }

    /// The player currently flagged as drawer.
    pub fn drawer(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_drawer)
    }

    /// Flags the player at `index` as drawer and everyone else as not.
    pub fn set_drawer(&mut self, index: usize) {
        for (i, player) in self.players.iter_mut().enumerate() {
            player.is_drawer = i == index;
        }
    }

    pub fn clear_drawer(&mut self) {
        for player in &mut self.players {
            player.is_drawer = false;
        }
    }

    pub fn reset_guesses(&mut self) {
        for player in &mut self.players {
            player.guessed_this_round = false;
        }
    }

    /// Credits a correct guess and returns the new score.
    ///
    /// Returns `None` if the player is unknown or has already scored this
    /// round, so a player can never be paid twice for one round.
    pub fn award(&mut self, id: SessionId, bonus: u32) -> Option<u32> {
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        if player.guessed_this_round {
            return None;
        }
        player.guessed_this_round = true;
        player.score = player.score.saturating_add(bonus);
        Some(player.score)
    }
}
