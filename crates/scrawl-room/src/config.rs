//! Room configuration and round phases.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Settings shared by every room the registry creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Maximum players allowed in a room.
    pub max_players: usize,

    /// Below this many players a started game is stopped and no new round
    /// begins until someone else joins.
    pub min_players: usize,

    /// How long guessers have once the word is chosen.
    pub round_duration: Duration,

    /// How long the drawer has to pick a word.
    pub word_choice_timeout: Duration,

    /// Pause between the end of one round and the start of the next.
    pub intermission: Duration,

    /// How many candidate words the drawer is offered.
    pub candidate_count: usize,

    /// Points awarded for guessing the word.
    pub correct_guess_bonus: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_players: 10,
            min_players: 2,
            round_duration: Duration::from_secs(90),
            word_choice_timeout: Duration::from_secs(15),
            intermission: Duration::from_secs(3),
            candidate_count: 3,
            correct_guess_bonus: 100,
        }
    }
}

impl RoomConfig {
    /// Round length in whole seconds, as shown on the client's timer.
    ///
    /// Partial seconds round up and the result is never below one, so an
    /// active round always has a running countdown.
    pub fn round_seconds(&self) -> u32 {
        let secs = self.round_duration.as_secs()
            + u64::from(self.round_duration.subsec_nanos() > 0);
        u32::try_from(secs.max(1)).unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// RoundPhase
// ---------------------------------------------------------------------------

/// Where a room is in its round cycle.
///
/// ```text
/// Idle → ChoosingWord → Active → Ending → ChoosingWord → ...
///            │                     ↑
///            └──(choice timeout)───┘
/// ```
///
/// Any phase drops back to `Idle` when the room runs out of players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round running: never started, or not enough players.
    Idle,
    /// A drawer has been picked and is choosing the word.
    ChoosingWord,
    /// The word is set and guesses are open.
    Active,
    /// The round just ended; the next one starts after a short pause.
    Ending,
}

impl RoundPhase {
    /// `true` while a drawer holds the pen.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::ChoosingWord | Self::Active)
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::ChoosingWord => write!(f, "ChoosingWord"),
            Self::Active => write!(f, "Active"),
            Self::Ending => write!(f, "Ending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.max_players, 10);
        assert_eq!(config.min_players, 2);
        assert_eq!(config.round_seconds(), 90);
        assert_eq!(config.word_choice_timeout, Duration::from_secs(15));
        assert_eq!(config.intermission, Duration::from_secs(3));
        assert_eq!(config.candidate_count, 3);
        assert_eq!(config.correct_guess_bonus, 100);
    }

    #[test]
    fn test_round_seconds_rounds_up_to_at_least_one() {
        let with = |round_duration| RoomConfig {
            round_duration,
            ..RoomConfig::default()
        };
        assert_eq!(with(Duration::from_millis(500)).round_seconds(), 1);
        assert_eq!(with(Duration::ZERO).round_seconds(), 1);
        assert_eq!(with(Duration::from_millis(2_100)).round_seconds(), 3);
        assert_eq!(with(Duration::from_secs(90)).round_seconds(), 90);
    }

    #[test]
    fn test_round_phase_is_running() {
        assert!(!RoundPhase::Idle.is_running());
        assert!(RoundPhase::ChoosingWord.is_running());
        assert!(RoundPhase::Active.is_running());
        assert!(!RoundPhase::Ending.is_running());
    }

    #[test]
    fn test_round_phase_display() {
        assert_eq!(RoundPhase::ChoosingWord.to_string(), "ChoosingWord");
        assert_eq!(RoundPhase::Ending.to_string(), "Ending");
    }
}
