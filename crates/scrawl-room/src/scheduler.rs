//! Drawer rotation and the room's three timers.

use std::time::Duration;

use scrawl_tick::{Countdown, Timer};

/// A timer that went off in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The drawer didn't pick a word in time.
    WordChoiceExpired,
    /// One second of the round elapsed.
    Tick { remaining: u32, finished: bool },
    /// The pause after a round is over.
    IntermissionElapsed,
}

/// Owns whose turn it is and every timer a room runs.
///
/// At most one of each timer is ever armed. Cancelling clears the
/// deadline, so a cancelled timer can't fire into a later round.
#[derive(Debug)]
pub struct TurnScheduler {
    /// `None` until the first round picks a drawer.
    drawer_index: Option<usize>,
    word_choice: Timer,
    countdown: Countdown,
    intermission: Timer,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self {
            drawer_index: None,
            word_choice: Timer::new("word-choice"),
            countdown: Countdown::per_second(),
            intermission: Timer::new("intermission"),
        }
    }

    pub fn drawer_index(&self) -> Option<usize> {
        self.drawer_index
    }

    /// Moves the pen to the next player in join order and returns their
    /// index. The first round starts at index 0.
    pub fn advance_drawer(&mut self, player_count: usize) -> Option<usize> {
        if player_count == 0 {
            self.drawer_index = None;
            return None;
        }
        let next = match self.drawer_index {
            Some(current) => (current + 1) % player_count,
            None => 0,
        };
        self.drawer_index = Some(next);
        Some(next)
    }

    /// Keeps the drawer index pointing at the right player after someone
    /// at `removed` left, leaving `remaining` players.
    ///
    /// - Left before the drawer: shift down so the same player keeps it.
    /// - The drawer left: step back one, so the next rotation lands on
    ///   whoever slid into the drawer's slot.
    /// - Left after the drawer: nothing moves.
    pub fn on_player_removed(&mut self, removed: usize, remaining: usize) {
        let Some(current) = self.drawer_index else {
            return;
        };
        if remaining == 0 {
            self.drawer_index = None;
            return;
        }
        self.drawer_index = Some(if removed < current {
            current - 1
        } else if removed == current {
            (removed + remaining - 1) % remaining
        } else {
            current
        });
    }

    pub fn arm_word_choice(&mut self, timeout: Duration) {
        self.word_choice.arm(timeout);
    }

    pub fn cancel_word_choice(&mut self) -> bool {
        self.word_choice.cancel()
    }

    pub fn start_countdown(&mut self, seconds: u32) {
        self.countdown.start(seconds);
    }

    /// Seconds left on the round clock.
    pub fn seconds_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn arm_intermission(&mut self, pause: Duration) {
        self.intermission.arm(pause);
    }

    /// Cancels every timer. Called on every transition that supersedes
    /// the current round.
    pub fn cancel_all(&mut self) {
        self.word_choice.cancel();
        self.countdown.cancel();
        self.intermission.cancel();
    }

    /// `true` if any timer could still fire.
    pub fn has_pending(&self) -> bool {
        self.word_choice.is_armed() || self.countdown.is_running() || self.intermission.is_armed()
    }

    /// Waits for whichever armed timer fires first.
    ///
    /// Pends forever when nothing is armed. Cancel-safe, so it can sit in
    /// a `select!` next to the command channel.
    pub async fn next_event(&mut self) -> TimerEvent {
        tokio::select! {
            () = self.word_choice.expired() => TimerEvent::WordChoiceExpired,
            tick = self.countdown.tick() => TimerEvent::Tick {
                remaining: tick.remaining,
                finished: tick.finished,
            },
            () = self.intermission.expired() => TimerEvent::IntermissionElapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_advance_picks_index_zero() {
        let mut s = TurnScheduler::new();
        assert_eq!(s.drawer_index(), None);
        assert_eq!(s.advance_drawer(3), Some(0));
        assert_eq!(s.advance_drawer(3), Some(1));
        assert_eq!(s.advance_drawer(3), Some(2));
        assert_eq!(s.advance_drawer(3), Some(0), "wraps around");
    }

    #[test]
    fn test_advance_with_no_players() {
        let mut s = TurnScheduler::new();
        s.advance_drawer(2);
        assert_eq!(s.advance_drawer(0), None);
        assert_eq!(s.drawer_index(), None);
    }

    #[test]
    fn test_removal_before_drawer_shifts_index() {
        let mut s = TurnScheduler::new();
        s.drawer_index = Some(2);
        s.on_player_removed(0, 3);
        assert_eq!(s.drawer_index(), Some(1));
    }

    #[test]
    fn test_removal_after_drawer_keeps_index() {
        let mut s = TurnScheduler::new();
        s.drawer_index = Some(1);
        s.on_player_removed(2, 2);
        assert_eq!(s.drawer_index(), Some(1));
    }

    #[test]
    fn test_drawer_removal_hands_turn_to_next_in_slot() {
        // [a, b, c] with b drawing; b leaves → [a, c]; next drawer is c.
        let mut s = TurnScheduler::new();
        s.drawer_index = Some(1);
        s.on_player_removed(1, 2);
        assert_eq!(s.advance_drawer(2), Some(1));
    }

    #[test]
    fn test_last_slot_drawer_removal_wraps_to_front() {
        // [a, b, c] with c drawing; c leaves → [a, b]; next drawer is a.
        let mut s = TurnScheduler::new();
        s.drawer_index = Some(2);
        s.on_player_removed(2, 2);
        assert_eq!(s.drawer_index(), Some(1));
        assert_eq!(s.advance_drawer(2), Some(0));
    }

    #[test]
    fn test_index_stays_in_bounds_after_any_removal() {
        for len in 1..6usize {
            for current in 0..len {
                for removed in 0..len {
                    let mut s = TurnScheduler::new();
                    s.drawer_index = Some(current);
                    s.on_player_removed(removed, len - 1);
                    match s.drawer_index() {
                        Some(i) => assert!(i < len - 1),
                        None => assert_eq!(len - 1, 0),
                    }
                }
            }
        }
    }

    #[test]
    fn test_cancel_all_clears_everything() {
        let mut s = TurnScheduler::new();
        s.arm_word_choice(Duration::from_secs(15));
        s.start_countdown(90);
        s.arm_intermission(Duration::from_secs(3));
        assert!(s.has_pending());

        s.cancel_all();
        assert!(!s.has_pending());
    }
}
