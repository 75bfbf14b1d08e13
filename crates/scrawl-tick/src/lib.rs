//! Round timing primitives for Scrawl.
//!
//! A room needs three clocks: the word-choice deadline, the per-second
//! round countdown, and the pause between rounds. This crate provides the
//! two shapes those take:
//!
//! - [`Timer`]: a one-shot deadline that can be armed and cancelled.
//! - [`Countdown`]: a fixed-period ticker that counts whole seconds down
//!   to zero.
//!
//! # Integration
//!
//! Both sit inside a room actor's `tokio::select!` loop. A disarmed timer
//! pends forever, so its branch simply never wins:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         () = word_choice.expired() => { /* drawer ran out of time */ }
//!         tick = countdown.tick() => { /* broadcast tick.remaining */ }
//!     }
//! }
//! ```
//!
//! Cancelling is just clearing the deadline. A cancelled timer can never
//! fire late, because there is no detached task to forget about.
//!
//! Both futures are cancel-safe: state is only touched after the sleep
//! completes, so losing a `select!` race leaves the timer as it was.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// A one-shot, cancellable deadline.
#[derive(Debug)]
pub struct Timer {
    label: &'static str,
    deadline: Option<Instant>,
}

impl Timer {
    /// Creates a disarmed timer. The label only shows up in logs.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            deadline: None,
        }
    }

    /// Arms the timer to fire `after` from now, replacing any pending
    /// deadline.
    pub fn arm(&mut self, after: Duration) {
        self.deadline = Some(Instant::now() + after);
        debug!(timer = self.label, after_ms = after.as_millis() as u64, "timer armed");
    }

    /// Disarms the timer. Returns `true` if it was armed.
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.deadline.take().is_some();
        if was_armed {
            debug!(timer = self.label, "timer cancelled");
        }
        was_armed
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the deadline, or `None` when disarmed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Resolves once the deadline passes, disarming the timer.
    ///
    /// Pends forever while disarmed.
    pub async fn expired(&mut self) {
        let Some(deadline) = self.deadline else {
            std::future::pending::<()>().await;
            return;
        };
        time::sleep_until(deadline).await;
        self.deadline = None;
        trace!(timer = self.label, "timer fired");
    }
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// One step of a [`Countdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    /// Whole periods left after this step.
    pub remaining: u32,
    /// `true` on the step that reached zero. The countdown stops itself.
    pub finished: bool,
}

/// Counts down a number of fixed periods, yielding once per period.
///
/// Steps are scheduled from the original start, not from when the caller
/// got around to polling, so a busy room doesn't drift.
#[derive(Debug)]
pub struct Countdown {
    period: Duration,
    remaining: u32,
    next_tick: Option<Instant>,
}

impl Countdown {
    /// Creates a stopped countdown with the given step period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            remaining: 0,
            next_tick: None,
        }
    }

    /// A countdown that steps once per second.
    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }

    /// Starts (or restarts) counting down from `periods`.
    ///
    /// Starting from zero leaves the countdown stopped.
    pub fn start(&mut self, periods: u32) {
        self.remaining = periods;
        self.next_tick = (periods > 0).then(|| Instant::now() + self.period);
        debug!(periods, "countdown started");
    }

    /// Stops the countdown. Returns `true` if it was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.next_tick.take().is_some();
        if was_running {
            debug!(remaining = self.remaining, "countdown cancelled");
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Periods left. Stays at its last value after the countdown stops.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Waits for the next step and returns it.
    ///
    /// Pends forever while stopped.
    pub async fn tick(&mut self) -> CountdownTick {
        let Some(next) = self.next_tick else {
            return std::future::pending::<CountdownTick>().await;
        };
        time::sleep_until(next).await;

        self.remaining = self.remaining.saturating_sub(1);
        let finished = self.remaining == 0;
        self.next_tick = if finished {
            None
        } else {
            Some(next + self.period)
        };
        trace!(remaining = self.remaining, finished, "countdown tick");

        CountdownTick {
            remaining: self.remaining,
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_disarmed() {
        let timer = Timer::new("word-choice");
        assert!(!timer.is_armed());
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn test_countdown_start_zero_stays_stopped() {
        let mut countdown = Countdown::per_second();
        countdown.start(0);
        assert!(!countdown.is_running());
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn test_cancel_reports_previous_state() {
        let mut countdown = Countdown::per_second();
        assert!(!countdown.cancel());
        countdown.start(5);
        assert!(countdown.cancel());
        assert!(!countdown.is_running());
        assert_eq!(countdown.remaining(), 5);
    }
}
