use std::time::Duration;

use memory_game_core::Timestamp;

/// Round timer that excludes paused intervals from elapsed time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundClock {
    start: Timestamp,
    accumulated_pause: Duration,
    paused_since: Option<Timestamp>,
}

impl RoundClock {
    /// Starts a clock counting from `now`.
    #[must_use]
    pub const fn start(now: Timestamp) -> Self {
        Self {
            start: now,
            accumulated_pause: Duration::ZERO,
            paused_since: None,
        }
    }

    /// Freezes elapsed time. Returns `false` if the clock was already paused.
    pub fn pause(&mut self, now: Timestamp) -> bool {
        if self.paused_since.is_some() {
            return false;
        }
        self.paused_since = Some(now);
        true
    }

    /// Folds the paused interval into the accumulated pause and resumes
    /// counting. Returns `false` if the clock was not paused.
    pub fn resume(&mut self, now: Timestamp) -> bool {
        let Some(since) = self.paused_since.take() else {
            return false;
        };
        self.accumulated_pause = self
            .accumulated_pause
            .saturating_add(now.saturating_since(since));
        true
    }

    /// Reports whether the clock is currently paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Total time spent paused in completed pause intervals.
    #[must_use]
    pub const fn accumulated_pause(&self) -> Duration {
        self.accumulated_pause
    }

    /// Running time since the start, excluding every paused interval.
    #[must_use]
    pub fn elapsed(&self, now: Timestamp) -> Duration {
        let end = match self.paused_since {
            Some(since) => since.min(now),
            None => now,
        };
        end.saturating_since(self.start)
            .saturating_sub(self.accumulated_pause)
    }

    /// Time left of `budget`, never negative.
    #[must_use]
    pub fn remaining(&self, now: Timestamp, budget: Duration) -> Duration {
        budget.saturating_sub(self.elapsed(now))
    }
}
