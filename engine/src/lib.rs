#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state for the Memory Game.
//!
//! A [`MatchEngine`] owns one dealt board, the round clock and the move
//! budget. It resolves flip requests into pair attempts and decides when the
//! round is won or lost. Adapters drive it through [`apply`] and inspect it
//! through the [`query`] module.

mod board;
mod clock;

use std::time::Duration;

use log::{debug, info, trace};
use memory_game_core::{
    BoardLayout, CardSlot, Command, Event, LevelDefinition, LevelId, Point, RoundOutcome,
    SymbolPool, Timestamp, REVEAL_DELAY,
};
use rand::Rng;
use thiserror::Error;

pub use board::{Board, Card};
pub use clock::RoundClock;

/// Failures reported by the match engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The grid cannot be split into pairs.
    #[error("a {columns}x{rows} grid cannot be filled with pairs")]
    InvalidLevel {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// An action arrived after the round had already ended.
    #[error("round on level {level} already ended")]
    StaleAction {
        /// Level of the finished round.
        level: LevelId,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingMismatch {
    first: CardSlot,
    second: CardSlot,
    hide_at: Timestamp,
}

/// State of a single round.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    level: LevelDefinition,
    board: Board,
    clock: RoundClock,
    moves_remaining: u32,
    pending_pick: Option<CardSlot>,
    pending_mismatch: Option<PendingMismatch>,
    outcome: RoundOutcome,
    last_now: Timestamp,
}

impl MatchEngine {
    /// Deals a new board for `level` and starts the round clock at `now`.
    pub fn start_round<R>(
        level: &LevelDefinition,
        pool: &SymbolPool,
        layout: &BoardLayout,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<Self, EngineError>
    where
        R: Rng + ?Sized,
    {
        let board = Board::generate(level.grid(), pool, layout, rng)?;
        info!(
            "starting level {} with a {}x{} board, {}s and {} moves",
            level.level(),
            level.grid().columns(),
            level.grid().rows(),
            level.time_budget_secs(),
            level.move_budget()
        );
        Ok(Self {
            level: *level,
            board,
            clock: RoundClock::start(now),
            moves_remaining: level.move_budget(),
            pending_pick: None,
            pending_mismatch: None,
            outcome: RoundOutcome::InProgress,
            last_now: now,
        })
    }

    /// Attempts to flip the card under `point`.
    ///
    /// Requests on finished or paused rounds, while a mismatched pair is still
    /// showing, on empty space or on a face-up card are ignored.
    pub fn request_flip(&mut self, point: Point, now: Timestamp, out_events: &mut Vec<Event>) {
        let now = self.observe(now);
        if let Err(error) = self.ensure_active() {
            debug!("dropping flip: {error}");
            return;
        }
        if self.clock.is_paused() {
            trace!("ignoring flip while paused");
            return;
        }
        if self.pending_mismatch.is_some() {
            trace!("ignoring flip while a mismatched pair is showing");
            return;
        }
        let Some(card) = self.board.hit_test(point) else {
            trace!("ignoring flip outside any card");
            return;
        };
        if card.is_flipped() {
            trace!("ignoring flip on face-up card {}", card.slot().get());
            return;
        }

        let slot = card.slot();
        let symbol = card.symbol().clone();
        self.board.flip(slot);
        out_events.push(Event::CardFlipped {
            slot,
            symbol: symbol.clone(),
        });

        match self.pending_pick.take() {
            None => self.pending_pick = Some(slot),
            Some(first) => {
                self.moves_remaining = self.moves_remaining.saturating_sub(1);
                let matches = self
                    .board
                    .card(first)
                    .is_some_and(|card| *card.symbol() == symbol);
                if matches {
                    self.board.mark_matched(first);
                    self.board.mark_matched(slot);
                    debug!("matched `{symbol}` at slots {} and {}", first.get(), slot.get());
                    out_events.push(Event::PairMatched {
                        first,
                        second: slot,
                    });
                } else {
                    self.pending_mismatch = Some(PendingMismatch {
                        first,
                        second: slot,
                        hide_at: now.saturating_add(REVEAL_DELAY),
                    });
                    debug!("mismatch at slots {} and {}", first.get(), slot.get());
                    out_events.push(Event::PairMismatched {
                        first,
                        second: slot,
                    });
                }
            }
        }

        self.evaluate_outcome(now, out_events);
    }

    /// Freezes the round clock and blocks flips.
    pub fn pause(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        let now = self.observe(now);
        if let Err(error) = self.ensure_active() {
            debug!("dropping pause: {error}");
            return;
        }
        if self.clock.pause(now) {
            out_events.push(Event::ClockPaused);
        }
    }

    /// Resumes a paused round clock.
    pub fn resume(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        let now = self.observe(now);
        if let Err(error) = self.ensure_active() {
            debug!("dropping resume: {error}");
            return;
        }
        if self.clock.resume(now) {
            out_events.push(Event::ClockResumed);
        }
    }

    /// Hides an expired mismatched pair and re-evaluates the round outcome.
    pub fn tick(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        let now = self.observe(now);
        if let Some(pending) = self.pending_mismatch {
            if now >= pending.hide_at {
                self.board.hide(pending.first);
                self.board.hide(pending.second);
                self.pending_mismatch = None;
                out_events.push(Event::CardsHidden {
                    first: pending.first,
                    second: pending.second,
                });
            }
        }
        self.evaluate_outcome(now, out_events);
    }

    fn observe(&mut self, now: Timestamp) -> Timestamp {
        self.last_now = self.last_now.max(now);
        self.last_now
    }

    fn ensure_active(&self) -> Result<(), EngineError> {
        if self.outcome.is_terminal() {
            return Err(EngineError::StaleAction {
                level: self.level.level(),
            });
        }
        Ok(())
    }

    fn evaluate_outcome(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        if self.outcome.is_terminal() {
            return;
        }

        let level = self.level.level();
        if self.board.all_matched() {
            self.outcome = RoundOutcome::Won;
            info!("level {level} won with {} moves left", self.moves_remaining);
            out_events.push(Event::RoundWon { level });
        } else if self.time_remaining(now).is_zero() || self.moves_remaining == 0 {
            self.outcome = RoundOutcome::Lost;
            info!(
                "level {level} lost with {} of {} pairs matched",
                self.board.matched_pairs(),
                self.level.grid().pair_count()
            );
            out_events.push(Event::RoundLost { level });
        }
    }

    fn time_remaining(&self, now: Timestamp) -> Duration {
        self.clock.remaining(now, self.level.time_budget())
    }
}

/// Applies the provided command to the round.
///
/// Only flip, pause, resume and tick commands concern a round; navigation
/// commands belong to the session and are ignored here.
pub fn apply(engine: &mut MatchEngine, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::FlipAt { point, now } => engine.request_flip(point, now, out_events),
        Command::Pause { now } => engine.pause(now, out_events),
        Command::Resume { now } => engine.resume(now, out_events),
        Command::Tick { now } => engine.tick(now, out_events),
        other => trace!("round ignores {other:?}"),
    }
}

/// Query functions that provide read-only access to the round state.
pub mod query {
    use std::time::Duration;

    use memory_game_core::{CardSlot, LevelDefinition, RoundOutcome, Timestamp};

    use super::{Board, MatchEngine};

    /// Definition of the level being played.
    #[must_use]
    pub fn level(engine: &MatchEngine) -> &LevelDefinition {
        &engine.level
    }

    /// Provides read-only access to the dealt cards.
    #[must_use]
    pub fn board(engine: &MatchEngine) -> &Board {
        &engine.board
    }

    /// Number of pair attempts still available.
    #[must_use]
    pub fn moves_remaining(engine: &MatchEngine) -> u32 {
        engine.moves_remaining
    }

    /// Time left on the round clock at `now`, never negative.
    #[must_use]
    pub fn time_remaining(engine: &MatchEngine, now: Timestamp) -> Duration {
        engine.time_remaining(engine.last_now.max(now))
    }

    /// Outcome of the round.
    #[must_use]
    pub fn round_outcome(engine: &MatchEngine) -> RoundOutcome {
        engine.outcome
    }

    /// Whether the round clock is paused.
    #[must_use]
    pub fn is_paused(engine: &MatchEngine) -> bool {
        engine.clock.is_paused()
    }

    /// Whether a mismatched pair is still showing and blocks further flips.
    #[must_use]
    pub fn is_input_locked(engine: &MatchEngine) -> bool {
        engine.pending_mismatch.is_some()
    }

    /// Card flipped first in the current pair attempt, if any.
    #[must_use]
    pub fn pending_pick(engine: &MatchEngine) -> Option<CardSlot> {
        engine.pending_pick
    }
}
