#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Memory Game engine.
//!
//! This crate defines the message surface that connects the presentation
//! adapters with the authoritative round state. Adapters translate raw input
//! into [`Command`] values, the engine and session execute those commands via
//! their `apply` entry points, and then report [`Event`] values describing what
//! changed. Adapters never mutate game state directly; they render read-only
//! queries and consume events for audio and visual feedback.

mod layout;
mod levels;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

pub use layout::{slot_rects, BoardLayout};
pub use levels::{
    CatalogError, ConfigError, GameConfig, LevelCatalog, LevelDefinition, SymbolPool,
    STANDARD_SYMBOLS,
};

/// Duration a mismatched pair stays face-up before it is hidden again.
pub const REVEAL_DELAY: Duration = Duration::from_millis(600);

/// Commands that express every action the presentation layer may request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Attempts to flip the card located under the provided board point.
    FlipAt {
        /// Point expressed in the same coordinate space as the board layout.
        point: Point,
        /// Time at which the click was observed.
        now: Timestamp,
    },
    /// Freezes the round clock and blocks card flips.
    Pause {
        /// Time at which the pause was requested.
        now: Timestamp,
    },
    /// Resumes a paused round clock.
    Resume {
        /// Time at which the resume was requested.
        now: Timestamp,
    },
    /// Selects a level from the level-select screen and starts a round.
    SelectLevel {
        /// Level the player picked.
        level: LevelId,
        /// Time at which the round should start.
        now: Timestamp,
    },
    /// Confirms the "play" prompt on the main menu.
    ConfirmPlay,
    /// Confirms a quit request; its target depends on the active phase.
    ConfirmQuit,
    /// Returns from the level-select screen to the main menu.
    Back,
    /// Advances to the next level after a won round.
    NextLevel {
        /// Time at which the next round should start.
        now: Timestamp,
    },
    /// Restarts the current level after a lost round.
    TryAgain {
        /// Time at which the new round should start.
        now: Timestamp,
    },
    /// Advances deferred behaviour (re-hides, timeouts) to the provided time.
    Tick {
        /// Current time reported by the frame loop.
        now: Timestamp,
    },
}

/// Events reported after commands have been processed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A hidden card was turned face-up.
    CardFlipped {
        /// Slot occupied by the flipped card.
        slot: CardSlot,
        /// Symbol printed on the card face.
        symbol: SymbolKey,
    },
    /// Two flipped cards carried the same symbol and are now matched.
    PairMatched {
        /// Slot of the first card of the attempt.
        first: CardSlot,
        /// Slot of the second card of the attempt.
        second: CardSlot,
    },
    /// Two flipped cards carried different symbols and will be hidden again.
    PairMismatched {
        /// Slot of the first card of the attempt.
        first: CardSlot,
        /// Slot of the second card of the attempt.
        second: CardSlot,
    },
    /// A mismatched pair was turned face-down after the reveal delay.
    CardsHidden {
        /// Slot of the first hidden card.
        first: CardSlot,
        /// Slot of the second hidden card.
        second: CardSlot,
    },
    /// The round clock stopped counting.
    ClockPaused,
    /// The round clock resumed counting.
    ClockResumed,
    /// Every pair on the board was matched.
    RoundWon {
        /// Level the round was played on.
        level: LevelId,
    },
    /// Time or moves ran out before every pair was matched.
    RoundLost {
        /// Level the round was played on.
        level: LevelId,
    },
    /// The player picked a level to play.
    LevelSelected {
        /// Level that became selected.
        level: LevelId,
    },
    /// A fresh board was dealt and the round clock started.
    RoundStarted {
        /// Level the round is played on.
        level: LevelId,
    },
    /// The session entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// The player asked to leave the game from the main menu.
    ExitRequested,
}

/// Audio cues the presentation layer may play in response to events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Short click for accepted navigation and pause toggles.
    Button,
    /// A card was turned face-up.
    Flip,
    /// A round was won.
    Win,
    /// A round was lost.
    Lose,
    /// Background music should start looping.
    MusicStart,
    /// Background music should stop.
    MusicStop,
}

/// Top-level phases sequenced by the game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen offering "play" and "quit".
    Menu,
    /// Level picker.
    LevelSelect,
    /// A round is in progress.
    Playing,
    /// The last round ended with every pair matched.
    Won,
    /// The last round ran out of time or moves.
    Lost,
}

/// Outcome of the active round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Cards may still be flipped.
    InProgress,
    /// All pairs were matched.
    Won,
    /// Time or moves ran out first.
    Lost,
}

impl RoundOutcome {
    /// Reports whether the round has reached a terminal outcome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Identity shared by exactly two cards of a pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolKey(String);

impl SymbolKey {
    /// Creates a symbol key from the provided name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One-based level number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier immediately following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a card within the board's row-major slot sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardSlot(u32);

impl CardSlot {
    /// Creates a new slot index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric slot index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Slot index usable for slice access.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Dimensions of a board measured in cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of card columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of card rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of card slots.
    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }

    /// Number of pairs dealt on a board of this size.
    #[must_use]
    pub const fn pair_count(&self) -> u32 {
        self.cell_count() / 2
    }

    /// Reports whether every slot can be filled by exactly one pair member.
    #[must_use]
    pub const fn is_pairable(&self) -> bool {
        self.columns > 0 && self.rows > 0 && self.cell_count() % 2 == 0
    }
}

/// Monotonic time reference measured from an adapter-chosen origin.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// Origin of the time axis.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Creates a timestamp from a duration since the origin.
    #[must_use]
    pub const fn from_duration(since_origin: Duration) -> Self {
        Self(since_origin)
    }

    /// Creates a timestamp from whole milliseconds since the origin.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Creates a timestamp from whole seconds since the origin.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Duration elapsed since the origin.
    #[must_use]
    pub const fn since_origin(&self) -> Duration {
        self.0
    }

    /// Duration elapsed since `earlier`, clamped to zero when time ran backwards.
    #[must_use]
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    /// Timestamp shifted forward by `delta`.
    #[must_use]
    pub fn saturating_add(self, delta: Duration) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

/// Position on the board plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate growing to the right.
    pub x: f32,
    /// Vertical coordinate growing downwards.
    pub y: f32,
}

impl Point {
    /// Origin of the board plane.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle on the board plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the provided size centred on `center`.
    #[must_use]
    pub fn centered_at(center: Point, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width * 0.5,
            center.y - height * 0.5,
            width,
            height,
        )
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Reports whether the point lies inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges are
    /// exclusive so that adjacent rectangles never both claim a point.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}
