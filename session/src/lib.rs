#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-level phase machine for the Memory Game.
//!
//! The session walks the player through the menu, the level picker, rounds
//! and their results. While a round is being played it exclusively owns one
//! [`MatchEngine`]; leaving the playing phase for any reason drops it.

use log::{debug, info, trace};
use memory_game_core::{
    BoardLayout, CatalogError, Command, Event, GridSize, LevelCatalog, LevelId, Phase,
    RoundOutcome, SymbolPool, Timestamp,
};
use memory_game_engine::{self as engine, EngineError, MatchEngine};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Computes the board geometry used for hit-testing a grid.
pub type LayoutFn = fn(GridSize) -> BoardLayout;

/// Failures reported while sequencing the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The requested level is unknown.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A round could not be started.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Game session sequencing menus and rounds.
#[derive(Debug)]
pub struct GameSession {
    catalog: LevelCatalog,
    symbols: SymbolPool,
    layout: LayoutFn,
    phase: Phase,
    selected_level: LevelId,
    engine: Option<MatchEngine>,
    rng: ChaCha8Rng,
    exit_requested: bool,
}

impl GameSession {
    /// Creates a session positioned on the main menu.
    ///
    /// Every round draws its own shuffle seed from a generator seeded with
    /// `seed`, so equal seeds replay equal deals.
    #[must_use]
    pub fn new(catalog: LevelCatalog, symbols: SymbolPool, seed: u64) -> Self {
        Self {
            catalog,
            symbols,
            layout: default_layout,
            phase: Phase::Menu,
            selected_level: LevelId::new(1),
            engine: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            exit_requested: false,
        }
    }

    /// Replaces the geometry used when dealing new boards.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutFn) -> Self {
        self.layout = layout;
        self
    }

    fn enter(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        if phase != Phase::Playing {
            self.engine = None;
        }
        if self.phase == phase {
            return;
        }
        debug!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn start_round(
        &mut self,
        level: LevelId,
        now: Timestamp,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let definition = self.catalog.definition_for(level)?;
        let seed = self.rng.gen::<u64>();
        let mut round_rng = ChaCha8Rng::seed_from_u64(seed);
        let layout = (self.layout)(definition.grid());
        let engine = MatchEngine::start_round(&definition, &self.symbols, &layout, now, &mut round_rng)?;
        debug!("level {level} dealt with seed {seed:#018x}");

        self.selected_level = level;
        self.engine = Some(engine);
        out_events.push(Event::RoundStarted { level });
        self.enter(Phase::Playing, out_events);
        Ok(())
    }

    fn finish_round(&mut self, out_events: &mut Vec<Event>) {
        let outcome = self
            .engine
            .as_ref()
            .map_or(RoundOutcome::InProgress, engine::query::round_outcome);
        match outcome {
            RoundOutcome::InProgress => {}
            RoundOutcome::Won => self.enter(Phase::Won, out_events),
            RoundOutcome::Lost => self.enter(Phase::Lost, out_events),
        }
    }
}

fn default_layout(_grid: GridSize) -> BoardLayout {
    BoardLayout::default()
}

/// Applies the provided command to the session.
///
/// Commands that make no sense in the active phase are ignored. Errors are
/// only reported when a round could not be started.
pub fn apply(
    session: &mut GameSession,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), SessionError> {
    match (session.phase, command) {
        (Phase::Menu, Command::ConfirmPlay) => session.enter(Phase::LevelSelect, out_events),
        (Phase::Menu, Command::ConfirmQuit) => {
            if !session.exit_requested {
                info!("exit requested");
                session.exit_requested = true;
                out_events.push(Event::ExitRequested);
            }
        }
        (Phase::LevelSelect, Command::Back | Command::ConfirmQuit) => {
            session.enter(Phase::Menu, out_events);
        }
        (Phase::LevelSelect, Command::SelectLevel { level, now }) => {
            let _ = session.catalog.definition_for(level)?;
            out_events.push(Event::LevelSelected { level });
            session.start_round(level, now, out_events)?;
        }
        (Phase::Playing, Command::ConfirmQuit) => session.enter(Phase::LevelSelect, out_events),
        (Phase::Playing, command @ Command::Tick { .. }) => {
            if let Some(engine) = session.engine.as_mut() {
                engine::apply(engine, command, out_events);
            }
            session.finish_round(out_events);
        }
        (
            Phase::Playing,
            command @ (Command::FlipAt { .. } | Command::Pause { .. } | Command::Resume { .. }),
        ) => {
            if let Some(engine) = session.engine.as_mut() {
                engine::apply(engine, command, out_events);
            }
        }
        (Phase::Won, Command::NextLevel { now }) => {
            match session.catalog.next_after(session.selected_level) {
                Some(next) => session.start_round(next, now, out_events)?,
                None => session.enter(Phase::LevelSelect, out_events),
            }
        }
        (Phase::Lost, Command::TryAgain { now }) => {
            session.start_round(session.selected_level, now, out_events)?;
        }
        (Phase::Won | Phase::Lost, Command::ConfirmQuit) => session.enter(Phase::Menu, out_events),
        (phase, command) => trace!("{phase:?} ignores {command:?}"),
    }
    Ok(())
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use memory_game_core::{LevelCatalog, LevelId, Phase};
    use memory_game_engine::MatchEngine;

    use super::GameSession;

    /// Phase the session is in.
    #[must_use]
    pub fn phase(session: &GameSession) -> Phase {
        session.phase
    }

    /// Level most recently selected or advanced to.
    #[must_use]
    pub fn selected_level(session: &GameSession) -> LevelId {
        session.selected_level
    }

    /// Round being played, present only while the phase is playing.
    #[must_use]
    pub fn engine(session: &GameSession) -> Option<&MatchEngine> {
        session.engine.as_ref()
    }

    /// Levels the player may choose from.
    #[must_use]
    pub fn catalog(session: &GameSession) -> &LevelCatalog {
        &session.catalog
    }

    /// Whether the player asked to leave the game.
    #[must_use]
    pub fn exit_requested(session: &GameSession) -> bool {
        session.exit_requested
    }
}
