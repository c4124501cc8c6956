use std::time::Duration;

use anyhow::Result;
use log::{debug, warn};
use memory_game_core::{Command, Event, LevelId, Phase, SoundCue, Timestamp};
use memory_game_engine::query as round;
use memory_game_rendering::{
    level_buttons, ButtonPresentation, FrameInput, FrameOutput, KeyboardActions, Scene, UiAction,
};
use memory_game_session::{self as session, query, GameSession};
use memory_game_system_sound_cues::SoundCues;

use crate::scene;

/// Drives the session from frame input and keeps the scene in sync.
#[derive(Debug)]
pub(crate) struct Simulation {
    session: GameSession,
    sound_cues: SoundCues,
    level_buttons: Vec<ButtonPresentation>,
    now: Timestamp,
    events: Vec<Event>,
    pending_cues: Vec<SoundCue>,
}

impl Simulation {
    /// Wraps `session`, failing when the level picker cannot show its catalog.
    pub(crate) fn new(session: GameSession) -> Result<Self> {
        let level_buttons = level_buttons(query::catalog(&session).len())?;
        let mut sound_cues = SoundCues::new(query::phase(&session));
        let mut pending_cues = Vec::new();
        sound_cues.start(&mut pending_cues);

        Ok(Self {
            session,
            sound_cues,
            level_buttons,
            now: Timestamp::ZERO,
            events: Vec::new(),
            pending_cues,
        })
    }

    /// Scene matching the current session state.
    pub(crate) fn initial_scene(&self) -> Scene {
        let mut scene = Scene::new(query::phase(&self.session));
        scene::populate(&mut scene, &self.session, &self.level_buttons, self.now);
        scene
    }

    /// Advances game time by `dt`, applies the input and refreshes `scene`.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) -> FrameOutput {
        self.now = self.now.saturating_add(dt);

        let mut commands = Vec::new();
        if let Some(point) = input.click_point() {
            match scene.button_at(point) {
                Some(action) => commands.extend(self.button_command(action)),
                None if query::phase(&self.session) == Phase::Playing => {
                    commands.push(Command::FlipAt {
                        point,
                        now: self.now,
                    });
                }
                None => {}
            }
        }
        commands.extend(self.key_commands(input.keys));
        commands.push(Command::Tick { now: self.now });

        for command in commands {
            debug!("applying {command:?}");
            if let Err(error) = session::apply(&mut self.session, command, &mut self.events) {
                warn!("command rejected: {error}");
            }
        }

        let mut sound_cues = std::mem::take(&mut self.pending_cues);
        self.sound_cues.handle(&self.events, &mut sound_cues);
        self.events.clear();

        scene::populate(scene, &self.session, &self.level_buttons, self.now);

        FrameOutput {
            sound_cues,
            exit: query::exit_requested(&self.session),
        }
    }

    fn button_command(&self, action: UiAction) -> Option<Command> {
        let now = self.now;
        let command = match action {
            UiAction::Play => Command::ConfirmPlay,
            UiAction::Quit => Command::ConfirmQuit,
            UiAction::SelectLevel(level) => Command::SelectLevel { level, now },
            UiAction::Back => Command::Back,
            UiAction::Pause => return self.pause_toggle(),
            UiAction::Resume => Command::Resume { now },
            UiAction::NextLevel => Command::NextLevel { now },
            UiAction::TryAgain => Command::TryAgain { now },
        };
        Some(command)
    }

    fn key_commands(&self, keys: KeyboardActions) -> Vec<Command> {
        let now = self.now;
        let phase = query::phase(&self.session);
        let mut commands = Vec::new();

        if keys.confirm {
            match phase {
                Phase::Menu => commands.push(Command::ConfirmPlay),
                Phase::Won => commands.push(Command::NextLevel { now }),
                Phase::Lost => commands.push(Command::TryAgain { now }),
                Phase::LevelSelect | Phase::Playing => {}
            }
        }
        if keys.back {
            match phase {
                Phase::LevelSelect => commands.push(Command::Back),
                Phase::Menu | Phase::Playing | Phase::Won | Phase::Lost => {
                    commands.push(Command::ConfirmQuit);
                }
            }
        }
        if keys.pause_toggle {
            commands.extend(self.pause_toggle());
        }
        if let Some(digit) = keys.level_digit {
            let level = LevelId::new(digit);
            if phase == Phase::LevelSelect && query::catalog(&self.session).contains(level) {
                commands.push(Command::SelectLevel { level, now });
            }
        }
        commands
    }

    fn pause_toggle(&self) -> Option<Command> {
        let engine = query::engine(&self.session)?;
        let now = self.now;
        Some(if round::is_paused(engine) {
            Command::Resume { now }
        } else {
            Command::Pause { now }
        })
    }
}
