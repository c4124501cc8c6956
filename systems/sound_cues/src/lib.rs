#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating game events into presentation sound cues.
//!
//! Background music plays while the player is in the menu or the level
//! picker. The system tracks whether music is running so that start and stop
//! cues are only emitted on actual changes.

use memory_game_core::{Event, Phase, SoundCue};

/// Sound cue system driven by session and round events.
#[derive(Debug)]
pub struct SoundCues {
    phase: Phase,
    music_playing: bool,
}

impl SoundCues {
    /// Creates a system for a session currently in `phase`.
    #[must_use]
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            music_playing: false,
        }
    }

    /// Emits the cues required for the initial phase.
    pub fn start(&mut self, out: &mut Vec<SoundCue>) {
        self.sync_music(out);
    }

    /// Whether background music is expected to be playing.
    #[must_use]
    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    /// Consumes events and appends the cues they trigger.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<SoundCue>) {
        for event in events {
            match event {
                Event::CardFlipped { .. } => out.push(SoundCue::Flip),
                Event::RoundWon { .. } => out.push(SoundCue::Win),
                Event::RoundLost { .. } => out.push(SoundCue::Lose),
                Event::ClockPaused | Event::ClockResumed | Event::ExitRequested => {
                    out.push(SoundCue::Button);
                }
                Event::PhaseChanged { phase } => {
                    if !matches!(phase, Phase::Won | Phase::Lost) {
                        out.push(SoundCue::Button);
                    }
                    self.phase = *phase;
                    self.sync_music(out);
                }
                Event::PairMatched { .. }
                | Event::PairMismatched { .. }
                | Event::CardsHidden { .. }
                | Event::LevelSelected { .. }
                | Event::RoundStarted { .. } => {}
            }
        }
    }

    fn sync_music(&mut self, out: &mut Vec<SoundCue>) {
        let wanted = matches!(self.phase, Phase::Menu | Phase::LevelSelect);
        if wanted == self.music_playing {
            return;
        }
        self.music_playing = wanted;
        out.push(if wanted {
            SoundCue::MusicStart
        } else {
            SoundCue::MusicStop
        });
    }
}
