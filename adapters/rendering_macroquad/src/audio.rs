//! Sound playback on top of macroquad's audio module.
//!
//! Only compiled with the `audio` feature. Clips that fail to load are
//! skipped, so a partially populated bank simply plays fewer sounds.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::warn;
use macroquad::audio::{self, PlaySoundParams, Sound};
use memory_game_core::SoundCue;

use crate::atlas::SoundKey;

const EFFECT_VOLUME: f32 = 0.8;
const MUSIC_VOLUME: f32 = 0.5;

/// Loaded clips keyed by their manifest entry.
#[derive(Default)]
pub(crate) struct SoundBank {
    clips: HashMap<SoundKey, Sound>,
}

impl SoundBank {
    /// Loads every clip listed in the manifest.
    pub(crate) async fn load(entries: &[(SoundKey, PathBuf)]) -> Self {
        let mut bank = Self::default();
        for (key, path) in entries {
            match load_clip(path).await {
                Ok(sound) => {
                    let _ = bank.clips.insert(*key, sound);
                }
                Err(error) => warn!("sound {key:?} will stay silent: {error:#}"),
            }
        }
        bank
    }

    /// Plays or stops the clip associated with `cue`.
    pub(crate) fn play(&self, cue: SoundCue) {
        let (key, looped, volume) = match cue {
            SoundCue::Button => (SoundKey::Button, false, EFFECT_VOLUME),
            SoundCue::Flip => (SoundKey::Flip, false, EFFECT_VOLUME),
            SoundCue::Win => (SoundKey::Win, false, EFFECT_VOLUME),
            SoundCue::Lose => (SoundKey::Lose, false, EFFECT_VOLUME),
            SoundCue::MusicStart => (SoundKey::Music, true, MUSIC_VOLUME),
            SoundCue::MusicStop => {
                if let Some(music) = self.clips.get(&SoundKey::Music) {
                    audio::stop_sound(*music);
                }
                return;
            }
        };

        if let Some(sound) = self.clips.get(&key) {
            audio::play_sound(*sound, PlaySoundParams { looped, volume });
        }
    }
}

async fn load_clip(path: &Path) -> Result<Sound> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sound asset at {}", path.display()))?;
    audio::load_sound_from_bytes(&bytes)
        .await
        .map_err(|error| anyhow::anyhow!("{error:?}"))
        .with_context(|| format!("failed to decode sound asset at {}", path.display()))
}
