use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::warn;
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use memory_game_core::{Rect, SymbolKey};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Non-card images referenced by the asset manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum SurfaceKey {
    /// Face-down side of every card.
    CardBack,
    /// Full-canvas backdrop.
    Background,
}

/// Audio clips referenced by the asset manifest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum SoundKey {
    Button,
    Flip,
    Win,
    Lose,
    Music,
}

/// Resolved contents of the asset manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AssetManifest {
    pub(crate) cards: Vec<(SymbolKey, PathBuf)>,
    pub(crate) surfaces: Vec<(SurfaceKey, PathBuf)>,
    pub(crate) sounds: Vec<(SoundKey, PathBuf)>,
}

impl AssetManifest {
    /// Reads and resolves the manifest at `path`.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read asset manifest at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        parse_manifest(&contents, &base)
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    version: u32,
    #[serde(default)]
    cards: BTreeMap<String, String>,
    #[serde(default)]
    surfaces: BTreeMap<String, String>,
    #[serde(default)]
    sounds: BTreeMap<String, String>,
}

pub(crate) fn parse_manifest(contents: &str, base_path: &Path) -> Result<AssetManifest> {
    let raw: RawManifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if raw.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            raw.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let cards = raw
        .cards
        .into_iter()
        .map(|(name, relative)| (SymbolKey::new(name), base_path.join(relative)))
        .collect();

    let mut surfaces = Vec::with_capacity(raw.surfaces.len());
    for (name, relative) in raw.surfaces {
        let key = parse_surface_key(&name)
            .with_context(|| format!("unknown surface `{name}` in manifest"))?;
        surfaces.push((key, base_path.join(relative)));
    }
    surfaces.sort();

    let mut sounds = Vec::with_capacity(raw.sounds.len());
    for (name, relative) in raw.sounds {
        let key =
            parse_sound_key(&name).with_context(|| format!("unknown sound `{name}` in manifest"))?;
        sounds.push((key, base_path.join(relative)));
    }
    sounds.sort();

    Ok(AssetManifest {
        cards,
        surfaces,
        sounds,
    })
}

fn parse_surface_key(name: &str) -> Result<SurfaceKey> {
    match name {
        "card_back" => Ok(SurfaceKey::CardBack),
        "background" => Ok(SurfaceKey::Background),
        _ => bail!("unknown surface key `{name}`"),
    }
}

fn parse_sound_key(name: &str) -> Result<SoundKey> {
    match name {
        "button" => Ok(SoundKey::Button),
        "flip" => Ok(SoundKey::Flip),
        "win" => Ok(SoundKey::Win),
        "lose" => Ok(SoundKey::Lose),
        "music" => Ok(SoundKey::Music),
        _ => bail!("unknown sound key `{name}`"),
    }
}

/// Cache of card faces and surfaces loaded from the asset manifest.
///
/// Entries that fail to load are left out; callers draw a placeholder for
/// anything the atlas does not hold.
#[derive(Debug, Default)]
pub(crate) struct CardAtlas {
    cards: HashMap<SymbolKey, Texture2D>,
    surfaces: HashMap<SurfaceKey, Texture2D>,
}

impl CardAtlas {
    /// Loads every image listed in `manifest` from disk.
    pub(crate) fn load(manifest: &AssetManifest) -> Self {
        Self::load_with(manifest, &mut default_loader)
    }

    fn load_with(
        manifest: &AssetManifest,
        loader: &mut impl FnMut(&Path) -> Result<Texture2D>,
    ) -> Self {
        let mut atlas = Self::default();
        for (symbol, path) in &manifest.cards {
            match loader(path) {
                Ok(texture) => {
                    let _ = atlas.cards.insert(symbol.clone(), texture);
                }
                Err(error) => warn!("card `{symbol}` falls back to a placeholder: {error:#}"),
            }
        }
        for (key, path) in &manifest.surfaces {
            match loader(path) {
                Ok(texture) => {
                    let _ = atlas.surfaces.insert(*key, texture);
                }
                Err(error) => warn!("surface {key:?} falls back to a placeholder: {error:#}"),
            }
        }
        atlas
    }

    /// Number of textures held by the atlas.
    pub(crate) fn texture_count(&self) -> usize {
        self.cards.len() + self.surfaces.len()
    }

    /// Draws the face of `symbol` into `area`. Returns `false` when no
    /// texture is available so the caller can draw a placeholder.
    pub(crate) fn draw_card(&self, symbol: &SymbolKey, area: Rect) -> bool {
        let Some(texture) = self.cards.get(symbol) else {
            return false;
        };
        draw_stretched(*texture, area);
        true
    }

    /// Draws `key` into `area`. Returns `false` when the surface is missing.
    pub(crate) fn draw_surface(&self, key: SurfaceKey, area: Rect) -> bool {
        let Some(texture) = self.surfaces.get(&key) else {
            return false;
        };
        draw_stretched(*texture, area);
        true
    }
}

fn draw_stretched(texture: Texture2D, area: Rect) {
    texture::draw_texture_ex(
        texture,
        area.x,
        area.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(area.width, area.height)),
            ..DrawTextureParams::default()
        },
    );
}

fn default_loader(path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read image asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let manifest = r#"
            version = 1

            [cards]
            cat = "cards/cat.png"
            apple = "cards/apple.png"

            [surfaces]
            card_back = "ui/back.png"

            [sounds]
            flip = "sounds/flip.ogg"
            music = "sounds/music.ogg"
        "#;

        let parsed = parse_manifest(manifest, Path::new("root")).expect("manifest should parse");

        assert_eq!(
            parsed.cards,
            vec![
                (SymbolKey::new("apple"), PathBuf::from("root/cards/apple.png")),
                (SymbolKey::new("cat"), PathBuf::from("root/cards/cat.png")),
            ]
        );
        assert_eq!(
            parsed.surfaces,
            vec![(SurfaceKey::CardBack, PathBuf::from("root/ui/back.png"))]
        );
        assert_eq!(
            parsed.sounds,
            vec![
                (SoundKey::Flip, PathBuf::from("root/sounds/flip.ogg")),
                (SoundKey::Music, PathBuf::from("root/sounds/music.ogg")),
            ]
        );
    }

    #[test]
    fn manifest_rejects_unknown_surfaces_and_sounds() {
        let surface = r#"
            version = 1
            [surfaces]
            sky = "sky.png"
        "#;
        let sound = r#"
            version = 1
            [sounds]
            trumpet = "trumpet.ogg"
        "#;

        assert!(parse_manifest(surface, Path::new("assets")).is_err());
        assert!(parse_manifest(sound, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let result = parse_manifest("version = 2", Path::new("assets"));

        assert!(result.is_err(), "only version 1 manifests are supported");
    }

    #[test]
    fn empty_manifest_sections_are_optional() {
        let parsed = parse_manifest("version = 1", Path::new(".")).expect("parse");

        assert_eq!(parsed, AssetManifest::default());
    }

    #[test]
    fn failed_loads_are_skipped_instead_of_aborting() {
        let manifest = AssetManifest {
            cards: vec![
                (SymbolKey::new("cat"), PathBuf::from("cat.png")),
                (SymbolKey::new("dog"), PathBuf::from("missing.png")),
            ],
            surfaces: vec![(SurfaceKey::CardBack, PathBuf::from("back.png"))],
            sounds: Vec::new(),
        };
        let attempts = RefCell::new(Vec::new());

        let atlas = CardAtlas::load_with(&manifest, &mut |path| {
            attempts.borrow_mut().push(path.to_path_buf());
            if path.ends_with("missing.png") {
                Err(anyhow!("not found"))
            } else {
                Ok(Texture2D::empty())
            }
        });

        assert_eq!(attempts.borrow().len(), 3);
        assert_eq!(atlas.texture_count(), 2);
        assert!(atlas.cards.contains_key(&SymbolKey::new("cat")));
        assert!(!atlas.cards.contains_key(&SymbolKey::new("dog")));
    }
}
