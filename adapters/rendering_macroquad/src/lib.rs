#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the Memory Game.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries. The adapter therefore depends on macroquad without its default
//! `audio` feature and exposes its own `audio` feature that switches sound
//! playback back on. Without it every sound cue is silently dropped.
//!
//! Scenes are laid out on a fixed logical canvas which the backend scales
//! uniformly to fit the window, adding letterbox bars where the aspect ratio
//! differs.

mod atlas;
#[cfg(feature = "audio")]
mod audio;
mod ui;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Result;
use glam::Vec2;
use log::{debug, info, warn};
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
};
use memory_game_core::{Phase, Point, Rect};
use memory_game_rendering::{
    hud_height, ButtonPresentation, CardFace, Color, FeatureSet, FrameInput, FrameOutput,
    HudPresentation, KeyboardActions, Presentation, RenderingBackend, Scene, UiAction,
    CANVAS_HEIGHT, CANVAS_WIDTH,
};

use self::atlas::{AssetManifest, CardAtlas, SurfaceKey};

const MANIFEST_FILE: &str = "manifest.toml";
const LEVEL_KEYS: [(KeyCode, u32); 6] = [
    (KeyCode::Key1, 1),
    (KeyCode::Key2, 2),
    (KeyCode::Key3, 3),
    (KeyCode::Key4, 4),
    (KeyCode::Key5, 5),
    (KeyCode::Key6, 6),
];

const TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const BUTTON_FILL: Color = Color::from_rgb_u8(52, 94, 160);
const CARD_BACK: Color = Color::from_rgb_u8(40, 70, 120);
const CARD_FACE: Color = Color::from_rgb_u8(245, 240, 225);
const CARD_LABEL: Color = Color::from_rgb_u8(40, 40, 40);
const HUD_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 140.0 / 255.0);
const PAUSE_OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 160.0 / 255.0);

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Enter` confirms the primary action of the screen.
    confirm: bool,
    /// `Escape` backs out of the screen.
    back: bool,
    /// `Space` or `P` toggles the pause overlay.
    pause_toggle: bool,
    /// Digits `1` to `6` pick a level.
    level_digit: Option<u32>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let level_digit = LEVEL_KEYS
            .iter()
            .find(|(key, _)| is_key_pressed(*key))
            .map(|(_, digit)| *digit);

        Self {
            confirm: is_key_pressed(KeyCode::Enter),
            back: is_key_pressed(KeyCode::Escape),
            pause_toggle: is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::P),
            level_digit,
        }
    }

    fn actions(self) -> KeyboardActions {
        KeyboardActions {
            confirm: self.confirm,
            back: self.back,
            pause_toggle: self.pause_toggle,
            level_digit: self.level_digit,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    assets_dir: Option<PathBuf>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Directory holding `manifest.toml` and the assets it lists.
    ///
    /// Without one every card, surface and sound falls back to its placeholder.
    #[must_use]
    pub fn with_assets_dir(mut self, assets_dir: Option<PathBuf>) -> Self {
        self.assets_dir = assets_dir;
        self
    }
}

fn sound_enabled(features: FeatureSet) -> bool {
    features.sound && cfg!(feature = "audio")
}

fn load_manifest(assets_dir: Option<&Path>) -> AssetManifest {
    let Some(dir) = assets_dir else {
        info!("no asset directory configured; drawing placeholders");
        return AssetManifest::default();
    };
    match AssetManifest::from_path(&dir.join(MANIFEST_FILE)) {
        Ok(manifest) => manifest,
        Err(error) => {
            warn!("asset manifest unavailable, drawing placeholders: {error:#}");
            AssetManifest::default()
        }
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average frame rate once one
    /// second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutput + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            assets_dir,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            features,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: CANVAS_WIDTH as i32,
            window_height: CANVAS_HEIGHT as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let sound = sound_enabled(features);
        info!("sound {}", if sound { "enabled" } else { "disabled" });

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let manifest = load_manifest(assets_dir.as_deref());
            let atlas = CardAtlas::load(&manifest);
            debug!("loaded {} textures", atlas.texture_count());

            #[cfg(feature = "audio")]
            let sounds = if sound {
                audio::SoundBank::load(&manifest.sounds).await
            } else {
                audio::SoundBank::default()
            };
            #[cfg(not(feature = "audio"))]
            if !manifest.sounds.is_empty() {
                warn!("ignoring sound assets: built without the `audio` feature");
            }

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                let metrics = CanvasMetrics::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(&metrics, keyboard);
                let cursor = frame_input.cursor;

                let output = update_scene(frame_dt, frame_input, &mut scene);

                #[cfg(feature = "audio")]
                for cue in &output.sound_cues {
                    sounds.play(*cue);
                }

                if output.exit {
                    info!("closing window");
                    break;
                }

                macroquad::window::clear_background(background);
                draw_scene(&scene, &metrics, &atlas, cursor);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        info!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and letterbox offset mapping the canvas onto the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CanvasMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl CanvasMetrics {
    fn new(screen_width: f32, screen_height: f32) -> Self {
        let scale = (screen_width / CANVAS_WIDTH)
            .min(screen_height / CANVAS_HEIGHT)
            .max(0.0);
        Self {
            scale,
            offset_x: ((screen_width - CANVAS_WIDTH * scale) * 0.5).max(0.0),
            offset_y: ((screen_height - CANVAS_HEIGHT * scale) * 0.5).max(0.0),
        }
    }

    fn to_screen(&self, area: Rect) -> Rect {
        Rect::new(
            self.offset_x + area.x * self.scale,
            self.offset_y + area.y * self.scale,
            area.width * self.scale,
            area.height * self.scale,
        )
    }

    fn to_canvas(&self, screen: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        let canvas = Vec2::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        );
        let inside = canvas.x >= 0.0
            && canvas.y >= 0.0
            && canvas.x < CANVAS_WIDTH
            && canvas.y < CANVAS_HEIGHT;
        inside.then_some(canvas)
    }

    fn canvas(&self) -> Rect {
        self.to_screen(Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT))
    }
}

fn gather_frame_input(metrics: &CanvasMetrics, keyboard: KeyboardShortcuts) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let click = is_mouse_button_pressed(MouseButton::Left);
    gather_frame_input_from_observations(metrics, Vec2::new(cursor_x, cursor_y), click, keyboard)
}

fn gather_frame_input_from_observations(
    metrics: &CanvasMetrics,
    cursor_position: Vec2,
    click: bool,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let cursor = metrics.to_canvas(cursor_position);
    FrameInput {
        cursor,
        click: click && cursor.is_some(),
        keys: keyboard.actions(),
    }
}

fn draw_scene(scene: &Scene, metrics: &CanvasMetrics, atlas: &CardAtlas, cursor: Option<Vec2>) {
    let canvas = metrics.canvas();
    let _ = atlas.draw_surface(SurfaceKey::Background, canvas);

    match scene.phase {
        Phase::Menu => draw_title("Memory Game", 0.20, metrics),
        Phase::LevelSelect => draw_title("Choose a level", 0.18, metrics),
        Phase::Playing => {
            draw_cards(scene, metrics, atlas);
            if let Some(hud) = scene.hud {
                draw_hud(hud, metrics);
            }
        }
        Phase::Won | Phase::Lost => {
            if let Some(banner) = &scene.banner {
                draw_title(banner, 0.44, metrics);
            }
        }
    }

    let (overlay_buttons, base_buttons): (Vec<_>, Vec<_>) = scene
        .buttons
        .iter()
        .partition(|button| button.action == UiAction::Resume);

    for button in base_buttons {
        draw_button(button, metrics, cursor);
    }
    if scene.paused {
        macroquad::shapes::draw_rectangle(
            canvas.x,
            canvas.y,
            canvas.width,
            canvas.height,
            to_macroquad_color(PAUSE_OVERLAY),
        );
    }
    for button in overlay_buttons {
        draw_button(button, metrics, cursor);
    }
}

fn draw_title(text: &str, height_ratio: f32, metrics: &CanvasMetrics) {
    let canvas = metrics.canvas();
    ui::draw_centered_text(
        text,
        canvas.x + canvas.width * 0.5,
        canvas.y + canvas.height * height_ratio,
        56.0 * metrics.scale,
        to_macroquad_color(TEXT),
    );
}

fn draw_button(button: &ButtonPresentation, metrics: &CanvasMetrics, cursor: Option<Vec2>) {
    let hovered =
        cursor.is_some_and(|cursor| button.area.contains(Point::new(cursor.x, cursor.y)));
    let fill = if hovered {
        BUTTON_FILL.lighten(0.25)
    } else {
        BUTTON_FILL
    };
    ui::draw_button(
        metrics.to_screen(button.area),
        &button.label,
        to_macroquad_color(fill),
        to_macroquad_color(TEXT),
        metrics.scale,
    );
}

fn draw_cards(scene: &Scene, metrics: &CanvasMetrics, atlas: &CardAtlas) {
    for card in &scene.cards {
        let area = metrics.to_screen(card.area);
        match card.face {
            CardFace::Hidden => {
                if !atlas.draw_surface(SurfaceKey::CardBack, area) {
                    ui::draw_card_placeholder(
                        area,
                        None,
                        to_macroquad_color(CARD_BACK),
                        to_macroquad_color(TEXT),
                    );
                }
            }
            CardFace::Revealed | CardFace::Matched => {
                if !atlas.draw_card(&card.symbol, area) {
                    ui::draw_card_placeholder(
                        area,
                        Some(card.symbol.as_str()),
                        to_macroquad_color(CARD_FACE),
                        to_macroquad_color(CARD_LABEL),
                    );
                }
            }
        }
    }
}

fn draw_hud(hud: HudPresentation, metrics: &CanvasMetrics) {
    let bar = metrics.to_screen(Rect::new(0.0, 0.0, CANVAS_WIDTH, hud_height()));
    macroquad::shapes::draw_rectangle(
        bar.x,
        bar.y,
        bar.width,
        bar.height,
        to_macroquad_color(HUD_BACKGROUND),
    );

    let size = 28.0 * metrics.scale;
    let baseline = CANVAS_HEIGHT * 0.04 + 28.0;
    let color = to_macroquad_color(TEXT);
    for (text, x_ratio) in [
        (format!("Level {}", hud.level), 0.16),
        (format!("Time: {}s", hud.seconds_remaining), 0.32),
        (format!("Moves: {}", hud.moves_remaining), 0.50),
    ] {
        let anchor = metrics.to_screen(Rect::new(CANVAS_WIDTH * x_ratio, baseline, 0.0, 0.0));
        macroquad::text::draw_text(&text, anchor.x, anchor.y, size, color);
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
