#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Memory Game adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use memory_game_core::{
    BoardLayout, CardSlot, GridSize, LevelId, Phase, Point, Rect, SoundCue, SymbolKey,
};
use std::{error::Error, fmt, time::Duration};

/// Width of the logical canvas every scene is laid out on.
pub const CANVAS_WIDTH: f32 = 1280.0;
/// Height of the logical canvas every scene is laid out on.
pub const CANVAS_HEIGHT: f32 = 720.0;
/// Highest number of levels the level picker can display.
pub const MAX_LEVEL_BUTTONS: usize = 6;

const HUD_HEIGHT_RATIO: f32 = 0.12;
const BOTTOM_MARGIN_RATIO: f32 = 0.08;
const BOARD_WIDTH_RATIO: f32 = 0.86;
const CARD_PADDING: f32 = 18.0;
const MIN_CARD_SIZE: f32 = 24.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Optional presentation capabilities chosen at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeatureSet {
    /// Whether sound cues and music are played.
    pub sound: bool,
}

impl FeatureSet {
    /// Every optional feature enabled.
    #[must_use]
    pub const fn full() -> Self {
        Self { sound: true }
    }

    /// Presentation without audio.
    #[must_use]
    pub const fn silent() -> Self {
        Self { sound: false }
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::full()
    }
}

/// Intent attached to an on-screen button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiAction {
    /// Leave the main menu for the level picker.
    Play,
    /// Quit from the active screen.
    Quit,
    /// Pick a level to play.
    SelectLevel(LevelId),
    /// Return from the level picker to the main menu.
    Back,
    /// Freeze the round.
    Pause,
    /// Unfreeze the round.
    Resume,
    /// Start the level after the one just won.
    NextLevel,
    /// Replay the level just lost.
    TryAgain,
}

/// Clickable button placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonPresentation {
    /// Action triggered by the button.
    pub action: UiAction,
    /// Text drawn on the button.
    pub label: String,
    /// Canvas area covered by the button.
    pub area: Rect,
}

impl ButtonPresentation {
    /// Creates a button centred on `center`.
    #[must_use]
    pub fn centered<T>(action: UiAction, label: T, center: Point, size: Vec2) -> Self
    where
        T: Into<String>,
    {
        Self {
            action,
            label: label.into(),
            area: Rect::centered_at(center, size.x, size.y),
        }
    }
}

/// Visible state of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardFace {
    /// Face-down.
    Hidden,
    /// Face-up awaiting resolution.
    Revealed,
    /// Face-up and paired.
    Matched,
}

/// Card drawn on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct CardPresentation {
    /// Slot occupied by the card.
    pub slot: CardSlot,
    /// Symbol printed on the face.
    pub symbol: SymbolKey,
    /// Canvas area covered by the card.
    pub area: Rect,
    /// Which side is visible.
    pub face: CardFace,
}

/// Status bar shown above the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Level being played.
    pub level: LevelId,
    /// Whole seconds left on the round clock.
    pub seconds_remaining: u64,
    /// Pair attempts left.
    pub moves_remaining: u32,
}

/// Scene description for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Screen being displayed.
    pub phase: Phase,
    /// Buttons available on the screen.
    pub buttons: Vec<ButtonPresentation>,
    /// Cards of the active round, empty outside of rounds.
    pub cards: Vec<CardPresentation>,
    /// Status bar of the active round.
    pub hud: Option<HudPresentation>,
    /// Whether the round is frozen behind the pause overlay.
    pub paused: bool,
    /// Headline drawn on result screens.
    pub banner: Option<String>,
}

impl Scene {
    /// Creates an empty scene for `phase`.
    #[must_use]
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            buttons: Vec::new(),
            cards: Vec::new(),
            hud: None,
            paused: false,
            banner: None,
        }
    }

    /// Action of the topmost button under `point`.
    #[must_use]
    pub fn button_at(&self, point: Point) -> Option<UiAction> {
        self.buttons
            .iter()
            .rev()
            .find(|button| button.area.contains(point))
            .map(|button| button.action)
    }
}

/// Keyboard shortcuts observed during a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct KeyboardActions {
    /// Enter was pressed.
    pub confirm: bool,
    /// Escape was pressed.
    pub back: bool,
    /// Space or P was pressed.
    pub pause_toggle: bool,
    /// A digit key selecting a level was pressed.
    pub level_digit: Option<u32>,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in canvas units, absent when outside the canvas.
    pub cursor: Option<Vec2>,
    /// Whether the primary button was pressed on this frame.
    pub click: bool,
    /// Keyboard shortcuts pressed on this frame.
    pub keys: KeyboardActions,
}

impl FrameInput {
    /// Cursor position as a board point, present only on a click.
    #[must_use]
    pub fn click_point(&self) -> Option<Point> {
        if !self.click {
            return None;
        }
        self.cursor.map(|cursor| Point::new(cursor.x, cursor.y))
    }
}

/// Side effects requested by the simulation after a frame update.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameOutput {
    /// Sound cues to play, in order.
    pub sound_cues: Vec<SoundCue>,
    /// Whether the backend should close the window.
    pub exit: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Optional capabilities enabled for this run.
    pub features: FeatureSet,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, features: FeatureSet, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            features,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Memory Game scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, may mutate the scene before it is
    /// rendered, and reports the cues to play and whether to exit.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutput + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The level picker has no room for the configured levels.
    TooManyLevels {
        /// Number of configured levels.
        count: usize,
        /// Number of buttons the picker can hold.
        max: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyLevels { count, max } => {
                write!(
                    f,
                    "the level picker holds at most {max} levels (received {count})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

/// Whole seconds shown on the HUD for the provided remaining time.
///
/// Partial seconds round up so the display only reaches zero when the round
/// clock does.
#[must_use]
pub fn display_seconds(remaining: Duration) -> u64 {
    let whole = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        whole + 1
    } else {
        whole
    }
}

/// Fits square cards of `grid` into the play area below the HUD.
#[must_use]
pub fn fit_board(grid: GridSize) -> BoardLayout {
    let columns = grid.columns().max(1) as f32;
    let rows = grid.rows().max(1) as f32;
    let hud_height = (CANVAS_HEIGHT * HUD_HEIGHT_RATIO).floor();
    let available_width = (CANVAS_WIDTH * BOARD_WIDTH_RATIO).floor();
    let available_height =
        CANVAS_HEIGHT - hud_height - (CANVAS_HEIGHT * BOTTOM_MARGIN_RATIO).floor();

    let card_width = ((available_width - CARD_PADDING * (columns - 1.0)) / columns).floor();
    let card_height = ((available_height - CARD_PADDING * (rows - 1.0)) / rows).floor();
    let card_size = card_width.min(card_height).max(MIN_CARD_SIZE);

    let sized = BoardLayout::new(card_size, CARD_PADDING, Point::ORIGIN);
    let (total_width, total_height) = sized.extent(grid);
    let offset = Point::new(
        ((CANVAS_WIDTH - total_width) / 2.0).floor(),
        ((CANVAS_HEIGHT - total_height) / 2.0).floor() + (hud_height / 2.0).floor(),
    );
    BoardLayout::new(card_size, CARD_PADDING, offset)
}

/// Height of the HUD bar drawn during rounds.
#[must_use]
pub fn hud_height() -> f32 {
    (CANVAS_HEIGHT * HUD_HEIGHT_RATIO).floor()
}

fn canvas_point(x_ratio: f32, y_ratio: f32) -> Point {
    Point::new(CANVAS_WIDTH * x_ratio, CANVAS_HEIGHT * y_ratio)
}

/// Buttons on the main menu.
#[must_use]
pub fn menu_buttons() -> Vec<ButtonPresentation> {
    let size = Vec2::new(240.0, 72.0);
    vec![
        ButtonPresentation::centered(UiAction::Play, "Play", canvas_point(0.5, 0.6), size),
        ButtonPresentation::centered(UiAction::Quit, "Quit", canvas_point(0.5, 0.8), size),
    ]
}

/// Buttons on the level picker, three per row.
pub fn level_buttons(level_count: usize) -> Result<Vec<ButtonPresentation>, RenderingError> {
    if level_count > MAX_LEVEL_BUTTONS {
        return Err(RenderingError::TooManyLevels {
            count: level_count,
            max: MAX_LEVEL_BUTTONS,
        });
    }

    let size = Vec2::new(180.0, 90.0);
    let mut buttons: Vec<ButtonPresentation> = (0..level_count)
        .map(|index| {
            let column = (index % 3) as f32;
            let row = (index / 3) as f32;
            let level = LevelId::new(index as u32 + 1);
            ButtonPresentation::centered(
                UiAction::SelectLevel(level),
                format!("Level {level}"),
                canvas_point(0.3 + 0.2 * column, 0.52 + 0.18 * row),
                size,
            )
        })
        .collect();

    let quit = Vec2::new(160.0, 56.0);
    buttons.push(ButtonPresentation {
        action: UiAction::Back,
        label: "Back".to_owned(),
        area: Rect::new(
            CANVAS_WIDTH - quit.x - 10.0,
            CANVAS_HEIGHT - quit.y - 10.0,
            quit.x,
            quit.y,
        ),
    });
    Ok(buttons)
}

/// Buttons shown during a round.
#[must_use]
pub fn round_buttons(paused: bool) -> Vec<ButtonPresentation> {
    let small = Vec2::new(140.0, 52.0);
    let mut buttons = vec![
        ButtonPresentation::centered(UiAction::Pause, "Pause", canvas_point(0.09, 0.07), small),
        ButtonPresentation {
            action: UiAction::Quit,
            label: "Quit".to_owned(),
            area: Rect::new(
                CANVAS_WIDTH - small.x - 10.0,
                (CANVAS_HEIGHT * 0.01).floor(),
                small.x,
                small.y,
            ),
        },
    ];
    if paused {
        buttons.push(ButtonPresentation::centered(
            UiAction::Resume,
            "Continue",
            canvas_point(0.5, 0.5),
            Vec2::new(260.0, 80.0),
        ));
    }
    buttons
}

/// Buttons shown on the result screens.
#[must_use]
pub fn result_buttons(phase: Phase) -> Vec<ButtonPresentation> {
    let size = Vec2::new(240.0, 72.0);
    let primary = match phase {
        Phase::Won => Some((UiAction::NextLevel, "Next level")),
        Phase::Lost => Some((UiAction::TryAgain, "Try again")),
        Phase::Menu | Phase::LevelSelect | Phase::Playing => None,
    };
    primary
        .into_iter()
        .map(|(action, label)| {
            ButtonPresentation::centered(action, label, canvas_point(0.5, 0.66), size)
        })
        .chain(std::iter::once(ButtonPresentation::centered(
            UiAction::Quit,
            "Quit",
            canvas_point(0.5, 0.78),
            size,
        )))
        .collect()
}
