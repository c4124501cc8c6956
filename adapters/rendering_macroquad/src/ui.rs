//! Immediate-mode drawing helpers for buttons, labels and placeholders.
//!
//! Every function here takes screen-space rectangles; converting from canvas
//! units is the caller's job.

use macroquad::{
    color::Color,
    shapes::{draw_circle, draw_rectangle, draw_rectangle_lines},
    text::{draw_text, measure_text},
};
use memory_game_core::Rect;

/// Fills `area` with rounded corners of `radius`.
pub(crate) fn draw_rounded_rect(area: Rect, radius: f32, color: Color) {
    let radius = radius.min(area.width * 0.5).min(area.height * 0.5).max(0.0);
    let Rect {
        x,
        y,
        width,
        height,
    } = area;

    draw_rectangle(x + radius, y, width - 2.0 * radius, height, color);
    draw_rectangle(x, y + radius, width, height - 2.0 * radius, color);
    for (cx, cy) in [
        (x + radius, y + radius),
        (x + width - radius, y + radius),
        (x + radius, y + height - radius),
        (x + width - radius, y + height - radius),
    ] {
        draw_circle(cx, cy, radius, color);
    }
}

/// Draws `text` horizontally centred on `center_x` with its baseline at `baseline_y`.
pub(crate) fn draw_centered_text(text: &str, center_x: f32, baseline_y: f32, size: f32, color: Color) {
    let font_size = size.round().clamp(1.0, f32::from(u16::MAX)) as u16;
    let dimensions = measure_text(text, None, font_size, 1.0);
    draw_text(
        text,
        center_x - dimensions.width * 0.5,
        baseline_y,
        f32::from(font_size),
        color,
    );
}

/// Draws `text` vertically centred inside `area`.
pub(crate) fn draw_label_in(area: Rect, text: &str, size: f32, color: Color) {
    let font_size = size.round().clamp(1.0, f32::from(u16::MAX)) as u16;
    let dimensions = measure_text(text, None, font_size, 1.0);
    let baseline = area.y + (area.height + dimensions.height) * 0.5;
    draw_centered_text(text, area.x + area.width * 0.5, baseline, size, color);
}

/// Draws a labelled button with an outline in the text color.
pub(crate) fn draw_button(area: Rect, label: &str, fill: Color, text: Color, scale: f32) {
    draw_rounded_rect(area, 12.0 * scale, fill);
    draw_rectangle_lines(area.x, area.y, area.width, area.height, 2.0 * scale, text);
    draw_label_in(area, label, 32.0 * scale, text);
}

/// Draws a stand-in for a card whose texture is missing.
pub(crate) fn draw_card_placeholder(area: Rect, label: Option<&str>, fill: Color, text: Color) {
    draw_rounded_rect(area, area.width.min(area.height) * 0.12, fill);
    if let Some(label) = label {
        let size = (area.height * 0.22).max(8.0);
        draw_label_in(area, label, size, text);
    }
}
