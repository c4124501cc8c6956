use serde::{Deserialize, Serialize};

use crate::{GridSize, Point, Rect};

/// Geometry used to place card slots on the board plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Edge length of a square card.
    pub card_size: f32,
    /// Gap between neighbouring cards.
    pub padding: f32,
    /// Top-left corner of the first slot.
    pub offset: Point,
}

impl BoardLayout {
    /// Creates a new layout descriptor.
    #[must_use]
    pub const fn new(card_size: f32, padding: f32, offset: Point) -> Self {
        Self {
            card_size,
            padding,
            offset,
        }
    }

    /// Distance between the top-left corners of neighbouring slots.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.card_size + self.padding
    }

    /// Width and height covered by `grid`, excluding outer padding.
    #[must_use]
    pub fn extent(&self, grid: GridSize) -> (f32, f32) {
        let span = |count: u32| {
            if count == 0 {
                0.0
            } else {
                count as f32 * self.card_size + (count - 1) as f32 * self.padding
            }
        };
        (span(grid.columns()), span(grid.rows()))
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(100.0, 18.0, Point::ORIGIN)
    }
}

/// Computes the rectangle of every slot in row-major order.
#[must_use]
pub fn slot_rects(grid: GridSize, layout: &BoardLayout) -> Vec<Rect> {
    let pitch = layout.pitch();
    let mut rects = Vec::with_capacity(grid.cell_count() as usize);
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            rects.push(Rect::new(
                layout.offset.x + column as f32 * pitch,
                layout.offset.y + row as f32 * pitch,
                layout.card_size,
                layout.card_size,
            ));
        }
    }
    rects
}
