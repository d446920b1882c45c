use rand::Rng;

use crate::{
    foundation::config::SlotMetrics,
    rain::glyph::{GlyphCell, GlyphTone},
    render::Surface,
};

/// Fewest cells a column is built with.
pub const MIN_CELLS: usize = 20;
/// Exclusive upper bound on cells per column.
pub const MAX_CELLS: usize = 60;

/// A vertical run of glyph cells falling through one horizontal slot.
///
/// Cell `i` sits at `y + i * char_size`; the last cell is the leading one.
/// Columns start fully above the surface and are replaced, not reset, once
/// they have fallen past the bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    x: f64,
    y: f64,
    speed: f64,
    cells: Vec<GlyphCell>,
}

impl Column {
    pub fn new<R: Rng + ?Sized>(
        x: f64,
        char_size: f64,
        highlight_lead: bool,
        rng: &mut R,
    ) -> Self {
        let len = rng.random_range(MIN_CELLS..MAX_CELLS);
        let speed = rng.random::<f64>();
        let cells = (0..len)
            .map(|i| {
                let tone = if highlight_lead && i == len - 1 {
                    GlyphTone::Lead
                } else {
                    GlyphTone::Trail
                };
                GlyphCell::new(tone, rng)
            })
            .collect();

        Self {
            x,
            y: -(len as f64 * char_size),
            speed,
            cells,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    /// Top of the column; negative until it scrolls into view.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Fraction of a cell advanced per frame, in `[0, 1)`.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GlyphCell] {
        &self.cells
    }

    pub fn cell_y(&self, index: usize, char_size: f64) -> f64 {
        self.y + index as f64 * char_size
    }

    /// Number of trailing cells currently at or below the top edge.
    pub fn visible_cells(&self, char_size: f64) -> usize {
        (0..self.cells.len())
            .rev()
            .take_while(|&i| self.cell_y(i, char_size) >= 0.0)
            .count()
    }

    /// Draw every cell that has scrolled into view, leading cell first, then
    /// advance by `char_size * speed`. Returns the number of glyphs drawn.
    pub fn render<S, R>(&mut self, surface: &mut S, char_size: f64, rng: &mut R) -> usize
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let size_px = char_size as f32;
        let mut drawn = 0;
        for i in (0..self.cells.len()).rev() {
            let cy = self.y + i as f64 * char_size;
            if cy < 0.0 {
                break;
            }
            let origin = kurbo::Point::new(self.x, cy.floor());
            self.cells[i].render(surface, origin, size_px, rng);
            drawn += 1;
        }
        self.y += char_size * self.speed;
        drawn
    }

    /// True once the column has fallen fully past the bottom edge.
    pub fn is_complete(&self, metrics: &SlotMetrics) -> bool {
        self.y >= metrics.completion_threshold()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rain/column.rs"]
mod tests;
