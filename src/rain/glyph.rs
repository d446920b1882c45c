use rand::Rng;

use crate::render::{GlyphStyle, Rgb8, Surface};

/// First code point of the glyph block (katakana).
pub const GLYPH_FIRST: u32 = 0x30A0;
/// Last code point of the glyph block, inclusive.
pub const GLYPH_LAST: u32 = 0x30FF;
/// A cell swaps its glyph once its mutation accumulator reaches this value.
pub const MUTATION_THRESHOLD: f64 = 1.5;

pub const LEAD_COLOR: Rgb8 = Rgb8::new(165, 255, 165);
pub const TRAIL_COLOR: Rgb8 = Rgb8::new(0, 195, 0);

/// Which of the two palette entries a cell is painted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphTone {
    /// Bright head of a column.
    Lead,
    Trail,
}

impl GlyphTone {
    pub fn color(self) -> Rgb8 {
        match self {
            GlyphTone::Lead => LEAD_COLOR,
            GlyphTone::Trail => TRAIL_COLOR,
        }
    }
}

/// One glyph position inside a [`Column`](crate::Column).
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphCell {
    glyph: char,
    tone: GlyphTone,
    mutation: f64,
}

impl GlyphCell {
    pub fn new<R: Rng + ?Sized>(tone: GlyphTone, rng: &mut R) -> Self {
        Self {
            glyph: random_glyph(rng),
            tone,
            mutation: rng.random::<f64>(),
        }
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn tone(&self) -> GlyphTone {
        self.tone
    }

    /// Mutation accumulator, always in `[0, MUTATION_THRESHOLD)`.
    pub fn mutation(&self) -> f64 {
        self.mutation
    }

    /// Advance the mutation accumulator by a uniform draw in `[0, 1)`.
    ///
    /// Returns `true` when the threshold was crossed and a new glyph was sampled.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.mutation += rng.random::<f64>();
        if self.mutation >= MUTATION_THRESHOLD {
            self.mutation = 0.0;
            self.glyph = random_glyph(rng);
            return true;
        }
        false
    }

    /// Mutate, then draw the current glyph at `origin`.
    pub fn render<S, R>(&mut self, surface: &mut S, origin: kurbo::Point, size_px: f32, rng: &mut R)
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        self.mutate(rng);
        surface.fill_glyph(
            self.glyph,
            origin,
            GlyphStyle {
                size_px,
                color: self.tone.color(),
            },
        );
    }
}

/// Uniform draw from `GLYPH_FIRST..=GLYPH_LAST`.
pub fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    let code = rng.random_range(GLYPH_FIRST..=GLYPH_LAST);
    // The block contains no surrogates, so every draw is a valid char.
    char::from_u32(code).unwrap_or('\u{30A0}')
}

#[cfg(test)]
#[path = "../../tests/unit/rain/glyph.rs"]
mod tests;
