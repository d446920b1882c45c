//! Glyph cells and the columns they fall in.

pub mod column;
pub mod glyph;
