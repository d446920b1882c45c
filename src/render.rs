//! Drawing-surface abstraction and the surfaces Glyphfall ships with.

pub mod composite;
pub mod cpu;
pub mod font;
pub mod recording;

/// Opaque RGB8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How a single glyph is drawn.
///
/// Glyphs are always bold sans-serif at `size_px`, positioned with a
/// vertical-middle baseline: the origin's `y` is the vertical center of the em box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphStyle {
    pub size_px: f32,
    pub color: Rgb8,
}

/// The 2D drawing context the animation renders into.
///
/// Drawing is infallible by contract: a surface that cannot honor a call drops it.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Composite `color` at `alpha` over every pixel inside `rect`.
    fn fill_rect(&mut self, rect: kurbo::Rect, color: Rgb8, alpha: f32);

    /// Draw `glyph` with its left edge at `origin.x` and vertical middle at `origin.y`.
    fn fill_glyph(&mut self, glyph: char, origin: kurbo::Point, style: GlyphStyle);

    /// Resize the surface. Like a canvas resize, existing content is discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Called once after every rendered frame.
    fn end_frame(&mut self) {}
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn fill_rect(&mut self, rect: kurbo::Rect, color: Rgb8, alpha: f32) {
        (**self).fill_rect(rect, color, alpha)
    }

    fn fill_glyph(&mut self, glyph: char, origin: kurbo::Point, style: GlyphStyle) {
        (**self).fill_glyph(glyph, origin, style)
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn end_frame(&mut self) {
        (**self).end_frame()
    }
}

/// A captured frame: RGBA8 pixels in row-major order.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}
