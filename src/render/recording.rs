use crate::render::{GlyphStyle, Rgb8, Surface};

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    FillRect {
        rect: kurbo::Rect,
        color: Rgb8,
        alpha: f32,
    },
    Glyph {
        glyph: char,
        origin: kurbo::Point,
        style: GlyphStyle,
    },
}

/// In-memory surface that records draw calls grouped by frame.
///
/// Lets the frame loop run without any raster backend.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    current: Vec<DrawCall>,
    frames: Vec<Vec<DrawCall>>,
    resizes: Vec<(u32, u32)>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Completed frames, oldest first.
    pub fn frames(&self) -> &[Vec<DrawCall>] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_frame(&self) -> Option<&[DrawCall]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Every size passed to [`Surface::resize`], in call order.
    pub fn resizes(&self) -> &[(u32, u32)] {
        &self.resizes
    }

    /// Glyph origins drawn in `frame`.
    pub fn glyph_origins(&self, frame: usize) -> Vec<kurbo::Point> {
        self.frames
            .get(frame)
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|c| match c {
                        DrawCall::Glyph { origin, .. } => Some(*origin),
                        DrawCall::FillRect { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.current.clear();
        self.frames.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: kurbo::Rect, color: Rgb8, alpha: f32) {
        self.current.push(DrawCall::FillRect { rect, color, alpha });
    }

    fn fill_glyph(&mut self, glyph: char, origin: kurbo::Point, style: GlyphStyle) {
        self.current.push(DrawCall::Glyph {
            glyph,
            origin,
            style,
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.resizes.push((width, height));
    }

    fn end_frame(&mut self) {
        self.frames.push(std::mem::take(&mut self.current));
    }
}
