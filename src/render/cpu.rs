use crate::{
    foundation::error::{GlyphfallError, GlyphfallResult},
    render::{
        FrameRGBA, GlyphStyle, Rgb8, Surface,
        composite::{fill_span_over, over_in_place, premul},
        font::{GlyphFont, GlyphShaper},
    },
};

/// CPU raster surface backed by a premultiplied RGBA8 `vello_cpu` pixmap.
///
/// The pixmap persists between frames, so translucent fills accumulate into
/// trails. Glyph draws are batched into a transparent layer and composited over
/// the pixmap before the next fill or readback. Without a font, glyphs draw as
/// solid cell-sized blocks.
pub struct PixmapSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    font: Option<(vello_cpu::peniko::FontData, GlyphShaper)>,
    glyph_layer: Option<vello_cpu::RenderContext>,
}

impl PixmapSurface {
    /// New surface cleared to opaque black.
    pub fn new(width: u32, height: u32) -> GlyphfallResult<Self> {
        let (w, h) = surface_dims(width, height)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        clear_pixmap(&mut pixmap, [0, 0, 0, 255]);
        Ok(Self {
            width: w,
            height: h,
            pixmap,
            font: None,
            glyph_layer: None,
        })
    }

    /// Draw glyphs with `font` instead of blocks.
    pub fn with_font(mut self, font: &GlyphFont) -> GlyphfallResult<Self> {
        let shaper = GlyphShaper::new(font)?;
        tracing::debug!(family = shaper.family(), "glyph font ready");
        self.font = Some((font.font_data(), shaper));
        Ok(self)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Current pixels after flushing pending glyph draws.
    ///
    /// Every pixel is opaque, so the premultiplied bytes double as straight RGBA.
    pub fn pixels(&mut self) -> &[u8] {
        self.flush_glyphs();
        self.pixmap.data_as_u8_slice()
    }

    /// Copy out the current pixels, flushing pending glyph draws first.
    pub fn snapshot(&mut self) -> FrameRGBA {
        let data = self.pixels().to_vec();
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
            premultiplied: true,
        }
    }

    fn flush_glyphs(&mut self) {
        let Some(mut ctx) = self.glyph_layer.take() else {
            return;
        };
        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut layer);
        if let Err(e) = over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
            1.0,
        ) {
            tracing::warn!(error = %e, "dropping glyph layer");
        }
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn fill_rect(&mut self, rect: kurbo::Rect, color: Rgb8, alpha: f32) {
        self.flush_glyphs();

        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let x0 = rect.x0.max(0.0).min(w).floor() as u32;
        let y0 = rect.y0.max(0.0).min(h).floor() as u32;
        let x1 = rect.x1.max(0.0).min(w).ceil() as u32;
        let y1 = rect.y1.max(0.0).min(h).ceil() as u32;

        fill_span_over(
            self.pixmap.data_as_u8_slice_mut(),
            u32::from(self.width),
            (x0, y0, x1, y1),
            premul([color.r, color.g, color.b], alpha),
        );
    }

    fn fill_glyph(&mut self, glyph: char, origin: kurbo::Point, style: GlyphStyle) {
        let (w, h) = (self.width, self.height);
        let ctx = self
            .glyph_layer
            .get_or_insert_with(|| vello_cpu::RenderContext::new(w, h));
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            style.color.r,
            style.color.g,
            style.color.b,
            255,
        ));

        match self.font.as_mut() {
            Some((font, shaper)) => {
                let glyphs = shaper.shape(glyph, style.size_px).iter().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: origin.x as f32 + g.dx,
                    y: origin.y as f32 + g.dy,
                });
                ctx.glyph_run(font)
                    .font_size(style.size_px)
                    .fill_glyphs(glyphs);
            }
            None => {
                let half = f64::from(style.size_px) * 0.5;
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    origin.x,
                    origin.y - half,
                    origin.x + f64::from(style.size_px),
                    origin.y + half,
                ));
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (w, h) = match surface_dims(width, height) {
            Ok(dims) => dims,
            Err(e) => {
                tracing::warn!(width, height, error = %e, "clamping surface resize");
                (
                    width.clamp(1, u32::from(u16::MAX)) as u16,
                    height.clamp(1, u32::from(u16::MAX)) as u16,
                )
            }
        };
        self.glyph_layer = None;
        self.width = w;
        self.height = h;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        clear_pixmap(&mut self.pixmap, [0, 0, 0, 255]);
    }

    fn end_frame(&mut self) {
        self.flush_glyphs();
    }
}

fn surface_dims(width: u32, height: u32) -> GlyphfallResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(GlyphfallError::render("surface width/height must be non-zero"));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| GlyphfallError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GlyphfallError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
