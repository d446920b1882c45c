use std::{collections::HashMap, path::Path, sync::Arc};

use crate::foundation::error::{GlyphfallError, GlyphfallResult};

/// Font used by [`PixmapSurface`](crate::PixmapSurface) to draw glyphs.
#[derive(Clone)]
pub struct GlyphFont {
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl GlyphFont {
    /// Wrap raw font bytes; `index` selects a face inside a collection.
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> GlyphfallResult<Self> {
        if bytes.is_empty() {
            return Err(GlyphfallError::render("font bytes are empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
        })
    }

    pub fn from_file(path: &Path) -> GlyphfallResult<Self> {
        use anyhow::Context as _;
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(bytes, 0)
    }

    /// Pick a bold face from the installed system fonts.
    ///
    /// Faces that cover the katakana block win; otherwise a bold sans face, then
    /// any bold face, is used and missing glyphs draw as the font's placeholder.
    #[tracing::instrument]
    pub fn system_sans_bold() -> GlyphfallResult<Self> {
        let db = system_font_db();
        if let Some(font) = glyph_block_face(&db) {
            return Ok(font);
        }

        let candidates = bold_faces(&db);
        let id = candidates
            .iter()
            .find(|face| face.sans)
            .or_else(|| candidates.first())
            .map(|face| face.id)
            .ok_or_else(|| GlyphfallError::render("no bold system font found"))?;
        tracing::warn!(
            family = db.face(id).and_then(|f| f.families.first()).map(|(n, _)| n.as_str()),
            "no bold system font covers the katakana block"
        );
        face_font(&db, id)
    }

    /// A bold system face whose outlines include the katakana block, if the host has one.
    pub(crate) fn system_glyph_block_face() -> Option<Self> {
        glyph_block_face(&system_font_db())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            self.index,
        )
    }
}

/// Katakana checked to decide whether a face covers the glyph block.
const BLOCK_SAMPLE: [char; 4] = ['\u{30A2}', '\u{30AB}', '\u{30F3}', '\u{30FC}'];

#[derive(Clone, Copy, Debug)]
struct BoldFace {
    id: usvg::fontdb::ID,
    sans: bool,
}

fn system_font_db() -> usvg::fontdb::Database {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded system fonts");
    db
}

/// Upright faces of weight 600 or more, closest to 700 first.
fn bold_faces(db: &usvg::fontdb::Database) -> Vec<BoldFace> {
    let mut faces: Vec<(u16, BoldFace)> = db
        .faces()
        .filter(|f| f.weight.0 >= 600 && f.style == usvg::fontdb::Style::Normal)
        .map(|f| {
            let sans = f.families.iter().any(|(name, _)| {
                let name = name.to_ascii_lowercase();
                name.contains("sans") || name.contains("gothic")
            });
            (f.weight.0.abs_diff(700), BoldFace { id: f.id, sans })
        })
        .collect();
    faces.sort_by_key(|(distance, face)| (*distance, !face.sans));
    faces.into_iter().map(|(_, face)| face).collect()
}

fn glyph_block_face(db: &usvg::fontdb::Database) -> Option<GlyphFont> {
    bold_faces(db).into_iter().find_map(|face| {
        let font = face_font(db, face.id).ok()?;
        let mut shaper = GlyphShaper::new(&font).ok()?;
        BLOCK_SAMPLE
            .iter()
            .all(|&c| shaper.covers(c))
            .then_some(font)
    })
}

fn face_font(db: &usvg::fontdb::Database, id: usvg::fontdb::ID) -> GlyphfallResult<GlyphFont> {
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| GlyphfallError::render("system font face data unavailable"))?;
    GlyphFont::from_bytes(bytes, index)
}

/// Glyph id with its offset from a middle-baseline origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlacedGlyph {
    pub id: u32,
    pub dx: f32,
    pub dy: f32,
}

/// Shapes single characters with Parley and caches the result per size.
pub(crate) struct GlyphShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
    cache: HashMap<(char, u32), Vec<PlacedGlyph>>,
}

impl GlyphShaper {
    pub fn new(font: &GlyphFont) -> GlyphfallResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.as_ref().clone()), None);
        // A collection registers every face; use the family holding the selected one.
        let family_id = families
            .iter()
            .find(|(_, faces)| faces.iter().any(|f| f.index() == font.index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| GlyphfallError::render("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GlyphfallError::render("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            cache: HashMap::new(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Whether the font maps `glyph` to a real outline rather than `.notdef`.
    pub fn covers(&mut self, glyph: char) -> bool {
        let placed = self.shape(glyph, 16.0);
        !placed.is_empty() && placed.iter().all(|g| g.id != 0)
    }

    pub fn shape(&mut self, glyph: char, size_px: f32) -> &[PlacedGlyph] {
        let key = (glyph, size_px.to_bits());
        if !self.cache.contains_key(&key) {
            let placed = self.layout_glyph(glyph, size_px);
            self.cache.insert(key, placed);
        }
        self.cache.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn layout_glyph(&mut self, glyph: char, size_px: f32) -> Vec<PlacedGlyph> {
        let mut buf = [0u8; 4];
        let text: &str = glyph.encode_utf8(&mut buf);

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Named(
                std::borrow::Cow::Owned(self.family.clone()),
            )),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut out = Vec::new();
        for line in layout.lines() {
            let m = line.metrics();
            // Canvas "middle" baseline: halfway between em top and em bottom.
            let middle = m.baseline - (m.ascent - m.descent) * 0.5;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                out.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    dx: g.x,
                    dy: g.y - middle,
                }));
            }
        }
        out
    }
}
