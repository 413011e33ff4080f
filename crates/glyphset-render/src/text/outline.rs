//! Outline font faces.
//!
//! Glyph outlines are extracted with `ttf-parser` from font data held in a
//! shared `fontdb` database, converted once into tiny-skia paths in font
//! units, and cached per character. Drawing scales and flips the cached
//! path into canvas space.

use std::collections::HashMap;
use std::sync::Arc;

use fontdb::ID as FontFaceId;
use parking_lot::RwLock;
use resvg::tiny_skia::{Path, PathBuilder, Transform};

use super::glyph::{FillStyle, FontKind, GlyphFace, GlyphMetrics, GlyphPaint};
use crate::canvas::Canvas;
use crate::error::FontLoadError;
use crate::types::{InkRect, Point};

/// One glyph in font units (y up).
#[derive(Debug)]
struct OutlineGlyph {
    path: Option<Path>,
    advance: f32,
    bbox: Option<InkRect>,
}

/// Adapts `ttf_parser::OutlineBuilder` callbacks onto a tiny-skia path.
pub(crate) struct SkiaOutline(pub(crate) PathBuilder);

impl ttf_parser::OutlineBuilder for SkiaOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

/// A single face of an outline font file.
pub struct OutlineFace {
    db: Arc<fontdb::Database>,
    face_id: FontFaceId,
    units_per_em: f32,
    glyphs: RwLock<HashMap<char, Option<Arc<OutlineGlyph>>>>,
}

impl OutlineFace {
    /// Bind a face that has already been loaded into `db`.
    pub fn new(db: Arc<fontdb::Database>, face_id: FontFaceId) -> Result<Self, FontLoadError> {
        let units_per_em = db
            .with_face_data(face_id, |data, index| {
                ttf_parser::Face::parse(data, index)
                    .map(|face| face.units_per_em())
                    .map_err(|e| FontLoadError::InvalidFormat(e.to_string()))
            })
            .ok_or_else(|| FontLoadError::InvalidFormat("face data unavailable".into()))??;

        Ok(Self {
            db,
            face_id,
            units_per_em: units_per_em.max(1) as f32,
            glyphs: RwLock::new(HashMap::new()),
        })
    }

    fn glyph(&self, ch: char) -> Option<Arc<OutlineGlyph>> {
        if let Some(cached) = self.glyphs.read().get(&ch) {
            return cached.clone();
        }
        let loaded = self.load_glyph(ch).map(Arc::new);
        self.glyphs.write().insert(ch, loaded.clone());
        loaded
    }

    fn load_glyph(&self, ch: char) -> Option<OutlineGlyph> {
        self.db
            .with_face_data(self.face_id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let glyph_id = face.glyph_index(ch)?;
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0) as f32;

                let mut outline = SkiaOutline(PathBuilder::new());
                let bbox = face.outline_glyph(glyph_id, &mut outline).map(|r| {
                    InkRect::new(
                        r.x_min as f32,
                        r.y_min as f32,
                        r.x_max as f32,
                        r.y_max as f32,
                    )
                });

                Some(OutlineGlyph {
                    path: outline.0.finish(),
                    advance,
                    bbox,
                })
            })
            .flatten()
    }

    fn scale(&self, size: f32) -> f32 {
        size / self.units_per_em
    }
}

impl GlyphFace for OutlineFace {
    fn kind(&self) -> FontKind {
        FontKind::Outline
    }

    fn metrics(&self, ch: char, size: f32) -> Option<GlyphMetrics> {
        let glyph = self.glyph(ch)?;
        let s = self.scale(size);
        // Font units are y-up; flip into canvas space.
        let ink = glyph
            .bbox
            .map(|b| InkRect::new(b.left * s, -b.bottom * s, b.right * s, -b.top * s))
            .unwrap_or(InkRect::EMPTY);
        Some(GlyphMetrics {
            advance: glyph.advance * s,
            ink,
        })
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        ch: char,
        pen: Point,
        size: f32,
        paint: &GlyphPaint,
    ) -> bool {
        let Some(glyph) = self.glyph(ch) else {
            return false;
        };
        let Some(path) = glyph.path.clone() else {
            // No contours (e.g. space): nothing to paint.
            return true;
        };
        let s = self.scale(size);
        let Some(path) = path.transform(Transform::from_row(s, 0.0, 0.0, -s, pen.x, pen.y)) else {
            return true;
        };

        match paint.fill {
            FillStyle::Filled => canvas.fill_path(&path, paint.ink),
            FillStyle::Hollow => {
                // The stroke is centred on the edge; double it so the outline
                // reaches `stroke_width` beyond the glyph body.
                canvas.stroke_path(&path, paint.ink, paint.stroke_width * 2.0);
                canvas.fill_path(&path, paint.background);
            }
        }
        true
    }
}

impl std::fmt::Debug for OutlineFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFace")
            .field("face_id", &self.face_id)
            .field("units_per_em", &self.units_per_em)
            .field("cached_glyphs", &self.glyphs.read().len())
            .finish()
    }
}
