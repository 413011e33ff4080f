//! A font-file-free face that draws every glyph as a solid block.
//!
//! Metrics are a fixed fraction of the requested size, which makes layout
//! arithmetic predictable. Used for dry runs and to exercise layout code
//! without real fonts.

use resvg::tiny_skia::{PathBuilder, Rect};

use super::glyph::{FillStyle, FontKind, GlyphFace, GlyphMetrics, GlyphPaint};
use crate::canvas::Canvas;
use crate::types::{InkRect, Point};

/// Advance as a fraction of the font size.
pub const BLOCK_ADVANCE: f32 = 0.6;
/// Ink width as a fraction of the font size.
pub const BLOCK_WIDTH: f32 = 0.5;
/// Ink height above the baseline as a fraction of the font size.
pub const BLOCK_HEIGHT: f32 = 0.7;

/// Solid-block glyphs for every character except the ones excluded.
#[derive(Debug, Clone, Default)]
pub struct SyntheticFace {
    missing: Vec<char>,
}

impl SyntheticFace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the face has no glyph for `chars`.
    pub fn without(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.missing.extend(chars);
        self
    }

    fn ink(ch: char, size: f32) -> InkRect {
        if ch.is_whitespace() {
            return InkRect::EMPTY;
        }
        let left = (BLOCK_ADVANCE - BLOCK_WIDTH) / 2.0 * size;
        InkRect::new(left, -BLOCK_HEIGHT * size, left + BLOCK_WIDTH * size, 0.0)
    }
}

impl GlyphFace for SyntheticFace {
    fn kind(&self) -> FontKind {
        FontKind::Outline
    }

    fn metrics(&self, ch: char, size: f32) -> Option<GlyphMetrics> {
        if self.missing.contains(&ch) {
            return None;
        }
        Some(GlyphMetrics {
            advance: BLOCK_ADVANCE * size,
            ink: Self::ink(ch, size),
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
        if self.missing.contains(&ch) {
            return false;
        }
        let ink = Self::ink(ch, size).translate(pen.x, pen.y);
        let Some(rect) = Rect::from_ltrb(ink.left, ink.top, ink.right, ink.bottom) else {
            return true;
        };
        let path = PathBuilder::from_rect(rect);
        match paint.fill {
            FillStyle::Filled => canvas.fill_path(&path, paint.ink),
            FillStyle::Hollow => {
                canvas.stroke_path(&path, paint.ink, paint.stroke_width * 2.0);
                canvas.fill_path(&path, paint.background);
            }
        }
        true
    }
}
