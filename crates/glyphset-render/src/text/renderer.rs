//! Glyph rendering with bounding-box extraction.
//!
//! [`GlyphRenderer`] draws a character from a [`FontSource`] and reports the
//! padded ink box that labels are derived from. The box computation is also
//! exposed on its own ([`GlyphRenderer::footprint`], [`GlyphRenderer::pixel_box`])
//! so layout code can test candidate positions before anything is drawn and
//! be sure the rendered box will be identical.

use super::glyph::{FillStyle, FontSource, GlyphMetrics, GlyphPaint, GlyphStyle};
use crate::canvas::Canvas;
use crate::types::{CanvasSize, Color, InkRect, PixelBox, Point};

/// Drawing parameters shared by all glyphs of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphRenderer {
    /// Pixels added around the ink extent on every side.
    pub padding: i32,
    /// Outline thickness for hollow glyphs.
    pub stroke_width: f32,
    /// Offset of the shadow duplicate.
    pub shadow_offset: (f32, f32),
    pub ink: Color,
    pub background: Color,
}

impl Default for GlyphRenderer {
    fn default() -> Self {
        Self {
            padding: 4,
            stroke_width: 2.0,
            shadow_offset: (2.0, 2.0),
            ink: Color::BLACK,
            background: Color::WHITE,
        }
    }
}

impl GlyphRenderer {
    /// Absolute ink extent of a glyph drawn at `pen` with `style`, including
    /// the hollow outline and the shadow.
    pub fn footprint(&self, metrics: &GlyphMetrics, pen: Point, style: GlyphStyle) -> InkRect {
        let mut ink = metrics.ink.translate(pen.x, pen.y);
        if ink.is_empty() {
            // Degenerate ink collapses onto the pen position.
            return InkRect::new(pen.x, pen.y, pen.x, pen.y);
        }
        if style.fill == FillStyle::Hollow {
            ink = ink.outset(self.stroke_width);
        }
        if style.shadowed {
            let (dx, dy) = self.shadow_offset;
            ink = ink.union(&ink.translate(dx, dy));
        }
        ink
    }

    /// Padded, clamped label box for an absolute ink extent.
    pub fn pixel_box(&self, ink: &InkRect, canvas: CanvasSize) -> PixelBox {
        PixelBox::from_ink(ink, self.padding, canvas)
    }

    fn paint(&self, fill: FillStyle) -> GlyphPaint {
        GlyphPaint {
            fill,
            ink: self.ink,
            background: self.background,
            stroke_width: self.stroke_width,
        }
    }

    /// Draw `ch` with its pen origin at `pen` and return its label box.
    ///
    /// Returns `None` without touching the canvas when `font` has no glyph
    /// for `ch`.
    pub fn render(
        &self,
        canvas: &mut Canvas,
        font: &FontSource,
        ch: char,
        pen: Point,
        size: f32,
        style: GlyphStyle,
    ) -> Option<PixelBox> {
        let metrics = font.metrics(ch, size)?;
        let face = font.face();

        if style.shadowed {
            let (dx, dy) = self.shadow_offset;
            face.draw(
                canvas,
                ch,
                pen.offset(dx, dy),
                size,
                &self.paint(FillStyle::Filled),
            );
        }
        if !face.draw(canvas, ch, pen, size, &self.paint(style.fill)) {
            return None;
        }

        let ink = self.footprint(&metrics, pen, style);
        Some(self.pixel_box(&ink, canvas.size()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::text::SyntheticFace;

    fn font() -> FontSource {
        FontSource::new("synthetic", Arc::new(SyntheticFace::new().without(['~'])))
    }

    fn canvas() -> Canvas {
        Canvas::new(CanvasSize::new(150, 50), Color::WHITE).unwrap()
    }

    #[test]
    fn render_reports_padded_ink_box() {
        let renderer = GlyphRenderer::default();
        let mut canvas = canvas();
        // Size 20: ink x 11..21, y 26..40.
        let b = renderer
            .render(&mut canvas, &font(), 'a', Point::new(10.0, 40.0), 20.0, GlyphStyle::FILLED)
            .unwrap();
        assert_eq!(b, PixelBox::new(7, 22, 25, 44));
        assert!(canvas.dark_pixels_in(b, 128) > 100);
    }

    #[test]
    fn hollow_and_shadow_grow_the_box() {
        let renderer = GlyphRenderer::default();
        let mut canvas = canvas();
        let style = GlyphStyle::HOLLOW.with_shadow(true);
        let b = renderer
            .render(&mut canvas, &font(), 'a', Point::new(10.0, 40.0), 20.0, style)
            .unwrap();
        // Outline adds 2, shadow adds 2 to the right and bottom.
        assert_eq!(b, PixelBox::new(5, 20, 29, 48));
    }

    #[test]
    fn box_is_clamped_to_canvas() {
        let renderer = GlyphRenderer::default();
        let mut canvas = canvas();
        let b = renderer
            .render(&mut canvas, &font(), 'a', Point::new(140.0, 60.0), 30.0, GlyphStyle::FILLED)
            .unwrap();
        assert!(b.is_within(canvas.size()));
        assert_eq!(b.x2, 150);
        assert_eq!(b.y2, 50);
    }

    #[test]
    fn empty_ink_yields_padded_box() {
        let renderer = GlyphRenderer::default();
        let mut canvas = canvas();
        let b = renderer
            .render(&mut canvas, &font(), ' ', Point::new(50.0, 30.0), 20.0, GlyphStyle::FILLED)
            .unwrap();
        assert_eq!(b, PixelBox::new(46, 26, 54, 34));
        assert_eq!(canvas.dark_pixels_in(b, 128), 0);
    }

    #[test]
    fn missing_glyph_draws_nothing() {
        let renderer = GlyphRenderer::default();
        let mut canvas = canvas();
        let b = renderer.render(
            &mut canvas,
            &font(),
            '~',
            Point::new(50.0, 30.0),
            20.0,
            GlyphStyle::FILLED.with_shadow(true),
        );
        assert!(b.is_none());
        assert_eq!(canvas.dark_pixels_in(PixelBox::new(0, 0, 150, 50), 128), 0);
    }
}
