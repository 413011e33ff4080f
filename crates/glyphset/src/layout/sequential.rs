//! Single-line layout with even spacing.

use glyphset_render::text::{FontSource, GlyphMetrics, GlyphRenderer};
use glyphset_render::{Canvas, Point};
use rand::Rng;

use super::{GlyphPlacement, LayoutOutcome, StyleSampler};
use crate::targets;

/// Lays glyphs left to right at one size, spreading the remaining width
/// evenly between them and centring each glyph's ink vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialLayout {
    /// Font size in pixels.
    pub size: f32,
    /// Margin before the first glyph and after the last.
    pub edge_padding: f32,
}

impl Default for SequentialLayout {
    fn default() -> Self {
        Self {
            size: 36.0,
            edge_padding: 10.0,
        }
    }
}

impl SequentialLayout {
    /// Gap between consecutive glyphs for the given advances.
    pub fn gap(&self, canvas_width: f32, advances: &[f32]) -> f32 {
        if advances.len() < 2 {
            return 0.0;
        }
        let total: f32 = advances.iter().sum();
        let free = canvas_width - total - 2.0 * self.edge_padding;
        (free / (advances.len() - 1) as f32).floor().max(0.0)
    }

    /// Baseline that centres `metrics`' ink on a canvas of `height`.
    pub fn baseline(height: f32, metrics: &GlyphMetrics) -> f32 {
        (height - metrics.ink.height()) / 2.0 - metrics.ink.top
    }

    pub fn place<R: Rng + ?Sized>(
        &self,
        canvas: &mut Canvas,
        font: &FontSource,
        text: &[char],
        renderer: &GlyphRenderer,
        styles: &StyleSampler,
        rng: &mut R,
    ) -> LayoutOutcome {
        let measured: Vec<(char, GlyphMetrics)> = text
            .iter()
            .filter_map(|&ch| font.metrics(ch, self.size).map(|m| (ch, m)))
            .collect();
        let mut outcome = LayoutOutcome {
            placements: Vec::with_capacity(measured.len()),
            dropped: text.len() - measured.len(),
        };
        if outcome.dropped > 0 {
            tracing::debug!(
                target: targets::LAYOUT,
                font = %font.name(),
                dropped = outcome.dropped,
                "font has no glyph for some characters"
            );
        }

        let advances: Vec<f32> = measured.iter().map(|(_, m)| m.advance).collect();
        let gap = self.gap(canvas.width() as f32, &advances);
        let height = canvas.height() as f32;

        let mut x = self.edge_padding;
        for (ch, metrics) in measured {
            let origin = Point::new(x, Self::baseline(height, &metrics));
            let style = styles.sample(rng);
            match renderer.render(canvas, font, ch, origin, self.size, style) {
                Some(bbox) => outcome.placements.push(GlyphPlacement {
                    character: ch,
                    size: self.size,
                    origin,
                    style,
                    bbox,
                }),
                None => outcome.dropped += 1,
            }
            x += metrics.advance + gap;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glyphset_render::text::SyntheticFace;
    use glyphset_render::{CanvasSize, Color, InkRect};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(CanvasSize::new(150, 50), Color::WHITE).unwrap()
    }

    #[test]
    fn gap_spreads_free_width() {
        let layout = SequentialLayout::default();
        assert_eq!(layout.gap(150.0, &[20.0, 20.0, 20.0]), 35.0);
        assert_eq!(layout.gap(150.0, &[20.0]), 0.0);
        assert_eq!(layout.gap(150.0, &[]), 0.0);
        // Overfull lines never get a negative gap.
        assert_eq!(layout.gap(150.0, &[80.0, 80.0]), 0.0);
    }

    #[test]
    fn baseline_centres_ink() {
        let m = GlyphMetrics {
            advance: 20.0,
            ink: InkRect::new(0.0, -30.0, 18.0, 6.0),
        };
        let y = SequentialLayout::baseline(50.0, &m);
        assert_eq!(y + m.ink.top, 7.0);
        assert_eq!(y + m.ink.bottom, 43.0);
    }

    #[test]
    fn places_left_to_right_in_bounds() {
        let font = FontSource::new("synthetic", Arc::new(SyntheticFace::new()));
        let renderer = GlyphRenderer::default();
        let mut canvas = canvas();
        let mut rng = StdRng::seed_from_u64(3);
        let text: Vec<char> = "A1b".chars().collect();

        let outcome = SequentialLayout::default().place(
            &mut canvas,
            &font,
            &text,
            &renderer,
            &StyleSampler::default(),
            &mut rng,
        );

        assert_eq!(outcome.dropped, 0);
        let chars: Vec<char> = outcome.placements.iter().map(|p| p.character).collect();
        assert_eq!(chars, text);
        for pair in outcome.placements.windows(2) {
            assert!(pair[0].origin.x < pair[1].origin.x);
            assert!(pair[0].bbox.x2 <= pair[1].bbox.x1);
        }
        for p in &outcome.placements {
            assert!(p.bbox.is_within(canvas.size()));
        }
        // Advance 21.6, gap floor((150 - 64.8 - 20) / 2) = 32.
        assert_eq!(outcome.placements[0].origin.x, 10.0);
        assert!((outcome.placements[1].origin.x - 63.6).abs() < 1e-4);
    }

    #[test]
    fn missing_glyphs_are_dropped_before_measuring() {
        let font = FontSource::new("synthetic", Arc::new(SyntheticFace::new().without(['q'])));
        let renderer = GlyphRenderer::default();
        let mut canvas = canvas();
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = SequentialLayout::default().place(
            &mut canvas,
            &font,
            &['a', 'q'],
            &renderer,
            &StyleSampler::default(),
            &mut rng,
        );
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.placements.len(), 1);
        // A single glyph starts at the edge padding.
        assert_eq!(outcome.placements[0].origin.x, 10.0);
    }
}
