//! Random, collision-free layout.

use glyphset_render::text::{FontSource, GlyphRenderer, GlyphStyle};
use glyphset_render::{Canvas, CanvasSize, PixelBox, Point};
use rand::Rng;

use super::collision::sample_free_slot;
use super::{GlyphPlacement, LayoutOutcome, StyleSampler};
use crate::config::ScatteredConfig;
use crate::targets;

/// Smallest left and top offset of a placed box.
const MIN_OFFSET: i32 = 2;

/// A sampled size and position, not yet drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    size: f32,
    origin: Point,
    bbox: PixelBox,
}

/// Scatters glyphs at random sizes and positions.
///
/// Each character gets up to `retry_budget` attempts. An attempt samples a
/// size, measures the glyph, samples a top-left corner inside the legal
/// region and keeps the candidate only if its padded box clears every box
/// placed so far by `spacing_margin`. Characters that run out of attempts
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteredLayout {
    config: ScatteredConfig,
}

impl Default for ScatteredLayout {
    fn default() -> Self {
        Self::new(ScatteredConfig::default())
    }
}

impl ScatteredLayout {
    pub fn new(config: ScatteredConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScatteredConfig {
        &self.config
    }

    fn candidate<R: Rng + ?Sized>(
        &self,
        font: &FontSource,
        ch: char,
        style: GlyphStyle,
        renderer: &GlyphRenderer,
        canvas: CanvasSize,
        rng: &mut R,
    ) -> Option<Candidate> {
        let size = rng.gen_range(self.config.min_size..=self.config.max_size);
        let metrics = font.metrics(ch, size)?;

        // Box extent relative to a pen at the origin.
        let local = renderer.footprint(&metrics, Point::ZERO, style);
        let pad = renderer.padding;
        let (left, top) = (local.left.floor(), local.top.floor());
        let box_w = (local.right.ceil() - left) as i32 + 2 * pad;
        let box_h = (local.bottom.ceil() - top) as i32 + 2 * pad;

        let max_x = canvas.width as i32 - box_w - self.config.edge_margin;
        let max_y = canvas.height as i32 - box_h - self.config.edge_margin;
        if max_x < MIN_OFFSET || max_y < MIN_OFFSET {
            return None;
        }
        let x = rng.gen_range(MIN_OFFSET..=max_x);
        let y = rng.gen_range(MIN_OFFSET..=max_y);
        let origin = Point::new((x + pad) as f32 - left, (y + pad) as f32 - top);

        let ink = renderer.footprint(&metrics, origin, style);
        Some(Candidate {
            size,
            origin,
            bbox: renderer.pixel_box(&ink, canvas),
        })
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
        let size = canvas.size();
        let margin = self.config.spacing_margin;
        let mut taken: Vec<PixelBox> = Vec::with_capacity(text.len());
        let mut outcome = LayoutOutcome::default();

        for &ch in text {
            if font.metrics(ch, self.config.max_size).is_none() {
                tracing::debug!(
                    target: targets::LAYOUT,
                    font = %font.name(),
                    ?ch,
                    "no glyph; dropping character"
                );
                outcome.dropped += 1;
                continue;
            }

            let style = styles.sample(rng);
            let slot = sample_free_slot(
                &taken,
                self.config.retry_budget,
                || self.candidate(font, ch, style, renderer, size, rng),
                |c, b| c.bbox.overlaps(b, margin),
            );
            let Some(candidate) = slot else {
                tracing::debug!(
                    target: targets::LAYOUT,
                    ?ch,
                    budget = self.config.retry_budget,
                    "no free slot; dropping character"
                );
                outcome.dropped += 1;
                continue;
            };

            match renderer.render(canvas, font, ch, candidate.origin, candidate.size, style) {
                Some(bbox) => {
                    debug_assert_eq!(bbox, candidate.bbox);
                    taken.push(bbox);
                    outcome.placements.push(GlyphPlacement {
                        character: ch,
                        size: candidate.size,
                        origin: candidate.origin,
                        style,
                        bbox,
                    });
                }
                None => outcome.dropped += 1,
            }
        }
        outcome
    }
}
