//! Glyph layout: where each character of a sample goes.
//!
//! Two strategies are available. [`SequentialLayout`] sets a single evenly
//! spaced line at a fixed size; [`ScatteredLayout`] samples sizes and
//! positions at random and rejects candidates that would collide with glyphs
//! already placed. Both draw through one [`GlyphRenderer`], so the box a
//! placement records is exactly the box the renderer reported.

mod collision;
mod scattered;
mod sequential;

use glyphset_render::text::{FillStyle, FontSource, GlyphRenderer, GlyphStyle};
use glyphset_render::{Canvas, PixelBox, Point};
use rand::Rng;

use crate::config::{GeneratorConfig, GlyphConfig, LayoutMode};

pub use collision::sample_free_slot;
pub use scattered::ScatteredLayout;
pub use sequential::SequentialLayout;

/// One glyph drawn onto a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub character: char,
    /// Font size in pixels.
    pub size: f32,
    /// Pen origin on the baseline.
    pub origin: Point,
    pub style: GlyphStyle,
    /// Padded, canvas-clamped ink box.
    pub bbox: PixelBox,
}

/// Result of laying out one sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOutcome {
    /// Placed glyphs in placement order.
    pub placements: Vec<GlyphPlacement>,
    /// Requested characters that were not drawn.
    pub dropped: usize,
}

/// Picks a rendering style per glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSampler {
    pub hollow_probability: f64,
    pub shadow_probability: f64,
}

impl Default for StyleSampler {
    fn default() -> Self {
        Self {
            hollow_probability: 0.5,
            shadow_probability: 0.0,
        }
    }
}

impl StyleSampler {
    pub fn from_config(glyph: &GlyphConfig) -> Self {
        Self {
            hollow_probability: glyph.hollow_probability,
            shadow_probability: glyph.shadow_probability,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GlyphStyle {
        let fill = if rng.gen_bool(self.hollow_probability) {
            FillStyle::Hollow
        } else {
            FillStyle::Filled
        };
        GlyphStyle {
            fill,
            shadowed: rng.gen_bool(self.shadow_probability),
        }
    }
}

/// Layout strategy selected for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    Sequential(SequentialLayout),
    Scattered(ScatteredLayout),
}

/// Places the characters of a sample onto its canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    renderer: GlyphRenderer,
    styles: StyleSampler,
    strategy: Strategy,
}

impl LayoutEngine {
    pub fn new(renderer: GlyphRenderer, styles: StyleSampler, strategy: Strategy) -> Self {
        Self {
            renderer,
            styles,
            strategy,
        }
    }

    /// Build the engine described by a generator configuration.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let renderer = GlyphRenderer {
            padding: config.glyph.padding,
            stroke_width: config.glyph.stroke_width,
            ..GlyphRenderer::default()
        };
        let strategy = match config.layout.mode {
            LayoutMode::Sequential => Strategy::Sequential(SequentialLayout {
                size: config.glyph.size,
                edge_padding: config.layout.sequential.edge_padding,
            }),
            LayoutMode::Scattered => Strategy::Scattered(ScatteredLayout::new(config.layout.scattered)),
        };
        Self::new(renderer, StyleSampler::from_config(&config.glyph), strategy)
    }

    pub fn renderer(&self) -> &GlyphRenderer {
        &self.renderer
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Draw `text` with `font` and report what was placed.
    pub fn place<R: Rng + ?Sized>(
        &self,
        canvas: &mut Canvas,
        font: &FontSource,
        text: &[char],
        rng: &mut R,
    ) -> LayoutOutcome {
        match &self.strategy {
            Strategy::Sequential(layout) => {
                layout.place(canvas, font, text, &self.renderer, &self.styles, rng)
            }
            Strategy::Scattered(layout) => {
                layout.place(canvas, font, text, &self.renderer, &self.styles, rng)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn style_sampler_respects_probabilities() {
        let mut rng = StdRng::seed_from_u64(1);
        let never = StyleSampler {
            hollow_probability: 0.0,
            shadow_probability: 0.0,
        };
        assert!((0..50).all(|_| never.sample(&mut rng) == GlyphStyle::FILLED));

        let always = StyleSampler {
            hollow_probability: 1.0,
            shadow_probability: 1.0,
        };
        let style = always.sample(&mut rng);
        assert_eq!(style.fill, FillStyle::Hollow);
        assert!(style.shadowed);

        let coin = StyleSampler::default();
        let hollow = (0..400)
            .filter(|_| coin.sample(&mut rng).fill == FillStyle::Hollow)
            .count();
        assert!((120..280).contains(&hollow), "{hollow}");
    }

    #[test]
    fn engine_follows_configured_mode() {
        let mut config = GeneratorConfig::default();
        config.glyph.padding = 6;
        let engine = LayoutEngine::from_config(&config);
        assert_eq!(engine.renderer().padding, 6);
        assert!(matches!(engine.strategy(), Strategy::Sequential(s) if s.size == 36.0));

        config.layout.mode = LayoutMode::Scattered;
        let engine = LayoutEngine::from_config(&config);
        assert!(matches!(engine.strategy(), Strategy::Scattered(_)));
    }
}
