//! Visual clutter drawn over a finished layout.
//!
//! Distortions touch pixels only; they never move or relabel glyphs. Each
//! primitive is chosen uniformly from [`Primitive::ALL`]. Line-like
//! primitives run roughly across the canvas at a baseline picked so that
//! successive strokes tend to stay apart.

use glyphset_render::skia::PathBuilder;
use glyphset_render::{Canvas, Color, Point};
use rand::Rng;

/// Minimum vertical separation the baseline picker aims for.
pub const BASELINE_SEPARATION: i32 = 12;
/// Attempts to find a separated baseline before giving up on separation.
pub const BASELINE_ATTEMPTS: usize = 10;

const SQUIGGLE_STEP: usize = 5;

/// A kind of clutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Straight stroke with a slight slope.
    Line,
    /// Smooth stroke through four jittered points.
    Curve,
    /// Zig-zag stroke with a random amplitude.
    Squiggle,
    /// Scattered single pixels.
    Dots,
    /// Small outlined rectangles.
    Rects,
    /// Small filled ellipses.
    Blobs,
    /// One-pixel rule across the full height.
    VerticalRule,
    /// One-pixel rule across the full width.
    HorizontalRule,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Primitive::Line,
        Primitive::Curve,
        Primitive::Squiggle,
        Primitive::Dots,
        Primitive::Rects,
        Primitive::Blobs,
        Primitive::VerticalRule,
        Primitive::HorizontalRule,
    ];

    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Picks stroke baselines that keep apart from earlier ones.
#[derive(Debug, Clone, Default)]
pub struct BaselinePicker {
    used: Vec<i32>,
}

impl BaselinePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A row in `0..height`, separated by more than [`BASELINE_SEPARATION`]
    /// from every earlier pick when one is found within
    /// [`BASELINE_ATTEMPTS`] tries.
    pub fn pick<R: Rng + ?Sized>(&mut self, rng: &mut R, height: u32) -> i32 {
        let h = height.max(1) as i32;
        let separated = (0..BASELINE_ATTEMPTS)
            .map(|_| rng.gen_range(0..h))
            .find(|y| self.used.iter().all(|u| (y - u).abs() > BASELINE_SEPARATION));
        let y = match separated {
            Some(y) => y,
            None => rng.gen_range(0..h),
        };
        self.used.push(y);
        y
    }

    pub fn used(&self) -> &[i32] {
        &self.used
    }
}

/// Draws clutter primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionEngine {
    /// Primitives per sample.
    pub count: usize,
    /// Stroke width of line-like primitives.
    pub line_width: f32,
    pub color: Color,
}

impl Default for DistortionEngine {
    fn default() -> Self {
        Self {
            count: 3,
            line_width: 3.0,
            color: Color::BLACK,
        }
    }
}

impl DistortionEngine {
    pub fn new(count: usize, line_width: f32) -> Self {
        Self {
            count,
            line_width,
            ..Self::default()
        }
    }

    /// Draw `count` random primitives and return their kinds in order.
    pub fn apply<R: Rng + ?Sized>(&self, canvas: &mut Canvas, rng: &mut R) -> Vec<Primitive> {
        let mut baselines = BaselinePicker::new();
        (0..self.count)
            .map(|_| {
                let primitive = Primitive::sample(rng);
                self.draw(canvas, primitive, &mut baselines, rng);
                primitive
            })
            .collect()
    }

    /// Draw one primitive.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        canvas: &mut Canvas,
        primitive: Primitive,
        baselines: &mut BaselinePicker,
        rng: &mut R,
    ) {
        let (w, h) = (canvas.width() as i32, canvas.height() as i32);
        let x_start = rng.gen_range(0..=w / 5);
        let length = rng.gen_range(w * 7 / 10..=w * 9 / 10);
        let x_end = (x_start + length).min(w);
        let y = baselines.pick(rng, canvas.height());
        let color = self.color;

        match primitive {
            Primitive::Line => {
                let points = [
                    point(x_start, y),
                    point(x_end, y + rng.gen_range(-1..=1)),
                ];
                canvas.stroke_polyline(&points, color, self.line_width);
            }
            Primitive::Curve => {
                let p0 = point(x_start, y + rng.gen_range(-2..=2));
                let p1 = point(x_start + length / 3, y + rng.gen_range(-4..=4));
                let p2 = point(x_start + 2 * length / 3, y + rng.gen_range(-4..=4));
                let p3 = point(x_end, y + rng.gen_range(-2..=2));
                // Passes through p0, the p1-p2 midpoint and p3.
                let mut pb = PathBuilder::new();
                pb.move_to(p0.x, p0.y);
                pb.quad_to(p1.x, p1.y, (p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
                pb.quad_to(p2.x, p2.y, p3.x, p3.y);
                if let Some(path) = pb.finish() {
                    canvas.stroke_path(&path, color, self.line_width);
                }
            }
            Primitive::Squiggle => {
                let amplitude = rng.gen_range(3..=6) as f32;
                let points: Vec<Point> = (0..(x_end - x_start).max(0))
                    .step_by(SQUIGGLE_STEP)
                    .map(|t| {
                        let offset = (amplitude * rng.gen_range(-1.0f32..=1.0)).trunc() as i32;
                        point(x_start + t, y + offset)
                    })
                    .collect();
                canvas.stroke_polyline(&points, color, self.line_width);
            }
            Primitive::Dots => {
                for _ in 0..rng.gen_range(5..=15) {
                    let (dx, dy) = (rng.gen_range(0..w), rng.gen_range(0..h));
                    canvas.set_pixel(dx, dy, color);
                }
            }
            Primitive::Rects => {
                for _ in 0..rng.gen_range(1..=3) {
                    let rx = rng.gen_range(0..=(w - 10).max(0)) as f32;
                    let ry = rng.gen_range(0..=(h - 10).max(0)) as f32;
                    let rw = rng.gen_range(3..=10) as f32;
                    let rh = rng.gen_range(3..=10) as f32;
                    // Corners are inclusive, so each side is one pixel longer.
                    canvas.fill_rect(rx, ry, rw + 1.0, 1.0, color);
                    canvas.fill_rect(rx, ry + rh, rw + 1.0, 1.0, color);
                    canvas.fill_rect(rx, ry, 1.0, rh + 1.0, color);
                    canvas.fill_rect(rx + rw, ry, 1.0, rh + 1.0, color);
                }
            }
            Primitive::Blobs => {
                for _ in 0..rng.gen_range(1..=2) {
                    let bx = rng.gen_range(0..=(w - 10).max(0)) as f32;
                    let by = rng.gen_range(0..=(h - 10).max(0)) as f32;
                    let bw = rng.gen_range(6..=12) as f32;
                    let bh = rng.gen_range(6..=12) as f32;
                    canvas.fill_ellipse(bx, by, bw, bh, color);
                }
            }
            Primitive::VerticalRule => {
                let vx = rng.gen_range(0..w) as f32;
                canvas.fill_rect(vx, 0.0, 1.0, h as f32, color);
            }
            Primitive::HorizontalRule => {
                let hy = rng.gen_range(0..h) as f32;
                canvas.fill_rect(0.0, hy, w as f32, 1.0, color);
            }
        }
    }
}

fn point(x: i32, y: i32) -> Point {
    Point::new(x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use glyphset_render::{CanvasSize, PixelBox, luminance};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn blank() -> Canvas {
        Canvas::new(CanvasSize::new(150, 50), Color::WHITE).unwrap()
    }

    fn ink(canvas: &Canvas) -> usize {
        canvas.dark_pixels_in(PixelBox::new(0, 0, 150, 50), 128)
    }

    #[test]
    fn every_primitive_leaves_ink() {
        for (i, primitive) in Primitive::ALL.into_iter().enumerate() {
            let mut canvas = blank();
            let mut rng = StdRng::seed_from_u64(i as u64);
            let mut baselines = BaselinePicker::new();
            DistortionEngine::default().draw(&mut canvas, primitive, &mut baselines, &mut rng);
            assert!(ink(&canvas) > 0, "{primitive:?} drew nothing");
        }
    }

    #[test]
    fn rules_span_the_canvas() {
        let engine = DistortionEngine::default();
        let mut rng = StdRng::seed_from_u64(9);

        let mut canvas = blank();
        engine.draw(&mut canvas, Primitive::VerticalRule, &mut BaselinePicker::new(), &mut rng);
        assert_eq!(ink(&canvas), 50);

        let mut canvas = blank();
        engine.draw(&mut canvas, Primitive::HorizontalRule, &mut BaselinePicker::new(), &mut rng);
        assert_eq!(ink(&canvas), 150);
        let row = (0..50)
            .find(|&y| canvas.pixel(0, y).is_some_and(|c| luminance(c) < 128))
            .unwrap();
        assert!((0..150).all(|x| canvas.pixel(x, row) == Some(Color::BLACK)));
    }

    #[test]
    fn apply_draws_the_configured_count() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut canvas = blank();
        let drawn = DistortionEngine::new(5, 3.0).apply(&mut canvas, &mut rng);
        assert_eq!(drawn.len(), 5);

        let mut canvas = blank();
        assert!(DistortionEngine::new(0, 3.0).apply(&mut canvas, &mut rng).is_empty());
        assert_eq!(ink(&canvas), 0);
    }

    #[test]
    fn primitives_are_chosen_uniformly() {
        let mut rng = StdRng::seed_from_u64(12);
        let seen: HashSet<Primitive> = (0..400).map(|_| Primitive::sample(&mut rng)).collect();
        assert_eq!(seen.len(), Primitive::ALL.len());
    }

    #[test]
    fn baselines_keep_apart_while_room_remains() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut picker = BaselinePicker::new();
        let a = picker.pick(&mut rng, 50);
        let b = picker.pick(&mut rng, 50);
        assert!((0..50).contains(&a) && (0..50).contains(&b));

        // A 10-row canvas has no room for separation; picks still succeed.
        let mut cramped = BaselinePicker::new();
        for _ in 0..5 {
            assert!((0..10).contains(&cramped.pick(&mut rng, 10)));
        }
        assert_eq!(cramped.used().len(), 5);
    }

    #[test]
    fn baselines_are_separated_when_a_free_row_exists() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut picker = BaselinePicker::new();
            for _ in 0..3 {
                picker.pick(&mut rng, 200);
            }
            let used = picker.used();
            for (i, a) in used.iter().enumerate() {
                for b in &used[i + 1..] {
                    assert!((a - b).abs() > BASELINE_SEPARATION, "seed {seed}: {used:?}");
                }
            }
        }
    }

    #[test]
    fn crowded_baselines_fall_back_to_any_row() {
        let mut rng = StdRng::seed_from_u64(5);
        // Every row of a 30-row canvas is within 12 of 0 or 20.
        let mut picker = BaselinePicker {
            used: vec![0, 20],
        };
        let y = picker.pick(&mut rng, 30);
        assert!((0..30).contains(&y));
        assert_eq!(picker.used(), &[0, 20, y]);
    }

    #[test]
    fn same_seed_same_pixels() {
        let engine = DistortionEngine::new(6, 3.0);
        let mut a = blank();
        let mut b = blank();
        engine.apply(&mut a, &mut StdRng::seed_from_u64(77));
        engine.apply(&mut b, &mut StdRng::seed_from_u64(77));
        assert_eq!(a.to_rgb_image(), b.to_rgb_image());
    }
}
