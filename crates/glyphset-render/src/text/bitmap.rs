//! Bitmap glyph sets.
//!
//! A bitmap glyph set is a directory holding one image per character, named
//! `<character>.<ext>` (for example `a.png`, `7.jpg`). Images are treated as
//! dark ink on a light background and converted to grayscale on load. At
//! draw time a glyph is scaled so its image height equals the requested
//! size; the bottom edge of the image is the baseline.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::GrayImage;
use image::imageops::{self, FilterType};
use parking_lot::RwLock;

use super::glyph::{FillStyle, FontKind, GlyphFace, GlyphMetrics, GlyphPaint};
use crate::canvas::Canvas;
use crate::error::{RenderError, RenderResult};
use crate::types::{InkRect, Point};

/// Image file extensions recognized as glyph images (lower case).
pub const GLYPH_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Luminance below which a pixel counts as ink.
const INK_THRESHOLD: u8 = 128;

/// Scaled coverage mask of one glyph at one pixel height.
#[derive(Debug)]
struct ScaledGlyph {
    /// Coverage: 255 where the source image is black.
    coverage: GrayImage,
    ink: Option<(u32, u32, u32, u32)>,
}

/// A directory of per-character glyph images.
pub struct BitmapGlyphSet {
    dir: PathBuf,
    glyphs: HashMap<char, GrayImage>,
    scaled: RwLock<HashMap<(char, u32), Arc<ScaledGlyph>>>,
}

impl BitmapGlyphSet {
    /// Build a set from already decoded images.
    pub fn from_glyphs(dir: impl Into<PathBuf>, glyphs: HashMap<char, GrayImage>) -> Self {
        Self {
            dir: dir.into(),
            glyphs,
            scaled: RwLock::new(HashMap::new()),
        }
    }

    /// Load every `<character>.<ext>` image in `dir`.
    ///
    /// Images that fail to decode are skipped with a warning. Returns
    /// `Ok(None)` when no image for a character accepted by `recognizes`
    /// was found, i.e. the directory is not a usable glyph set.
    pub fn load(dir: impl AsRef<Path>, recognizes: fn(char) -> bool) -> RenderResult<Option<Self>> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| RenderError::io(e, dir))?;

        let mut glyphs = HashMap::new();
        for entry in entries {
            let path = entry.map_err(|e| RenderError::io(e, dir))?.path();
            let Some(ch) = glyph_char(&path) else {
                continue;
            };
            match image::open(&path) {
                Ok(img) => {
                    glyphs.insert(ch, img.to_luma8());
                }
                Err(e) => {
                    tracing::warn!(
                        target: "glyphset_render::bitmap",
                        "skipping unreadable glyph image {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }

        if !glyphs.keys().any(|&c| recognizes(c)) {
            return Ok(None);
        }
        Ok(Some(Self::from_glyphs(dir, glyphs)))
    }

    /// The directory this set was loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Characters with a glyph image, in sorted order.
    pub fn characters(&self) -> Vec<char> {
        let mut chars: Vec<char> = self.glyphs.keys().copied().collect();
        chars.sort_unstable();
        chars
    }

    fn scaled(&self, ch: char, size: f32) -> Option<Arc<ScaledGlyph>> {
        let height = size.round().max(1.0) as u32;
        if let Some(hit) = self.scaled.read().get(&(ch, height)) {
            return Some(Arc::clone(hit));
        }

        let source = self.glyphs.get(&ch)?;
        let (sw, sh) = source.dimensions();
        if sw == 0 || sh == 0 {
            return None;
        }
        let width = ((sw as f32 * height as f32 / sh as f32).round() as u32).max(1);
        let mut coverage = imageops::resize(source, width, height, FilterType::Triangle);
        imageops::invert(&mut coverage);

        let glyph = Arc::new(ScaledGlyph {
            ink: ink_bounds(&coverage),
            coverage,
        });
        self.scaled.write().insert((ch, height), Arc::clone(&glyph));
        Some(glyph)
    }
}

/// Parse `<character>.<ext>` file names.
fn glyph_char(path: &Path) -> Option<char> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !GLYPH_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let mut stem = path.file_stem()?.to_str()?.chars();
    match (stem.next(), stem.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Bounds `(x_min, y_min, x_max, y_max)` (inclusive) of ink pixels.
fn ink_bounds(coverage: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let min_coverage = 255 - INK_THRESHOLD;
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in coverage.enumerate_pixels() {
        if p.0[0] <= min_coverage {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

/// Grow coverage by `radius` pixels (square structuring element).
fn dilate(coverage: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return coverage.clone();
    }
    let (w, h) = coverage.dimensions();
    let r = radius as i64;
    let mut out = GrayImage::new(w + 2 * radius, h + 2 * radius);
    for (ox, oy, px) in out.enumerate_pixels_mut() {
        let cx = ox as i64 - r;
        let cy = oy as i64 - r;
        let mut best = 0u8;
        for y in (cy - r).max(0)..=(cy + r).min(h as i64 - 1) {
            for x in (cx - r).max(0)..=(cx + r).min(w as i64 - 1) {
                best = best.max(coverage.get_pixel(x as u32, y as u32).0[0]);
            }
        }
        px.0[0] = best;
    }
    out
}

impl GlyphFace for BitmapGlyphSet {
    fn kind(&self) -> FontKind {
        FontKind::BitmapSet
    }

    fn metrics(&self, ch: char, size: f32) -> Option<GlyphMetrics> {
        let glyph = self.scaled(ch, size)?;
        let (w, h) = glyph.coverage.dimensions();
        let ink = glyph
            .ink
            .map(|(x0, y0, x1, y1)| {
                InkRect::new(
                    x0 as f32,
                    y0 as f32 - h as f32,
                    (x1 + 1) as f32,
                    (y1 + 1) as f32 - h as f32,
                )
            })
            .unwrap_or(InkRect::EMPTY);
        Some(GlyphMetrics {
            advance: w as f32,
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
        let Some(glyph) = self.scaled(ch, size) else {
            return false;
        };
        let h = glyph.coverage.height() as i32;
        let x = pen.x.round() as i32;
        let y = pen.y.round() as i32 - h;

        match paint.fill {
            FillStyle::Filled => canvas.blend_coverage(&glyph.coverage, x, y, paint.ink),
            FillStyle::Hollow => {
                let r = paint.stroke_width.round().max(0.0) as u32;
                let outline = dilate(&glyph.coverage, r);
                canvas.blend_coverage(&outline, x - r as i32, y - r as i32, paint.ink);
                canvas.blend_coverage(&glyph.coverage, x, y, paint.background);
            }
        }
        true
    }
}

impl std::fmt::Debug for BitmapGlyphSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapGlyphSet")
            .field("dir", &self.dir)
            .field("glyphs", &self.glyphs.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanvasSize, Color, PixelBox};

    /// 10x20 white image with a black 4x10 bar at (3, 8).
    fn bar_image() -> GrayImage {
        GrayImage::from_fn(10, 20, |x, y| {
            if (3..7).contains(&x) && (8..18).contains(&y) {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        })
    }

    fn set() -> BitmapGlyphSet {
        let mut glyphs = HashMap::new();
        glyphs.insert('a', bar_image());
        BitmapGlyphSet::from_glyphs("mem", glyphs)
    }

    fn ascii_alnum(c: char) -> bool {
        c.is_ascii_alphanumeric()
    }

    #[test]
    fn metrics_at_native_size() {
        let m = set().metrics('a', 20.0).unwrap();
        assert_eq!(m.advance, 10.0);
        assert_eq!(m.ink, InkRect::new(3.0, -12.0, 7.0, -2.0));
        assert!(set().metrics('b', 20.0).is_none());
    }

    #[test]
    fn metrics_scale_with_size() {
        let m = set().metrics('a', 40.0).unwrap();
        assert_eq!(m.advance, 20.0);
        assert!(m.ink.height() > 15.0 && m.ink.height() < 25.0);
    }

    #[test]
    fn draw_filled_and_hollow() {
        let set = set();
        let paint = GlyphPaint {
            fill: FillStyle::Filled,
            ink: Color::BLACK,
            background: Color::WHITE,
            stroke_width: 2.0,
        };
        let mut canvas = Canvas::new(CanvasSize::new(30, 30), Color::WHITE).unwrap();
        assert!(set.draw(&mut canvas, 'a', Point::new(5.0, 25.0), 20.0, &paint));
        // Bar spans x 8..12, y 13..23.
        assert_eq!(canvas.pixel(9, 15), Some(Color::BLACK));
        assert_eq!(canvas.dark_pixels_in(PixelBox::new(0, 0, 30, 30), 128), 40);

        let hollow = GlyphPaint {
            fill: FillStyle::Hollow,
            ..paint
        };
        let mut canvas = Canvas::new(CanvasSize::new(30, 30), Color::WHITE).unwrap();
        assert!(set.draw(&mut canvas, 'a', Point::new(5.0, 25.0), 20.0, &hollow));
        assert_eq!(canvas.pixel(9, 15), Some(Color::WHITE));
        assert_eq!(canvas.pixel(7, 15), Some(Color::BLACK));

        assert!(!set.draw(&mut canvas, 'z', Point::ZERO, 20.0, &paint));
    }

    #[test]
    fn glyph_file_names() {
        assert_eq!(glyph_char(Path::new("dir/a.png")), Some('a'));
        assert_eq!(glyph_char(Path::new("dir/7.JPG")), Some('7'));
        assert_eq!(glyph_char(Path::new("dir/ab.png")), None);
        assert_eq!(glyph_char(Path::new("dir/a.txt")), None);
        assert_eq!(glyph_char(Path::new("dir/a")), None);
    }

    #[test]
    fn load_requires_a_recognized_glyph() {
        let dir = tempfile::tempdir().unwrap();
        bar_image().save(dir.path().join("#.png")).unwrap();
        assert!(BitmapGlyphSet::load(dir.path(), ascii_alnum).unwrap().is_none());

        bar_image().save(dir.path().join("k.png")).unwrap();
        std::fs::write(dir.path().join("q.png"), b"not a png").unwrap();
        let set = BitmapGlyphSet::load(dir.path(), ascii_alnum).unwrap().unwrap();
        assert_eq!(set.characters(), vec!['#', 'k']);
    }

    #[test]
    fn dilate_grows_mask() {
        let mut mask = GrayImage::new(3, 3);
        mask.put_pixel(1, 1, image::Luma([255]));
        let grown = dilate(&mask, 1);
        assert_eq!(grown.dimensions(), (5, 5));
        let lit = grown.pixels().filter(|p| p.0[0] == 255).count();
        assert_eq!(lit, 9);
    }
}
