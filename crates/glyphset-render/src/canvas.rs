//! CPU raster canvas.
//!
//! [`Canvas`] wraps a tiny-skia pixmap for anti-aliased vector drawing and
//! converts to the `image` crate's buffers for encoding. The canvas is always
//! fully opaque: it starts filled with a background color and every drawing
//! operation paints opaque colors, so premultiplied and straight RGB agree.
//!
//! # Example
//!
//! ```ignore
//! use glyphset_render::{Canvas, CanvasSize, Color, OutputFormat};
//!
//! let mut canvas = Canvas::new(CanvasSize::new(150, 50), Color::WHITE)?;
//! canvas.fill_rect(10.0, 10.0, 20.0, 5.0, Color::BLACK);
//! let jpeg = canvas.encode(OutputFormat::Jpeg)?;
//! ```

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat as ImgFormat, RgbImage};
use resvg::tiny_skia::{
    self, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PremultipliedColorU8,
    Stroke, Transform,
};
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::types::{CanvasSize, Color, PixelBox, Point};

/// Output format for image encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    #[default]
    #[serde(alias = "jpg")]
    Jpeg,
    /// BMP format.
    Bmp,
}

impl OutputFormat {
    fn to_image_format(self) -> ImgFormat {
        match self {
            OutputFormat::Png => ImgFormat::Png,
            OutputFormat::Jpeg => ImgFormat::Jpeg,
            OutputFormat::Bmp => ImgFormat::Bmp,
        }
    }

    /// File extension used when persisting this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Bmp => "bmp",
        }
    }
}

/// A fixed-size opaque RGB drawing surface.
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    background: Color,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    pub fn new(size: CanvasSize, background: Color) -> RenderResult<Self> {
        let mut pixmap =
            Pixmap::new(size.width, size.height).ok_or(RenderError::InvalidDimensions {
                width: size.width,
                height: size.height,
            })?;
        pixmap.fill(background.to_skia());
        Ok(Self { pixmap, background })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width(), self.height())
    }

    /// The color the canvas was cleared with.
    pub fn background(&self) -> Color {
        self.background
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        paint
    }

    /// Fill a closed path using the non-zero winding rule.
    pub fn fill_path(&mut self, path: &Path, color: Color) {
        self.pixmap.fill_path(
            path,
            &Self::paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Stroke a path with round caps and joins.
    pub fn stroke_path(&mut self, path: &Path, color: Color, width: f32) {
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &Self::paint(color), &stroke, Transform::identity(), None);
    }

    /// Stroke an open polyline through `points`.
    ///
    /// Fewer than two points draws nothing.
    pub fn stroke_polyline(&mut self, points: &[Point], color: Color, width: f32) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, color, width);
        }
    }

    /// Fill an axis-aligned rectangle without anti-aliasing.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if let Some(rect) = tiny_skia::Rect::from_xywh(x, y, width, height) {
            let mut paint = Self::paint(color);
            paint.anti_alias = false;
            self.pixmap
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    /// Fill the ellipse inscribed in the given rectangle.
    pub fn fill_ellipse(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let oval = tiny_skia::Rect::from_xywh(x, y, width, height)
            .and_then(PathBuilder::from_oval);
        if let Some(path) = oval {
            self.fill_path(&path, color);
        }
    }

    /// Set a single pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        let idx = y as usize * self.width() as usize + x as usize;
        if let Some(px) = PremultipliedColorU8::from_rgba(color.r, color.g, color.b, 255) {
            self.pixmap.pixels_mut()[idx] = px;
        }
    }

    /// Read a pixel as straight RGB, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap.pixel(x, y).map(|p| Color::rgb(p.red(), p.green(), p.blue()))
    }

    /// Composite an 8-bit coverage mask with its top-left corner at `(x, y)`.
    ///
    /// A coverage of 255 paints `color` outright, 0 leaves the canvas alone.
    pub fn blend_coverage(&mut self, coverage: &GrayImage, x: i32, y: i32, color: Color) {
        let (cw, ch) = (self.width() as i32, self.height() as i32);
        for (mx, my, value) in coverage.enumerate_pixels() {
            let a = value.0[0] as u32;
            if a == 0 {
                continue;
            }
            let px = x + mx as i32;
            let py = y + my as i32;
            if px < 0 || py < 0 || px >= cw || py >= ch {
                continue;
            }
            let idx = py as usize * cw as usize + px as usize;
            let dst = self.pixmap.pixels()[idx];
            let mix = |d: u8, s: u8| ((d as u32 * (255 - a) + s as u32 * a + 127) / 255) as u8;
            let blended = PremultipliedColorU8::from_rgba(
                mix(dst.red(), color.r),
                mix(dst.green(), color.g),
                mix(dst.blue(), color.b),
                255,
            );
            if let Some(blended) = blended {
                self.pixmap.pixels_mut()[idx] = blended;
            }
        }
    }

    /// Count pixels inside `region` whose luminance is below `threshold`.
    pub fn dark_pixels_in(&self, region: PixelBox, threshold: u8) -> usize {
        let region = region.clamped(self.size());
        let mut count = 0;
        for y in region.y1..region.y2 {
            for x in region.x1..region.x2 {
                if let Some(c) = self.pixel(x as u32, y as u32)
                    && luminance(c) < threshold
                {
                    count += 1;
                }
            }
        }
        count
    }

    /// Convert to an `image` RGB buffer.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let c = self.pixel(x, y).unwrap_or(self.background);
            image::Rgb([c.r, c.g, c.b])
        })
    }

    /// Encode the canvas to bytes in the specified format.
    pub fn encode(&self, format: OutputFormat) -> RenderResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(self.to_rgb_image())
            .write_to(&mut buffer, format.to_image_format())?;
        Ok(buffer.into_inner())
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

/// Rec. 601 luma of an RGB color.
pub fn luminance(c: Color) -> u8 {
    ((c.r as u32 * 299 + c.g as u32 * 587 + c.b as u32 * 114) / 1000) as u8
}
