//! Glyph faces, metrics and drawing styles.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::canvas::Canvas;
use crate::types::{Color, InkRect, Point};

/// Where a font source's glyphs come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontKind {
    /// A TrueType/OpenType outline font file.
    Outline,
    /// A directory of per-character glyph images.
    BitmapSet,
}

/// Pixel metrics of one glyph at one size.
///
/// Coordinates are relative to the pen origin on the baseline with y
/// pointing down, so ink above the baseline has a negative `top`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    /// Horizontal advance in pixels.
    pub advance: f32,
    /// Tight ink extent. Empty for glyphs without ink (e.g. space).
    pub ink: InkRect,
}

/// How the body of a glyph is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillStyle {
    /// Solid ink.
    #[default]
    Filled,
    /// Ink outline stroke around a background-colored body.
    Hollow,
}

/// Per-glyph rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphStyle {
    pub fill: FillStyle,
    /// Draw an offset duplicate in ink color beneath the glyph.
    pub shadowed: bool,
}

impl GlyphStyle {
    pub const FILLED: Self = Self {
        fill: FillStyle::Filled,
        shadowed: false,
    };

    pub const HOLLOW: Self = Self {
        fill: FillStyle::Hollow,
        shadowed: false,
    };

    /// Same style with the shadow flag set.
    pub fn with_shadow(mut self, shadowed: bool) -> Self {
        self.shadowed = shadowed;
        self
    }
}

/// Paint parameters a face needs to draw one glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPaint {
    pub fill: FillStyle,
    pub ink: Color,
    pub background: Color,
    /// Outline thickness for [`FillStyle::Hollow`], measured outward from
    /// the glyph edge.
    pub stroke_width: f32,
}

/// A source of drawable glyphs.
///
/// Implementations are immutable after construction apart from internal
/// caches, and are shared between worker threads.
pub trait GlyphFace: Send + Sync {
    /// The kind of source backing this face.
    fn kind(&self) -> FontKind;

    /// Metrics for `ch` at `size` pixels, or `None` if the face has no glyph
    /// for it.
    fn metrics(&self, ch: char, size: f32) -> Option<GlyphMetrics>;

    /// Draw `ch` with its pen origin at `pen`.
    ///
    /// Returns `false` when the face has no glyph for `ch`; nothing is drawn
    /// in that case.
    fn draw(&self, canvas: &mut Canvas, ch: char, pen: Point, size: f32, paint: &GlyphPaint)
    -> bool;
}

/// A loaded font source: an identifier, its kind and the face that draws it.
///
/// Cloning is cheap; the face is shared.
#[derive(Clone)]
pub struct FontSource {
    path: PathBuf,
    kind: FontKind,
    face: Arc<dyn GlyphFace>,
}

impl FontSource {
    /// Wrap a face under the given identifier.
    pub fn new(path: impl Into<PathBuf>, face: Arc<dyn GlyphFace>) -> Self {
        let kind = face.kind();
        Self {
            path: path.into(),
            kind,
            face,
        }
    }

    /// The path (or synthetic identifier) of this source.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short display name: the final path component.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn kind(&self) -> FontKind {
        self.kind
    }

    pub fn face(&self) -> &dyn GlyphFace {
        self.face.as_ref()
    }

    /// Glyph metrics at `size` pixels.
    pub fn metrics(&self, ch: char, size: f32) -> Option<GlyphMetrics> {
        self.face.metrics(ch, size)
    }
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSource")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
