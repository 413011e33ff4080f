//! Basic geometry and color types for rendering.
//!
//! Two rectangle flavours coexist here: [`InkRect`] is a floating point
//! extent as reported by glyph metrics, and [`PixelBox`] is the integer,
//! canvas-clamped box that ends up in label files.

use serde::{Deserialize, Serialize};

/// A point in 2D canvas space (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Offset this point by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Canvas dimensions in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Create a new canvas size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if the size has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create a color from 8-bit components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub(crate) fn to_skia(self) -> resvg::tiny_skia::Color {
        resvg::tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

/// A floating point rectangle given by its edges.
///
/// Glyph metrics report ink extents relative to the pen origin on the
/// baseline, so `top` is usually negative. An empty rect (zero width or
/// height) stands for a glyph without ink.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InkRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl InkRect {
    /// Create a rect from its four edges.
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A zero-sized rect at the origin.
    pub const EMPTY: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// True when the rect covers no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Move the rect by `(dx, dy)`.
    #[inline]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Grow the rect by `amount` on every side.
    #[inline]
    pub fn outset(&self, amount: f32) -> Self {
        Self::new(
            self.left - amount,
            self.top - amount,
            self.right + amount,
            self.bottom + amount,
        )
    }

    /// Smallest rect containing both `self` and `other`.
    pub fn union(&self, other: &InkRect) -> Self {
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// An integer pixel box `(x1, y1)..(x2, y2)`, exclusive on the far edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PixelBox {
    #[inline]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Snap an ink extent outwards to whole pixels, pad it, and clamp it to
    /// the canvas.
    ///
    /// The result always satisfies `0 <= x1 < x2 <= width` and
    /// `0 <= y1 < y2 <= height`, even for empty ink at the canvas border.
    pub fn from_ink(ink: &InkRect, padding: i32, canvas: CanvasSize) -> Self {
        let x1 = ink.left.floor() as i32 - padding;
        let y1 = ink.top.floor() as i32 - padding;
        let x2 = ink.right.ceil() as i32 + padding;
        let y2 = ink.bottom.ceil() as i32 + padding;
        Self::new(x1, y1, x2, y2).clamped(canvas)
    }

    /// Clamp the box to the canvas, keeping at least one pixel on each axis.
    pub fn clamped(&self, canvas: CanvasSize) -> Self {
        let w = canvas.width.max(1) as i32;
        let h = canvas.height.max(1) as i32;
        let x1 = self.x1.clamp(0, w - 1);
        let y1 = self.y1.clamp(0, h - 1);
        let x2 = self.x2.clamp(x1 + 1, w);
        let y2 = self.y2.clamp(y1 + 1, h);
        Self::new(x1, y1, x2, y2)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Inclusive axis-aligned overlap test with a spacing margin.
    ///
    /// Boxes that merely touch count as overlapping once `margin > 0`.
    pub fn overlaps(&self, other: &PixelBox, margin: i32) -> bool {
        !(self.x2 + margin <= other.x1
            || self.x1 - margin >= other.x2
            || self.y2 + margin <= other.y1
            || self.y1 - margin >= other.y2)
    }

    /// True when the box lies inside the canvas and is non-degenerate.
    pub fn is_within(&self, canvas: CanvasSize) -> bool {
        0 <= self.x1
            && self.x1 < self.x2
            && self.x2 <= canvas.width as i32
            && 0 <= self.y1
            && self.y1 < self.y2
            && self.y2 <= canvas.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: CanvasSize = CanvasSize::new(150, 50);

    #[test]
    fn from_ink_pads_and_clamps() {
        let ink = InkRect::new(10.2, 12.6, 30.5, 40.0);
        let b = PixelBox::from_ink(&ink, 4, CANVAS);
        assert_eq!(b, PixelBox::new(6, 8, 35, 44));

        let edge = InkRect::new(-3.0, -1.0, 148.5, 49.9);
        let b = PixelBox::from_ink(&edge, 4, CANVAS);
        assert_eq!(b, PixelBox::new(0, 0, 150, 50));
        assert!(b.is_within(CANVAS));
    }

    #[test]
    fn empty_ink_at_border_stays_non_degenerate() {
        let ink = InkRect::new(150.0, 50.0, 150.0, 50.0);
        let b = PixelBox::from_ink(&ink, 0, CANVAS);
        assert!(b.is_within(CANVAS));
        assert_eq!(b.width(), 1);
        assert_eq!(b.height(), 1);
    }

    #[test]
    fn overlap_respects_margin() {
        let a = PixelBox::new(0, 0, 10, 10);
        let b = PixelBox::new(12, 0, 20, 10);
        assert!(!a.overlaps(&b, 0));
        assert!(!a.overlaps(&b, 2));
        assert!(a.overlaps(&b, 3));
        assert!(b.overlaps(&a, 3));

        // Touching edges are fine without a margin.
        let c = PixelBox::new(10, 0, 20, 10);
        assert!(!a.overlaps(&c, 0));
        assert!(a.overlaps(&c, 1));
    }

    #[test]
    fn ink_rect_union_and_outset() {
        let a = InkRect::new(0.0, -10.0, 5.0, 0.0);
        let b = a.translate(2.0, 2.0);
        let u = a.union(&b);
        assert_eq!(u, InkRect::new(0.0, -10.0, 7.0, 2.0));
        assert_eq!(a.outset(1.0).width(), 7.0);
        assert!(InkRect::EMPTY.is_empty());
    }
}
