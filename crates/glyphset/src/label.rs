//! Class alphabet and normalized label records.
//!
//! Label files use one line per glyph:
//!
//! ```text
//! <class_id> <center_x> <center_y> <width> <height>
//! ```
//!
//! with all four geometry values normalized to the canvas size and printed
//! with six decimals.

use std::fmt;
use std::str::FromStr;

use glyphset_render::{CanvasSize, PixelBox};

use crate::layout::GlyphPlacement;

/// The class alphabet, in class id order.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Number of classes.
pub const CLASS_COUNT: usize = 36;

/// Class id of `ch` after case folding, or `None` if it is not in the
/// alphabet.
pub fn class_id(ch: char) -> Option<u8> {
    let folded = ch.to_ascii_lowercase();
    match folded {
        'a'..='z' => Some(folded as u8 - b'a'),
        '0'..='9' => Some(26 + (folded as u8 - b'0')),
        _ => None,
    }
}

/// True when `ch` case-folds into the alphabet.
pub fn is_recognized(ch: char) -> bool {
    class_id(ch).is_some()
}

/// The character a class id stands for.
pub fn class_char(id: u8) -> Option<char> {
    ALPHABET.chars().nth(id as usize)
}

/// One normalized bounding box with its class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRecord {
    pub class_id: u8,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl LabelRecord {
    /// Normalize a pixel box against the canvas size.
    pub fn from_pixel_box(class_id: u8, b: &PixelBox, canvas: CanvasSize) -> Self {
        let w = canvas.width as f64;
        let h = canvas.height as f64;
        Self {
            class_id,
            center_x: (b.x1 + b.x2) as f64 / (2.0 * w),
            center_y: (b.y1 + b.y2) as f64 / (2.0 * h),
            width: (b.x2 - b.x1) as f64 / w,
            height: (b.y2 - b.y1) as f64 / h,
        }
    }

    /// Decode back into pixel corners `(x1, y1, x2, y2)`.
    pub fn to_pixel_corners(&self, canvas: CanvasSize) -> (f64, f64, f64, f64) {
        let w = canvas.width as f64;
        let h = canvas.height as f64;
        let (cx, cy) = (self.center_x * w, self.center_y * h);
        let (bw, bh) = (self.width * w, self.height * h);
        (cx - bw / 2.0, cy - bh / 2.0, cx + bw / 2.0, cy + bh / 2.0)
    }

    /// Decode back into the nearest integer pixel box.
    pub fn to_pixel_box(&self, canvas: CanvasSize) -> PixelBox {
        let (x1, y1, x2, y2) = self.to_pixel_corners(canvas);
        PixelBox::new(
            x1.round() as i32,
            y1.round() as i32,
            x2.round() as i32,
            y2.round() as i32,
        )
    }

    /// True when all normalized values lie in `[0, 1]`.
    pub fn is_normalized(&self) -> bool {
        [self.center_x, self.center_y, self.width, self.height]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

impl fmt::Display for LabelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.center_x, self.center_y, self.width, self.height
        )
    }
}

/// Error parsing a label line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed label line: {0:?}")]
pub struct ParseLabelError(pub String);

impl FromStr for LabelRecord {
    type Err = ParseLabelError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let err = || ParseLabelError(line.to_string());
        let mut fields = line.split_whitespace();
        let class_id = fields
            .next()
            .and_then(|s| s.parse::<u8>().ok())
            .filter(|&id| (id as usize) < CLASS_COUNT)
            .ok_or_else(err)?;
        let mut next_f64 = || {
            fields
                .next()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(err)
        };
        let record = Self {
            class_id,
            center_x: next_f64()?,
            center_y: next_f64()?,
            width: next_f64()?,
            height: next_f64()?,
        };
        if fields.next().is_some() {
            return Err(err());
        }
        Ok(record)
    }
}

/// Turns glyph placements into label records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEncoder {
    canvas: CanvasSize,
}

impl LabelEncoder {
    pub fn new(canvas: CanvasSize) -> Self {
        Self { canvas }
    }

    /// Encode one placement; `None` when its character is not in the
    /// alphabet.
    pub fn encode(&self, placement: &GlyphPlacement) -> Option<LabelRecord> {
        let id = class_id(placement.character)?;
        Some(LabelRecord::from_pixel_box(id, &placement.bbox, self.canvas))
    }

    /// Encode every placement, preserving placement order.
    pub fn encode_all(&self, placements: &[GlyphPlacement]) -> Vec<LabelRecord> {
        placements.iter().filter_map(|p| self.encode(p)).collect()
    }
}
