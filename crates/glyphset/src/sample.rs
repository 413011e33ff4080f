//! Generated samples and their train/val split.

use std::fmt;

use glyphset_render::Canvas;

use crate::label::{self, LabelEncoder, LabelRecord};
use crate::layout::GlyphPlacement;

/// Dataset partition a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Split {
    Train,
    Val,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Val];

    /// Directory name of the split.
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }

    /// Split of the sample at `index`: train below `boundary`, val from it on.
    pub fn for_index(index: usize, boundary: usize) -> Self {
        if index < boundary { Split::Train } else { Split::Val }
    }

    /// `floor(total * train_ratio)`, the first validation index.
    pub fn boundary(total: usize, train_ratio: f64) -> usize {
        ((total as f64) * train_ratio).floor() as usize
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished sample: the distorted canvas and what was placed on it.
#[derive(Debug, Clone)]
pub struct Sample {
    pub index: usize,
    pub split: Split,
    pub canvas: Canvas,
    /// Placements in placement order, labelled or not.
    pub placements: Vec<GlyphPlacement>,
    /// Characters requested but not drawn.
    pub dropped: usize,
}

impl Sample {
    /// Label records for the recognized placements, in placement order.
    pub fn records(&self) -> Vec<LabelRecord> {
        LabelEncoder::new(self.canvas.size()).encode_all(&self.placements)
    }

    /// Placements that produce no label.
    pub fn unlabeled(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| !label::is_recognized(p.character))
            .count()
    }
}

/// Render label records as label file text.
pub fn label_text(records: &[LabelRecord]) -> String {
    records.iter().map(|r| format!("{r}\n")).collect()
}
