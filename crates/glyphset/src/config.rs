//! Generator configuration.
//!
//! Configuration is read from a TOML file. Every key is optional; missing
//! keys fall back to the defaults below.
//!
//! ```toml
//! seed = 7
//! train_ratio = 0.8
//! characters = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
//! image_format = "jpeg"
//!
//! [canvas]
//! width = 150
//! height = 50
//!
//! [glyph]
//! size = 36.0
//! padding = 4
//! stroke_width = 2.0
//! hollow_probability = 0.5
//! shadow_probability = 0.0
//!
//! [layout]
//! characters_per_sample = 3
//! mode = "scattered"
//! min_size = 18.0
//! max_size = 32.0
//! spacing_margin = 2
//!
//! [distortion]
//! count = 3
//! line_width = 3.0
//!
//! [plan]
//! kind = "total"
//! samples = 1000
//!
//! [paths]
//! fonts = "fonts"
//! output = "datasets"
//! ```

use std::path::{Path, PathBuf};

use glyphset_render::text::CatalogConfig;
use glyphset_render::{CanvasSize, OutputFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::label;

/// Errors from loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Run seed; each sample derives its own stream from it.
    pub seed: u64,
    /// Fraction of planned samples that go to the train split.
    pub train_ratio: f64,
    /// Pool that sample characters are drawn from.
    pub characters: String,
    pub image_format: OutputFormat,
    pub canvas: CanvasConfig,
    pub glyph: GlyphConfig,
    pub layout: LayoutConfig,
    pub distortion: DistortionConfig,
    pub plan: PlanConfig,
    pub paths: PathsConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            train_ratio: 0.8,
            characters: "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
                .to_string(),
            image_format: OutputFormat::Jpeg,
            canvas: CanvasConfig::default(),
            glyph: GlyphConfig::default(),
            layout: LayoutConfig::default(),
            distortion: DistortionConfig::default(),
            plan: PlanConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::invalid(
                "canvas",
                format!("{}x{} has no pixels", self.canvas.width, self.canvas.height),
            ));
        }
        if !(0.0..=1.0).contains(&self.train_ratio) {
            return Err(ConfigError::invalid(
                "train_ratio",
                format!("{} is outside [0, 1]", self.train_ratio),
            ));
        }
        if self.characters.is_empty() {
            return Err(ConfigError::invalid("characters", "pool is empty"));
        }
        for (key, value) in [
            ("glyph.size", self.glyph.size),
            ("glyph.stroke_width", self.glyph.stroke_width),
            ("layout.min_size", self.layout.scattered.min_size),
            ("layout.max_size", self.layout.scattered.max_size),
            ("distortion.line_width", self.distortion.line_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(key, format!("{value} is not a positive size")));
            }
        }
        let edge_padding = self.layout.sequential.edge_padding;
        if !edge_padding.is_finite() || edge_padding < 0.0 {
            return Err(ConfigError::invalid(
                "layout.edge_padding",
                format!("{edge_padding} is not a finite margin"),
            ));
        }
        if self.glyph.padding < 0 {
            return Err(ConfigError::invalid("glyph.padding", "must not be negative"));
        }
        for (key, p) in [
            ("glyph.hollow_probability", self.glyph.hollow_probability),
            ("glyph.shadow_probability", self.glyph.shadow_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(key, format!("{p} is outside [0, 1]")));
            }
        }
        let s = &self.layout.scattered;
        if s.min_size > s.max_size {
            return Err(ConfigError::invalid(
                "layout.min_size",
                format!("range {}..={} is empty", s.min_size, s.max_size),
            ));
        }
        if s.spacing_margin < 0 {
            return Err(ConfigError::invalid("layout.spacing_margin", "must not be negative"));
        }
        if s.edge_margin < 0 {
            return Err(ConfigError::invalid("layout.edge_margin", "must not be negative"));
        }
        if s.retry_budget == 0 {
            return Err(ConfigError::invalid("layout.retry_budget", "must be at least 1"));
        }
        Ok(())
    }

    /// Catalog settings for the configured font roots.
    pub fn catalog_config(&self) -> CatalogConfig {
        let mut catalog = CatalogConfig::new()
            .outline_dir(&self.paths.fonts)
            .recognizes(label::is_recognized);
        if let Some(dir) = &self.paths.bitmaps {
            catalog = catalog.bitmap_dir(dir);
        }
        catalog
    }

    /// The character pool as a list.
    pub fn character_pool(&self) -> Vec<char> {
        self.characters.chars().collect()
    }
}

/// `[canvas]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 50,
        }
    }
}

impl CanvasConfig {
    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }
}

/// `[glyph]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    /// Font size for sequential layout, in pixels.
    pub size: f32,
    /// Pixels added around each ink box.
    pub padding: i32,
    /// Outline thickness of hollow glyphs.
    pub stroke_width: f32,
    pub hollow_probability: f64,
    pub shadow_probability: f64,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            size: 36.0,
            padding: 4,
            stroke_width: 2.0,
            hollow_probability: 0.5,
            shadow_probability: 0.0,
        }
    }
}

/// `[layout]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub characters_per_sample: usize,
    pub mode: LayoutMode,
    #[serde(flatten)]
    pub sequential: SequentialConfig,
    #[serde(flatten)]
    pub scattered: ScatteredConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            characters_per_sample: 3,
            mode: LayoutMode::default(),
            sequential: SequentialConfig::default(),
            scattered: ScatteredConfig::default(),
        }
    }
}

/// How glyphs are arranged on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// One evenly spaced, vertically centred line.
    #[default]
    Sequential,
    /// Random sizes and positions without overlaps.
    Scattered,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SequentialConfig {
    /// Left and right margin of the line.
    pub edge_padding: f32,
}

impl Default for SequentialConfig {
    fn default() -> Self {
        Self { edge_padding: 10.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScatteredConfig {
    pub min_size: f32,
    pub max_size: f32,
    /// Extra clearance required between placed boxes.
    pub spacing_margin: i32,
    /// Clearance kept from the right and bottom canvas edges.
    pub edge_margin: i32,
    /// Placement attempts per character before it is dropped.
    pub retry_budget: u32,
}

impl Default for ScatteredConfig {
    fn default() -> Self {
        Self {
            min_size: 18.0,
            max_size: 32.0,
            spacing_margin: 2,
            edge_margin: 2,
            retry_budget: 100,
        }
    }
}

/// `[distortion]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DistortionConfig {
    /// Primitives drawn per sample.
    pub count: usize,
    /// Stroke width of line-like primitives.
    pub line_width: f32,
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self {
            count: 3,
            line_width: 3.0,
        }
    }
}

/// `[plan]`: how many samples to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub kind: PlanKind,
    /// Samples per font source for [`PlanKind::PerFont`].
    pub samples_per_font: usize,
    /// Total samples for [`PlanKind::Total`].
    pub samples: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            kind: PlanKind::PerFont,
            samples_per_font: 1,
            samples: 1000,
        }
    }
}

/// Sample count strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// A fixed number of samples for every font source, fonts in order.
    #[default]
    PerFont,
    /// A fixed total, each sample using a randomly chosen font source.
    Total,
}

impl PlanConfig {
    /// Number of samples planned for `font_count` sources.
    pub fn total_samples(&self, font_count: usize) -> usize {
        match self.kind {
            PlanKind::PerFont => self.samples_per_font * font_count,
            PlanKind::Total => self.samples,
        }
    }
}

/// `[paths]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root scanned for `.ttf`/`.otf` files.
    pub fonts: PathBuf,
    /// Root of per-character bitmap glyph set directories.
    pub bitmaps: Option<PathBuf>,
    /// Dataset output root.
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            fonts: PathBuf::from("fonts"),
            bitmaps: None,
            output: PathBuf::from("datasets"),
        }
    }
}
