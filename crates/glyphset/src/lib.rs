//! Synthetic labeled character-detection datasets.
//!
//! `glyphset` renders short character sequences from real fonts (or
//! directories of per-character glyph images), clutters them with noise
//! strokes, and writes each image next to a label file with one normalized
//! bounding box per recognizable character.
//!
//! The pipeline for one sample is
//! [`layout`] → [`distortion`] → [`label`] → [`sink`], driven over every
//! font source by the [`orchestrator`].
//!
//! # Example
//!
//! ```no_run
//! use glyphset::config::GeneratorConfig;
//! use glyphset::orchestrator::Orchestrator;
//! use glyphset::sink::DirectorySink;
//! use glyphset_render::text::DirectoryCatalog;
//!
//! let config = GeneratorConfig::load("glyphset.toml")?;
//! let catalog = DirectoryCatalog::scan(&config.catalog_config());
//! let sink = DirectorySink::create(&config.paths.output, config.image_format)?;
//! let report = Orchestrator::new(config).run(&catalog, &sink)?;
//! println!("{} samples written", report.written);
//! # Ok::<(), glyphset::DatasetError>(())
//! ```

pub mod config;
pub mod distortion;
mod error;
pub mod label;
pub mod layout;
pub mod orchestrator;
pub mod sample;
pub mod sink;

pub use error::{DatasetError, DatasetResult};

/// `tracing` targets used by this crate.
pub mod targets {
    pub const CATALOG: &str = "glyphset::catalog";
    pub const LAYOUT: &str = "glyphset::layout";
    pub const SINK: &str = "glyphset::sink";
    pub const ORCHESTRATOR: &str = "glyphset::orchestrator";
}
