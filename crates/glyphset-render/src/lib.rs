//! Raster backend for glyphset.
//!
//! This crate draws the pixels of a sample: an opaque [`Canvas`] backed by
//! tiny-skia, font sources (outline fonts and bitmap glyph sets) and a
//! [`text::GlyphRenderer`] that reports padded, canvas-clamped ink boxes.
//!
//! # Getting Started
//!
//! ```no_run
//! use glyphset_render::{Canvas, CanvasSize, Color, OutputFormat};
//! use glyphset_render::text::{CatalogConfig, DirectoryCatalog, FontCatalog};
//!
//! let catalog = DirectoryCatalog::scan(&CatalogConfig::new().outline_dir("fonts/"));
//! println!("{} outline fonts", catalog.list_outline_fonts().len());
//!
//! let mut canvas = Canvas::new(CanvasSize::new(150, 50), Color::WHITE)?;
//! canvas.fill_rect(0.0, 24.0, 150.0, 1.0, Color::BLACK);
//! let png = canvas.encode(OutputFormat::Png)?;
//! # Ok::<(), glyphset_render::RenderError>(())
//! ```

mod canvas;
mod error;
mod types;

pub mod discovery;
pub mod text;

pub use canvas::{Canvas, OutputFormat, luminance};
pub use error::{FontLoadError, RenderError, RenderResult};
pub use types::{CanvasSize, Color, InkRect, PixelBox, Point};

// Re-export tiny-skia for callers building their own paths
pub use resvg::tiny_skia as skia;
