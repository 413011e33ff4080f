//! Glyph sources and glyph rendering.
//!
//! This module provides font discovery, glyph metrics and glyph drawing,
//! built on `fontdb` and `ttf-parser` for outline fonts and on the `image`
//! crate for bitmap glyph sets.
//!
//! # Rendering a glyph
//!
//! ```no_run
//! use std::sync::Arc;
//! use glyphset_render::{Canvas, CanvasSize, Color, Point};
//! use glyphset_render::text::{FontSource, GlyphRenderer, GlyphStyle, SyntheticFace};
//!
//! let font = FontSource::new("synthetic", Arc::new(SyntheticFace::new()));
//! let mut canvas = Canvas::new(CanvasSize::new(150, 50), Color::WHITE).unwrap();
//! let renderer = GlyphRenderer::default();
//!
//! if let Some(bbox) = renderer.render(
//!     &mut canvas, &font, 'a', Point::new(10.0, 40.0), 36.0, GlyphStyle::FILLED,
//! ) {
//!     println!("ink box: {:?}", bbox);
//! }
//! ```

mod bitmap;
mod catalog;
mod glyph;
mod outline;
mod renderer;
mod synthetic;

pub use bitmap::{BitmapGlyphSet, GLYPH_IMAGE_EXTENSIONS};
pub use catalog::{CatalogConfig, CatalogStats, DirectoryCatalog, FontCatalog, StaticCatalog};
pub use glyph::{
    FillStyle, FontKind, FontSource, GlyphFace, GlyphMetrics, GlyphPaint, GlyphStyle,
};
pub use outline::OutlineFace;
pub use renderer::GlyphRenderer;
pub use synthetic::SyntheticFace;
