//! Font catalogs: enumeration of usable glyph sources.
//!
//! The [`FontCatalog`] trait is the capability the generator depends on.
//! [`DirectoryCatalog`] discovers sources on disk; [`StaticCatalog`] holds
//! an in-memory list (synthetic faces, embedded fonts).
//!
//! # Example
//!
//! ```no_run
//! use glyphset_render::text::{CatalogConfig, DirectoryCatalog, FontCatalog};
//!
//! let config = CatalogConfig::new()
//!     .outline_dir("fonts/")
//!     .recognizes(|c| c.is_ascii_alphanumeric());
//! let catalog = DirectoryCatalog::scan(&config);
//! for font in catalog.list_outline_fonts() {
//!     println!("{}", font.name());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::bitmap::BitmapGlyphSet;
use super::glyph::{FontSource, GlyphMetrics};
use super::outline::OutlineFace;
use crate::discovery::{FONT_EXTENSIONS, find_directories, find_font_files};
use crate::error::{FontLoadError, RenderError};

const TARGET: &str = "glyphset_render::catalog";

/// Enumerates glyph sources and answers metric queries.
pub trait FontCatalog: Send + Sync {
    /// Outline font sources, in stable order.
    fn list_outline_fonts(&self) -> Vec<FontSource>;

    /// Bitmap glyph sets, in stable order.
    fn list_bitmap_sets(&self) -> Vec<FontSource>;

    /// Metrics of `ch` in `font` at `size` pixels.
    fn metrics(&self, font: &FontSource, ch: char, size: f32) -> Option<GlyphMetrics> {
        font.metrics(ch, size)
    }

    /// Every source: outline fonts first, then bitmap sets.
    fn sources(&self) -> Vec<FontSource> {
        let mut all = self.list_outline_fonts();
        all.extend(self.list_bitmap_sets());
        all
    }
}

/// Configuration for scanning font directories.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Root scanned recursively for `.ttf`/`.otf` files.
    pub outline_dir: Option<PathBuf>,
    /// Root scanned for bitmap glyph set directories.
    pub bitmap_dir: Option<PathBuf>,
    /// Characters that make a bitmap directory a usable glyph set.
    pub recognizes: fn(char) -> bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            outline_dir: None,
            bitmap_dir: None,
            recognizes: |c| c.is_alphanumeric(),
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outline font root.
    pub fn outline_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.outline_dir = Some(dir.into());
        self
    }

    /// Set the bitmap glyph set root.
    pub fn bitmap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bitmap_dir = Some(dir.into());
        self
    }

    /// Set the recognized-character predicate for bitmap sets.
    pub fn recognizes(mut self, recognizes: fn(char) -> bool) -> Self {
        self.recognizes = recognizes;
        self
    }
}

/// Counts from a directory scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Outline faces loaded.
    pub outline_loaded: usize,
    /// Bitmap glyph sets loaded.
    pub bitmap_loaded: usize,
    /// Sources excluded because they failed to load.
    pub skipped: usize,
}

/// A catalog discovered from font directories.
///
/// All outline faces share one `fontdb` database. Sources that fail to load
/// are excluded with a warning; scanning itself never fails.
pub struct DirectoryCatalog {
    outline: Vec<FontSource>,
    bitmap: Vec<FontSource>,
    stats: CatalogStats,
}

impl DirectoryCatalog {
    /// Scan the configured directories.
    pub fn scan(config: &CatalogConfig) -> Self {
        let mut stats = CatalogStats::default();

        let outline = match &config.outline_dir {
            Some(dir) => load_outline_fonts(dir, &mut stats),
            None => Vec::new(),
        };
        let bitmap = match &config.bitmap_dir {
            Some(dir) => load_bitmap_sets(dir, config.recognizes, &mut stats),
            None => Vec::new(),
        };

        tracing::info!(
            target: TARGET,
            outline = stats.outline_loaded,
            bitmap = stats.bitmap_loaded,
            skipped = stats.skipped,
            "font catalog ready"
        );
        Self {
            outline,
            bitmap,
            stats,
        }
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.outline.is_empty() && self.bitmap.is_empty()
    }
}

impl FontCatalog for DirectoryCatalog {
    fn list_outline_fonts(&self) -> Vec<FontSource> {
        self.outline.clone()
    }

    fn list_bitmap_sets(&self) -> Vec<FontSource> {
        self.bitmap.clone()
    }
}

impl std::fmt::Debug for DirectoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCatalog")
            .field("outline", &self.outline.len())
            .field("bitmap", &self.bitmap.len())
            .field("stats", &self.stats)
            .finish()
    }
}

fn warn_skipped(err: &RenderError) {
    tracing::warn!(target: TARGET, "excluding font source: {}", err);
}

fn load_outline_fonts(root: &Path, stats: &mut CatalogStats) -> Vec<FontSource> {
    let files = match find_font_files(root, FONT_EXTENSIONS) {
        Ok(files) => files,
        Err(e) => {
            warn_skipped(&e);
            return Vec::new();
        }
    };

    // Load everything into one database first, then share it.
    let mut db = fontdb::Database::new();
    let mut loaded: Vec<(PathBuf, fontdb::ID)> = Vec::new();
    for path in files {
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                stats.skipped += 1;
                warn_skipped(&RenderError::FontLoad {
                    path,
                    source: FontLoadError::Io(e),
                });
                continue;
            }
        };

        let before = db.len();
        db.load_font_data(data);
        // A collection may hold several faces; the first one represents the file.
        match db.faces().nth(before).map(|face| face.id) {
            Some(id) => loaded.push((path, id)),
            None => {
                stats.skipped += 1;
                warn_skipped(&RenderError::FontLoad {
                    path,
                    source: FontLoadError::InvalidFormat("no parsable face".into()),
                });
            }
        }
    }

    let db = Arc::new(db);
    let mut sources = Vec::with_capacity(loaded.len());
    for (path, id) in loaded {
        match OutlineFace::new(Arc::clone(&db), id) {
            Ok(face) => {
                tracing::debug!(target: TARGET, "loaded outline font {}", path.display());
                stats.outline_loaded += 1;
                sources.push(FontSource::new(path, Arc::new(face)));
            }
            Err(source) => {
                stats.skipped += 1;
                warn_skipped(&RenderError::FontLoad { path, source });
            }
        }
    }
    sources
}

fn load_bitmap_sets(
    root: &Path,
    recognizes: fn(char) -> bool,
    stats: &mut CatalogStats,
) -> Vec<FontSource> {
    let dirs = match find_directories(root) {
        Ok(dirs) => dirs,
        Err(e) => {
            warn_skipped(&e);
            return Vec::new();
        }
    };

    let mut sources = Vec::new();
    for dir in dirs {
        match BitmapGlyphSet::load(&dir, recognizes) {
            Ok(Some(set)) => {
                tracing::debug!(
                    target: TARGET,
                    "loaded bitmap glyph set {} ({} glyphs)",
                    dir.display(),
                    set.characters().len()
                );
                stats.bitmap_loaded += 1;
                sources.push(FontSource::new(dir, Arc::new(set)));
            }
            Ok(None) => {}
            Err(e) => {
                stats.skipped += 1;
                warn_skipped(&e);
            }
        }
    }
    sources
}

/// A catalog over an explicit list of sources.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    outline: Vec<FontSource>,
    bitmap: Vec<FontSource>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source; it is listed according to its kind.
    pub fn with_source(mut self, source: FontSource) -> Self {
        match source.kind() {
            super::FontKind::Outline => self.outline.push(source),
            super::FontKind::BitmapSet => self.bitmap.push(source),
        }
        self
    }
}

impl FontCatalog for StaticCatalog {
    fn list_outline_fonts(&self) -> Vec<FontSource> {
        self.outline.clone()
    }

    fn list_bitmap_sets(&self) -> Vec<FontSource> {
        self.bitmap.clone()
    }
}
