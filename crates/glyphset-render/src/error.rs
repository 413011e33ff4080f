//! Error types for the render crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading fonts or producing rasters.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Invalid canvas dimensions (zero width or height).
    #[error("invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A font source could not be loaded.
    #[error("failed to load font {path}: {source}")]
    FontLoad {
        path: PathBuf,
        #[source]
        source: FontLoadError,
    },

    /// An image could not be decoded or encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Wrap an I/O error together with the path it occurred at.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error type for font loading operations.
#[derive(Debug, Error)]
pub enum FontLoadError {
    /// An I/O error occurred while reading the font.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The font file format is invalid or unsupported.
    #[error("invalid font format: {0}")]
    InvalidFormat(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
