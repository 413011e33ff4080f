//! Error types for dataset generation.

use std::path::PathBuf;

use glyphset_render::RenderError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while generating or persisting samples.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No outline font or bitmap glyph set was usable.
    #[error("no usable font sources found")]
    NoFonts,

    /// Rasterization or image encoding failed.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Writing dataset files failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    /// Wrap an I/O error together with the path it occurred at.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;
