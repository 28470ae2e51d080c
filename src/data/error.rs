//! Error types for cube store operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::data::LoaderError;

/// Errors that can occur loading or saving cubes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Header parsing or serialization error
    #[error("Header error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the NumPy data file failed
    #[error("NumPy write error: {0}")]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),

    /// No loader could decode the data file
    #[error("Load error: {0}")]
    Loader(#[from] LoaderError),

    /// Encoding a preview image failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Header content disagrees with itself or with the data file
    #[error("Invalid header {path:?}: {message}")]
    InvalidHeader {
        /// Header file
        path: PathBuf,
        /// Description of the problem
        message: String,
    },
}

impl StoreError {
    /// Create an invalid header error.
    pub fn invalid_header(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            path: path.into(),
            message: message.into(),
        }
    }
}
