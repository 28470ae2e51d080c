//! Error types for the spectral processing core and the command line front end.

use thiserror::Error;

use crate::bands::BandQueryError;
use crate::config::ConfigError;
use crate::data::StoreError;
use crate::gain::GainError;
use crate::pick::PickError;
use crate::waveform::codec::WaveformFileError;

/// Errors raised by band lookup, correction, sampling and waveform handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectraError {
    /// No band center is at or above the requested wavelength.
    #[error("Wavelength {wavelength} not found in band table")]
    NotFound {
        /// The wavelength that was searched for
        wavelength: f64,
    },

    /// A pixel coordinate, region or band index lies outside the cube.
    #[error("{what} ({index}) is out of bounds (limit {limit})")]
    OutOfBounds {
        /// Which coordinate was out of range
        what: &'static str,
        /// Offending value
        index: usize,
        /// Exclusive upper bound for the value
        limit: usize,
    },

    /// Two sequences that must agree in length do not.
    #[error("Shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        /// What was being compared
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        found: usize,
    },

    /// Malformed waveform text or numeric argument.
    #[error("Parse error on row {row}: {message}")]
    Parse {
        /// 1-based row (line) number of the offending input
        row: usize,
        /// Description of the problem
        message: String,
    },

    /// An aggregate was requested over nothing.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// Gain adjustment needs per-band width metadata and the image has none.
    #[error("Image has no band width metadata to use as gain")]
    MissingBandWidths,
}

impl SpectraError {
    /// Create a parse error for a given row.
    pub fn parse(row: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            row,
            message: message.into(),
        }
    }

    /// Create an out of bounds error.
    pub fn out_of_bounds(what: &'static str, index: usize, limit: usize) -> Self {
        Self::OutOfBounds { what, index, limit }
    }

    /// Create a shape mismatch error.
    pub fn shape_mismatch(what: &'static str, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            found,
        }
    }
}

/// Top level error for the `hspt` binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the processing core
    #[error(transparent)]
    Spectra(#[from] SpectraError),

    /// Error from loading or saving cubes
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error reading configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Band lookup through the store failed
    #[error(transparent)]
    Bands(#[from] BandQueryError),

    /// Gain adjustment through the store failed
    #[error(transparent)]
    Gain(#[from] GainError),

    /// Reading or writing a waveform file failed
    #[error(transparent)]
    Waveforms(#[from] WaveformFileError),

    /// Point picking failed
    #[error(transparent)]
    Pick(#[from] PickError),

    /// I/O error writing results
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for the processing core.
pub type Result<T, E = SpectraError> = std::result::Result<T, E>;
