//! HSPT - Hyperspectral Sampling and Processing Toolkit
//!
//! Band lookup, per-band gain correction, point and region sampling of
//! hyperspectral cubes, and a CSV waveform format with averaging and
//! differencing for comparing the extracted spectra.

pub mod bands;
pub mod cli;
pub mod config;
pub mod constants;
pub mod cube;
pub mod data;
pub mod error;
pub mod gain;
pub mod pick;
pub mod preview;
pub mod sample;
pub mod waveform;

pub use bands::{BandMatch, BandTable, locate};
pub use cube::{BandMetadata, Cube, HyperspectralImage};
pub use error::{AppError, SpectraError};
pub use waveform::{Waveform, WaveformDataset};
