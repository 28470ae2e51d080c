//! Spectral waveforms and waveform datasets.
//!
//! A waveform is one spectrum: an intensity per band. Samplers produce
//! them, the codec persists them as CSV, and the aggregator averages or
//! differences them for plotting.
//!
//! ## File format
//!
//! ```text
//! 400.5,402.7,404.9      <- band centers (or 1,2,3 when unknown)
//! 0.12,0.15,0.19         <- one row per waveform
//! 0.11,0.14,0.18
//! ```

pub mod aggregate;
pub mod codec;


use ndarray::Array1;

use crate::bands::BandTable;
use crate::error::{Result, SpectraError};

pub use aggregate::{Difference, average, average_waveforms, difference};
pub use codec::{deserialize, read_dataset, serialize, write_dataset};

/// One spectrum: an intensity value per band.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Waveform {
    values: Vec<f64>,
}

impl Waveform {
    /// Wrap a vector of intensities.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a zero-length waveform.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Intensity values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for Waveform {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<Array1<f64>> for Waveform {
    fn from(values: Array1<f64>) -> Self {
        Self::new(values.to_vec())
    }
}

/// A band table with the waveforms measured against it.
///
/// Every waveform has exactly as many values as the table has bands.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformDataset {
    bands: BandTable,
    waveforms: Vec<Waveform>,
}

impl WaveformDataset {
    /// Pair a band table with waveforms, checking their lengths.
    pub fn new(bands: BandTable, waveforms: Vec<Waveform>) -> Result<Self> {
        if let Some(bad) = waveforms.iter().find(|w| w.len() != bands.len()) {
            return Err(SpectraError::shape_mismatch(
                "waveform length",
                bands.len(),
                bad.len(),
            ));
        }
        Ok(Self { bands, waveforms })
    }

    /// Build a dataset from optional band centers.
    ///
    /// Without centers the table is numbered from the first waveform's
    /// length, which is what the point picker has always written.
    pub fn from_waveforms(centers: Option<Vec<f64>>, waveforms: Vec<Waveform>) -> Result<Self> {
        let band_count = waveforms.first().map_or(0, Waveform::len);
        Self::new(BandTable::from_metadata(centers, band_count), waveforms)
    }

    /// The band table.
    pub fn bands(&self) -> &BandTable {
        &self.bands
    }

    /// All waveforms, in order.
    pub fn waveforms(&self) -> &[Waveform] {
        &self.waveforms
    }

    /// Number of waveforms.
    pub fn len(&self) -> usize {
        self.waveforms.len()
    }

    /// True when the dataset holds no waveforms.
    pub fn is_empty(&self) -> bool {
        self.waveforms.is_empty()
    }
}
