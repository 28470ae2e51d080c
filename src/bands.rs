//! Band tables and wavelength lookup.
//!
//! Band centers come from image metadata and are stored in ascending
//! order. When a cube has no wavelength metadata the bands are identified
//! by 1-based sequential indices instead, which is what the waveform files
//! and plots use in that case.

use std::borrow::Cow;
use std::path::Path;

use crate::data::{ImageStore, StoreError};
use crate::error::{Result, SpectraError};

/// Band identities for a cube or a waveform dataset.
///
/// Two tables are equal when they yield the same centers, so
/// `Wavelengths(vec![1.0, 2.0])` equals `Sequential(2)`. A waveform file
/// cannot tell the two apart either.
#[derive(Debug, Clone)]
pub enum BandTable {
    /// Band center wavelengths, ascending.
    Wavelengths(Vec<f64>),
    /// No wavelength metadata: bands are numbered `1..=n`.
    Sequential(usize),
}

impl BandTable {
    /// Use the centers if present, otherwise number `band_count` bands.
    pub fn from_metadata(centers: Option<Vec<f64>>, band_count: usize) -> Self {
        match centers {
            Some(centers) => Self::Wavelengths(centers),
            None => Self::Sequential(band_count),
        }
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        match self {
            Self::Wavelengths(centers) => centers.len(),
            Self::Sequential(n) => *n,
        }
    }

    /// True when the table has no bands.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether real wavelengths are known.
    pub fn has_wavelengths(&self) -> bool {
        matches!(self, Self::Wavelengths(_))
    }

    /// Band centers. Sequential tables yield `1.0, 2.0, ..., n`.
    pub fn centers(&self) -> Cow<'_, [f64]> {
        match self {
            Self::Wavelengths(centers) => Cow::Borrowed(centers),
            Self::Sequential(n) => Cow::Owned((1..=*n).map(|i| i as f64).collect()),
        }
    }

    /// Table restricted to the given band indices, in the given order.
    ///
    /// Indices must already be validated against [`BandTable::len`].
    pub fn select(&self, indices: &[usize]) -> Self {
        if let Self::Sequential(_) = self
            && indices.iter().enumerate().all(|(position, &i)| position == i)
        {
            return Self::Sequential(indices.len());
        }
        let centers = self.centers();
        Self::Wavelengths(indices.iter().map(|&i| centers[i]).collect())
    }

    /// Table truncated to its first `len` bands.
    pub fn truncate(&self, len: usize) -> Self {
        match self {
            Self::Wavelengths(centers) => {
                Self::Wavelengths(centers[..len.min(centers.len())].to_vec())
            }
            Self::Sequential(n) => Self::Sequential(len.min(*n)),
        }
    }

    /// Index of the first band whose center is at or above `wavelength`.
    pub fn locate(&self, wavelength: f64) -> Result<usize> {
        locate(&self.centers(), wavelength)
    }

    /// Every `(center, index)` pair in band order.
    pub fn entries(&self) -> Vec<BandMatch> {
        self.centers()
            .iter()
            .enumerate()
            .map(|(index, &center)| BandMatch { center, index })
            .collect()
    }
}

impl PartialEq for BandTable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sequential(a), Self::Sequential(b)) => a == b,
            _ => self.centers() == other.centers(),
        }
    }
}

/// A band found by wavelength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandMatch {
    /// Center wavelength of the band
    pub center: f64,
    /// 0-based band index
    pub index: usize,
}

impl std::fmt::Display for BandMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ {} {} ]", self.center, self.index)
    }
}

/// Smallest index `i` with `centers[i] >= wavelength`.
///
/// `centers` must be ascending; this is not re-checked. An exact match
/// resolves to that band, not the next one.
pub fn locate(centers: &[f64], wavelength: f64) -> Result<usize> {
    let index = centers.partition_point(|&center| center < wavelength);
    if index < centers.len() {
        Ok(index)
    } else {
        Err(SpectraError::NotFound { wavelength })
    }
}

/// Errors from store-backed band queries.
#[derive(Debug, thiserror::Error)]
pub enum BandQueryError {
    /// Loading the image failed
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The lookup itself failed
    #[error(transparent)]
    Spectra(#[from] SpectraError),
}

/// Load the band table of `path` and find the band for `wavelength`.
pub fn find_band(
    store: &dyn ImageStore,
    path: &Path,
    wavelength: f64,
) -> std::result::Result<BandMatch, BandQueryError> {
    let table = load_table(store, path)?;
    let index = table.locate(wavelength)?;
    let center = table.centers()[index];
    log::debug!("Wavelength {} resolved to band {} ({})", wavelength, index, center);
    Ok(BandMatch { center, index })
}

/// Every `(center, index)` pair for the image at `path`.
pub fn band_listing(
    store: &dyn ImageStore,
    path: &Path,
) -> std::result::Result<Vec<BandMatch>, StoreError> {
    Ok(load_table(store, path)?.entries())
}

fn load_table(store: &dyn ImageStore, path: &Path) -> std::result::Result<BandTable, StoreError> {
    let image = store.load(path)?;
    if image.metadata.centers.is_none() {
        log::warn!("{:?} has no wavelength metadata, using band numbers", path);
    }
    Ok(image.band_table())
}
