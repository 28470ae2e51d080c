//! Hyperspectral cube data model.
//!
//! A cube holds reflectance values in `(row, column, band)` order, the
//! layout used by the acquisition software and by the waveform tools.
//! Band metadata (center wavelengths and widths) travels next to the cube
//! in [`HyperspectralImage`] because it is optional: many exported cubes
//! carry none.

use ndarray::{Array3, ArrayView1, ArrayView3, s};

use crate::bands::BandTable;
use crate::sample::region::{Region, mean_spectrum};
use crate::waveform::Waveform;

/// A three dimensional grid of reflectance values.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    data: Array3<f64>,
}

impl Cube {
    /// Wrap an owned `(rows, columns, bands)` array.
    pub fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// Create a cube of zeros.
    pub fn zeros(rows: usize, columns: usize, bands: usize) -> Self {
        Self::new(Array3::zeros((rows, columns, bands)))
    }

    /// Build a cube by evaluating `f(row, column, band)` for every element.
    pub fn from_fn(
        rows: usize,
        columns: usize,
        bands: usize,
        f: impl FnMut((usize, usize, usize)) -> f64,
    ) -> Self {
        Self::new(Array3::from_shape_fn((rows, columns, bands), f))
    }

    /// Number of pixel rows.
    pub fn rows(&self) -> usize {
        self.data.dim().0
    }

    /// Number of pixel columns.
    pub fn columns(&self) -> usize {
        self.data.dim().1
    }

    /// Number of spectral bands.
    pub fn band_count(&self) -> usize {
        self.data.dim().2
    }

    /// `(rows, columns, bands)`.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Value at `(row, column, band)`, if in range.
    pub fn get(&self, row: usize, column: usize, band: usize) -> Option<f64> {
        self.data.get((row, column, band)).copied()
    }

    /// The full spectrum of one pixel. Panics if out of range; samplers
    /// bounds-check before calling this.
    pub(crate) fn pixel(&self, row: usize, column: usize) -> ArrayView1<'_, f64> {
        self.data.slice(s![row, column, ..])
    }

    /// Borrow the underlying array.
    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// Consume the cube and return the underlying array.
    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }

    /// Average spectrum over the whole spatial extent.
    ///
    /// Returns `None` for a cube with no pixels.
    pub fn mean_spectrum(&self) -> Option<Waveform> {
        if self.rows() == 0 || self.columns() == 0 {
            return None;
        }
        let whole = Region::new(0, 0, self.columns(), self.rows());
        Some(mean_spectrum(self.data.slice(whole.slice_info())))
    }
}

impl From<Array3<f64>> for Cube {
    fn from(data: Array3<f64>) -> Self {
        Self::new(data)
    }
}

/// Per-band metadata supplied by the image store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandMetadata {
    /// Band center wavelengths, ascending.
    pub centers: Option<Vec<f64>>,
    /// Band widths. Also the source of the gain vector, see [`crate::gain`].
    pub widths: Option<Vec<f64>>,
}

/// A cube together with whatever band metadata came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperspectralImage {
    /// Reflectance data
    pub cube: Cube,
    /// Band centers and widths
    pub metadata: BandMetadata,
}

impl HyperspectralImage {
    /// Create an image with no band metadata.
    pub fn new(cube: Cube) -> Self {
        Self {
            cube,
            metadata: BandMetadata::default(),
        }
    }

    /// Attach band center wavelengths.
    pub fn with_centers(mut self, centers: Vec<f64>) -> Self {
        self.metadata.centers = Some(centers);
        self
    }

    /// Attach band widths.
    pub fn with_widths(mut self, widths: Vec<f64>) -> Self {
        self.metadata.widths = Some(widths);
        self
    }

    /// Band table, falling back to 1-based indices when centers are absent.
    pub fn band_table(&self) -> BandTable {
        BandTable::from_metadata(self.metadata.centers.clone(), self.cube.band_count())
    }
}
