//! RGB previews of hyperspectral cubes.
//!
//! Three bands are chosen as red, green and blue, each stretched to its own
//! min-max range and written as an 8-bit image.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use ndarray::{ArrayView2, Axis};

use crate::bands::BandTable;
use crate::config::PreviewConfig;
use crate::cube::Cube;
use crate::data::StoreError;
use crate::error::{Result, SpectraError};

/// Band selection for an RGB composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandSelection {
    /// Band index for red channel (0-based)
    pub red: usize,
    /// Band index for green channel (0-based)
    pub green: usize,
    /// Band index for blue channel (0-based)
    pub blue: usize,
}

impl BandSelection {
    /// Create a new band selection.
    pub fn new(red: usize, green: usize, blue: usize) -> Self {
        Self { red, green, blue }
    }

    /// Clamp band indices to valid range.
    pub fn clamp(&self, num_bands: usize) -> Self {
        let max_index = num_bands.saturating_sub(1);
        Self {
            red: self.red.min(max_index),
            green: self.green.min(max_index),
            blue: self.blue.min(max_index),
        }
    }

    fn as_array(&self) -> [usize; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Pick preview bands for a cube described by `table`.
///
/// With wavelengths, each configured wavelength resolves to the first band at
/// or above it, or the last band when the table ends below it. Without
/// wavelengths the configured fallback bands are used, clamped to the cube.
pub fn default_rgb_bands(table: &BandTable, config: &PreviewConfig) -> BandSelection {
    let selection = match table {
        BandTable::Wavelengths(centers) => {
            let last = centers.len().saturating_sub(1);
            let [red, green, blue] = config.rgb_wavelengths.map(|wavelength| {
                crate::bands::locate(centers, wavelength).unwrap_or_else(|_| {
                    log::debug!("No band at or above {} nm, using band {}", wavelength, last);
                    last
                })
            });
            BandSelection::new(red, green, blue)
        }
        BandTable::Sequential(_) => {
            let [red, green, blue] = config.fallback_bands;
            BandSelection::new(red, green, blue)
        }
    };
    selection.clamp(table.len())
}

/// Build an RGB image from three bands of `cube`.
pub fn rgb_composite(cube: &Cube, bands: BandSelection) -> Result<RgbImage> {
    let band_count = cube.band_count();
    if band_count == 0 {
        return Err(SpectraError::EmptyInput("cube has no bands"));
    }
    for band in bands.as_array() {
        if band >= band_count {
            return Err(SpectraError::out_of_bounds("band index", band, band_count));
        }
    }
    if bands.red == bands.green && bands.green == bands.blue {
        log::info!(
            "All bands are the same ({}), output will be grayscale",
            bands.red
        );
    }

    let view = cube.view();
    let [red, green, blue] = bands
        .as_array()
        .map(|band| stretch(view.index_axis(Axis(2), band)));

    let (rows, columns) = (cube.rows(), cube.columns());
    Ok(RgbImage::from_fn(columns as u32, rows as u32, |x, y| {
        let (r, c) = (y as usize, x as usize);
        Rgb([red[[r, c]], green[[r, c]], blue[[r, c]]])
    }))
}

/// Min-max stretch a band to 0-255. A flat band maps to 0.
fn stretch(band: ArrayView2<'_, f64>) -> ndarray::Array2<u8> {
    let (min, max) = band
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    band.mapv(|v| {
        if range > 0.0 && v.is_finite() {
            (((v - min) / range).clamp(0.0, 1.0) * 255.0).round() as u8
        } else {
            0
        }
    })
}

/// Write a composite to `path` as PNG.
pub fn save_preview(image: &RgbImage, path: &Path) -> std::result::Result<(), StoreError> {
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!(
        "Saved {}x{} preview to {:?}",
        image.width(),
        image.height(),
        path
    );
    Ok(())
}
