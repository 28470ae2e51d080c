//! Per-band gain correction.
//!
//! Every value in band `b` is multiplied by `gain[b]`. The gain vector
//! used for files is the band width metadata, which is how the acquisition
//! pipeline has always done it. That is most likely a stand-in for a real
//! radiometric calibration, so [`correct`] accepts any vector and only the
//! file helpers reach for the widths.

use std::path::Path;

use ndarray::{Array3, ArrayView1, ArrayView3, Axis};

use crate::cube::{Cube, HyperspectralImage};
use crate::data::{ImageStore, StoreError};
use crate::error::{Result, SpectraError};

/// Multiply each band of `cube` by its gain factor, returning a new cube.
///
/// Accepts any numeric element type the store may hand back; the result
/// is always `f64`. `gain` must have exactly one entry per band.
pub fn correct<T>(cube: ArrayView3<'_, T>, gain: &[f64]) -> Result<Cube>
where
    T: Copy + Into<f64>,
{
    let (rows, columns, bands) = cube.dim();
    if gain.len() != bands {
        return Err(SpectraError::shape_mismatch("gain vector", bands, gain.len()));
    }

    let mut adjusted: Array3<f64> = cube.mapv(Into::into);
    let gain = ArrayView1::from(gain);
    for mut lane in adjusted.lanes_mut(Axis(2)) {
        lane *= &gain;
    }

    log::debug!(
        "Gain corrected {}x{} cube across {} bands",
        rows,
        columns,
        bands
    );
    Ok(Cube::new(adjusted))
}

/// Gain-correct an image using its band widths as the gain vector.
///
/// Band metadata is carried over to the corrected image unchanged.
pub fn gain_adjust_image(image: &HyperspectralImage) -> Result<HyperspectralImage> {
    let gain = image
        .metadata
        .widths
        .as_deref()
        .ok_or(SpectraError::MissingBandWidths)?;
    let cube = correct(image.cube.view(), gain)?;
    Ok(HyperspectralImage {
        cube,
        metadata: image.metadata.clone(),
    })
}

/// Errors from [`gain_adjust_file`].
#[derive(Debug, thiserror::Error)]
pub enum GainError {
    /// Loading the image failed
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Correction failed
    #[error(transparent)]
    Spectra(#[from] SpectraError),
}

/// Load the image at `path` and gain-correct it.
pub fn gain_adjust_file(
    store: &dyn ImageStore,
    path: &Path,
) -> std::result::Result<HyperspectralImage, GainError> {
    let image = store.load(path)?;
    log::info!("Gain adjusting {:?}", path);
    Ok(gain_adjust_image(&image)?)
}
