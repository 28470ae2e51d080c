//! Loader for NumPy `.npy` files.
//!
//! Cubes are stored channels-last, `(rows, columns, bands)`, which is what
//! [`crate::data::CubeStore`] writes. 2D arrays load as a single band.

use std::io::Cursor;

use ndarray::{ArrayD, Axis, Ix2, Ix3};
use ndarray_npy::ReadNpyExt;

use crate::cube::Cube;
use crate::data::loader::{CubeLoader, LoaderError};

/// Loader for NumPy `.npy` files.
///
/// Supported data types: `f32`, `f64`, `u8`, `u16`, `i16`, `i32`. Values are
/// converted to `f64` without rescaling; reflectance units are kept.
pub struct NpyLoader;

impl NpyLoader {
    /// NumPy magic bytes: \x93NUMPY
    const MAGIC: &'static [u8] = &[0x93, b'N', b'U', b'M', b'P', b'Y'];

    fn array_to_cube<T>(array: ArrayD<T>) -> Result<Cube, LoaderError>
    where
        T: Copy + Into<f64>,
    {
        let shape = array.shape().to_vec();
        log::debug!("NpyLoader: array shape = {:?}", shape);
        let array: ArrayD<f64> = array.mapv(Into::into);

        let data = match shape.len() {
            2 => array
                .into_dimensionality::<Ix2>()
                .map(|plane| plane.insert_axis(Axis(2))),
            3 => array.into_dimensionality::<Ix3>(),
            n => {
                return Err(LoaderError::new(format!(
                    "Unsupported array dimensions: {} (expected 2 or 3)",
                    n
                )));
            }
        }
        .map_err(|e| LoaderError::new(format!("Bad array shape {:?}: {}", shape, e)))?;

        let cube = Cube::new(data);
        log::info!(
            "NpyLoader: loaded {}x{} with {} bands",
            cube.rows(),
            cube.columns(),
            cube.band_count()
        );
        Ok(cube)
    }
}

impl CubeLoader for NpyLoader {
    fn id(&self) -> &'static str {
        "npy"
    }

    fn display_name(&self) -> &'static str {
        "NumPy Array (.npy)"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["npy"]
    }

    fn can_load(&self, data: &[u8]) -> bool {
        data.starts_with(Self::MAGIC)
    }

    fn load(&self, data: &[u8]) -> Result<Cube, LoaderError> {
        let mut cursor = Cursor::new(data);

        // f32 is what the store writes and what most instruments export
        if let Ok(array) = ArrayD::<f32>::read_npy(&mut cursor) {
            return Self::array_to_cube(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<f64>::read_npy(&mut cursor) {
            return Self::array_to_cube(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<u16>::read_npy(&mut cursor) {
            return Self::array_to_cube(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<u8>::read_npy(&mut cursor) {
            return Self::array_to_cube(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<i16>::read_npy(&mut cursor) {
            return Self::array_to_cube(array);
        }

        cursor.set_position(0);
        if let Ok(array) = ArrayD::<i32>::read_npy(&mut cursor) {
            return Self::array_to_cube(array);
        }

        Err(LoaderError::new(
            "Failed to read NumPy array: unsupported dtype or invalid format",
        )
        .with_loader(self.id()))
    }

    fn priority(&self) -> i32 {
        // Scientific data first
        10
    }
}
