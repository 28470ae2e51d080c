//! Header + data file cube storage.
//!
//! A stored cube is two files side by side:
//!
//! ```text
//! leaf_a.hdr   JSON header: shape, data file name, band metadata
//! leaf_a.img   NumPy array (rows, columns, bands), f32
//! ```
//!
//! Any path that is not a `.hdr` header is handed to the
//! [`LoaderRegistry`] and comes back without band metadata.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ndarray::Array3;
use ndarray_npy::WriteNpyExt;
use serde::{Deserialize, Serialize};

use crate::cube::{BandMetadata, Cube, HyperspectralImage};
use crate::data::{LoaderRegistry, StoreError};

/// Extension used for header files.
pub const HEADER_EXTENSION: &str = "hdr";

/// Access to cubes and their band metadata on disk.
pub trait ImageStore {
    /// Load a cube with whatever band metadata is available.
    fn load(&self, path: &Path) -> Result<HyperspectralImage, StoreError>;

    /// Save `image` to `path`, returning the paths written.
    fn save_cube(
        &self,
        path: &Path,
        image: &HyperspectralImage,
        options: &SaveOptions,
    ) -> Result<Vec<PathBuf>, StoreError>;

    /// Load only the cube.
    fn load_cube(&self, path: &Path) -> Result<Cube, StoreError> {
        Ok(self.load(path)?.cube)
    }

    /// Band center wavelengths, if the file has them.
    fn load_band_table(&self, path: &Path) -> Result<Option<Vec<f64>>, StoreError> {
        Ok(self.load(path)?.metadata.centers)
    }

    /// Band widths, if the file has them.
    fn load_band_widths(&self, path: &Path) -> Result<Option<Vec<f64>>, StoreError> {
        Ok(self.load(path)?.metadata.widths)
    }
}

/// Extension of the data file written next to a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataExtension {
    /// `.img`
    #[default]
    Img,
    /// `.dat`
    Dat,
    /// `.raw`
    Raw,
    /// `.bin`
    Bin,
}

impl DataExtension {
    /// Extension without the dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Img => "img",
            Self::Dat => "dat",
            Self::Raw => "raw",
            Self::Bin => "bin",
        }
    }

    /// All recognized extensions.
    pub fn all() -> &'static [DataExtension] {
        &[Self::Img, Self::Dat, Self::Raw, Self::Bin]
    }
}

impl FromStr for DataExtension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim_start_matches('.').to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|ext| ext.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown data extension '{}' (expected one of: img, dat, raw, bin)",
                    s
                )
            })
    }
}

impl std::fmt::Display for DataExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for saving cubes.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Extension of the data file.
    pub extension: DataExtension,
    /// Free text stored in the header.
    pub description: Option<String>,
}

impl SaveOptions {
    /// Create new save options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data file extension.
    pub fn extension(mut self, extension: DataExtension) -> Self {
        self.extension = extension;
        self
    }

    /// Set the header description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Contents of a `.hdr` header file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeHeader {
    /// Pixel rows
    pub rows: usize,
    /// Pixel columns
    pub columns: usize,
    /// Spectral bands
    pub bands: usize,
    /// Data file name, relative to the header
    pub data_file: String,
    /// Band center wavelengths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wavelengths: Option<Vec<f64>>,
    /// Band widths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidths: Option<Vec<f64>>,
    /// Free text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CubeHeader {
    /// Check metadata lengths against the band count.
    fn validate(&self, path: &Path) -> Result<(), StoreError> {
        for (name, values) in [
            ("wavelengths", &self.wavelengths),
            ("bandwidths", &self.bandwidths),
        ] {
            if let Some(values) = values
                && values.len() != self.bands
            {
                return Err(StoreError::invalid_header(
                    path,
                    format!(
                        "{} has {} entries for {} bands",
                        name,
                        values.len(),
                        self.bands
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// The default [`ImageStore`]: JSON headers over NumPy data files, plus
/// bare files through the loader registry.
#[derive(Default)]
pub struct CubeStore {
    registry: LoaderRegistry,
}

impl CubeStore {
    /// Create a store with the built-in loaders.
    pub fn new() -> Self {
        Self::default()
    }

    fn is_header(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(HEADER_EXTENSION))
    }

    fn load_bare(&self, path: &Path) -> Result<Cube, StoreError> {
        let bytes = std::fs::read(path)?;
        let filename = path.file_name().and_then(|f| f.to_str());
        Ok(self.registry.load(&bytes, filename)?)
    }

    fn load_with_header(&self, path: &Path) -> Result<HyperspectralImage, StoreError> {
        let header: CubeHeader = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        header.validate(path)?;

        let data_path = path.with_file_name(&header.data_file);
        let cube = self.load_bare(&data_path)?;
        let expected = (header.rows, header.columns, header.bands);
        if cube.dim() != expected {
            return Err(StoreError::invalid_header(
                path,
                format!(
                    "header declares {:?} but {:?} holds {:?}",
                    expected,
                    data_path,
                    cube.dim()
                ),
            ));
        }

        Ok(HyperspectralImage {
            cube,
            metadata: BandMetadata {
                centers: header.wavelengths,
                widths: header.bandwidths,
            },
        })
    }
}

impl ImageStore for CubeStore {
    fn load(&self, path: &Path) -> Result<HyperspectralImage, StoreError> {
        let image = if Self::is_header(path) {
            self.load_with_header(path)?
        } else {
            HyperspectralImage::new(self.load_bare(path)?)
        };
        let (rows, columns, bands) = image.cube.dim();
        log::info!(
            "Loaded {:?}: {}x{} with {} bands{}",
            path,
            rows,
            columns,
            bands,
            if image.metadata.centers.is_some() {
                ""
            } else {
                " (no wavelengths)"
            }
        );
        Ok(image)
    }

    fn save_cube(
        &self,
        path: &Path,
        image: &HyperspectralImage,
        options: &SaveOptions,
    ) -> Result<Vec<PathBuf>, StoreError> {
        let header_path = path.with_extension(HEADER_EXTENSION);
        let data_path = path.with_extension(options.extension.as_str());
        let data_file = data_path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| StoreError::invalid_header(path, "output path has no file name"))?
            .to_string();

        let (rows, columns, bands) = image.cube.dim();
        let header = CubeHeader {
            rows,
            columns,
            bands,
            data_file,
            wavelengths: image.metadata.centers.clone(),
            bandwidths: image.metadata.widths.clone(),
            description: options.description.clone(),
        };
        header.validate(&header_path)?;

        if let Some(parent) = header_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let data: Array3<f32> = image.cube.view().mapv(|v| v as f32);
        data.write_npy(BufWriter::new(File::create(&data_path)?))?;
        std::fs::write(&header_path, serde_json::to_string_pretty(&header)?)?;

        log::info!("Saved {}x{}x{} cube to {:?}", rows, columns, bands, header_path);
        Ok(vec![header_path, data_path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leaf_image() -> HyperspectralImage {
        HyperspectralImage::new(Cube::from_fn(3, 4, 5, |(r, c, b)| {
            0.01 * (r * 20 + c * 5 + b) as f64
        }))
        .with_centers(vec![400.0, 410.0, 420.0, 430.0, 440.0])
        .with_widths(vec![1.5, 1.5, 2.0, 2.0, 2.5])
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CubeStore::new();
        let image = leaf_image();

        let written = store
            .save_cube(&dir.path().join("leaf.hdr"), &image, &SaveOptions::new())
            .unwrap();
        assert_eq!(written[0], dir.path().join("leaf.hdr"));
        assert_eq!(written[1], dir.path().join("leaf.img"));

        let loaded = store.load(&written[0]).unwrap();
        assert_eq!(loaded.metadata, image.metadata);
        assert_eq!(loaded.cube.dim(), image.cube.dim());
        for ((r, c, b), &value) in image.cube.view().indexed_iter() {
            assert_relative_eq!(loaded.cube.get(r, c, b).unwrap(), value, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_save_with_extension_and_description() {
        let dir = tempfile::tempdir().unwrap();
        let store = CubeStore::new();
        let options = SaveOptions::new()
            .extension(DataExtension::Raw)
            .description("gain adjusted");

        let written = store
            .save_cube(&dir.path().join("out.hdr"), &leaf_image(), &options)
            .unwrap();
        assert_eq!(written[1], dir.path().join("out.raw"));

        let header: CubeHeader =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(header.data_file, "out.raw");
        assert_eq!(header.description.as_deref(), Some("gain adjusted"));
        assert!(store.load(&written[0]).is_ok());
    }

    #[test]
    fn test_accessors() {
        let dir = tempfile::tempdir().unwrap();
        let store = CubeStore::new();
        let path = dir.path().join("leaf.hdr");
        store.save_cube(&path, &leaf_image(), &SaveOptions::new()).unwrap();

        assert_eq!(store.load_cube(&path).unwrap().dim(), (3, 4, 5));
        assert_eq!(store.load_band_table(&path).unwrap().unwrap()[4], 440.0);
        assert_eq!(store.load_band_widths(&path).unwrap().unwrap()[2], 2.0);
    }

    #[test]
    fn test_bare_npy_has_no_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.npy");
        let array = Array3::<f32>::ones((2, 2, 3));
        array.write_npy(File::create(&path).unwrap()).unwrap();

        let image = CubeStore::new().load(&path).unwrap();
        assert_eq!(image.cube.dim(), (2, 2, 3));
        assert_eq!(image.metadata, BandMetadata::default());
    }

    #[test]
    fn test_header_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let store = CubeStore::new();
        let path = dir.path().join("leaf.hdr");
        store.save_cube(&path, &leaf_image(), &SaveOptions::new()).unwrap();

        let mut header: CubeHeader =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        header.rows = 7;
        std::fs::write(&path, serde_json::to_string(&header).unwrap()).unwrap();

        assert!(matches!(
            store.load(&path),
            Err(StoreError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_metadata_length_checked_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let image = HyperspectralImage::new(Cube::zeros(1, 1, 3)).with_centers(vec![400.0]);
        let result =
            CubeStore::new().save_cube(&dir.path().join("bad.hdr"), &image, &SaveOptions::new());
        assert!(matches!(result, Err(StoreError::InvalidHeader { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = CubeStore::new().load(Path::new("/nonexistent/leaf.hdr"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn test_data_extension_parse() {
        assert_eq!("dat".parse::<DataExtension>(), Ok(DataExtension::Dat));
        assert_eq!(".RAW".parse::<DataExtension>(), Ok(DataExtension::Raw));
        assert!("tiff".parse::<DataExtension>().is_err());
        assert_eq!(DataExtension::default().to_string(), "img");
    }
}
