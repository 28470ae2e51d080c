//! Trait-based loading of bare cube files.
//!
//! Bare files hold pixel data only; band metadata comes from a header
//! (see [`crate::data::CubeStore`]) or is absent.
//!
//! ## Supported Formats
//!
//! - **NumPy Arrays**: `.npy` files with 2D `(rows, columns)` or 3D
//!   `(rows, columns, bands)` arrays
//! - **Standard Images**: PNG, JPEG, BMP, TIFF, WebP (3-band RGB)

use crate::cube::Cube;

/// Error type for loader operations.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderError {
    /// Human-readable error message.
    pub message: String,
    /// The loader that produced this error (if known).
    pub loader_id: Option<&'static str>,
}

impl LoaderError {
    /// Create a new loader error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            loader_id: None,
        }
    }

    /// Create an error with loader context.
    pub fn with_loader(mut self, loader_id: &'static str) -> Self {
        self.loader_id = Some(loader_id);
        self
    }
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.loader_id {
            Some(loader) => write!(f, "[{}] {}", loader, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for LoaderError {}

/// A decoder from raw file bytes to a [`Cube`].
pub trait CubeLoader: Send + Sync {
    /// Unique identifier for this loader (e.g., "npy", "image").
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn display_name(&self) -> &'static str;

    /// File extensions this loader handles (lowercase, without dots).
    fn extensions(&self) -> &'static [&'static str];

    /// Check magic bytes to see whether this loader can handle `data`.
    fn can_load(&self, data: &[u8]) -> bool;

    /// Decode `data` into a cube.
    fn load(&self, data: &[u8]) -> Result<Cube, LoaderError>;

    /// Priority for format detection (higher = checked first).
    fn priority(&self) -> i32 {
        0
    }
}

/// Registry of available cube loaders.
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn CubeLoader>>,
}

impl LoaderRegistry {
    /// Create a registry with the built-in loaders.
    pub fn new() -> Self {
        let mut registry = Self {
            loaders: Vec::new(),
        };
        registry.register(Box::new(super::loaders::ImageLoader));
        registry.register(Box::new(super::loaders::NpyLoader));
        registry
    }

    /// Register a loader, keeping the list sorted by priority.
    pub fn register(&mut self, loader: Box<dyn CubeLoader>) {
        self.loaders.push(loader);
        self.loaders.sort_by_key(|l| std::cmp::Reverse(l.priority()));
    }

    /// Decode `data`, choosing a loader by extension, then by magic bytes.
    pub fn load(&self, data: &[u8], filename: Option<&str>) -> Result<Cube, LoaderError> {
        let extension = filename
            .and_then(|f| f.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase());

        if let Some(ext) = extension.as_deref() {
            for loader in self
                .loaders
                .iter()
                .filter(|l| l.extensions().iter().any(|e| *e == ext))
            {
                match loader.load(data) {
                    Ok(cube) => {
                        log::debug!("Loaded as {} (by extension)", loader.display_name());
                        return Ok(cube);
                    }
                    Err(e) => log::trace!("Loader {} failed: {}", loader.id(), e),
                }
            }
        }

        if let Some(loader) = self.loaders.iter().find(|l| l.can_load(data)) {
            return loader
                .load(data)
                .inspect(|_| log::debug!("Loaded as {} (by detection)", loader.display_name()))
                .map_err(|e| e.with_loader(loader.id()));
        }

        Err(LoaderError::new(format!(
            "No loader could handle the data{}",
            filename
                .map(|f| format!(" (file: {})", f))
                .unwrap_or_default()
        )))
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
