//! Loading and saving hyperspectral cubes.
//!
//! This module provides:
//! - `ImageStore`: the interface the processing code uses to get cubes and
//!   band metadata in and out of files
//! - `CubeStore`: a store over a JSON header next to a NumPy data file
//! - `LoaderRegistry`: extensible loading of bare files (NumPy arrays,
//!   standard images) that carry no band metadata
//!
//! ## Adding New Formats
//!
//! To add support for a new raw format (e.g., ENVI BSQ, HDF5):
//!
//! 1. Create a new loader in `loaders/` implementing `CubeLoader`
//! 2. Register it in `LoaderRegistry::new()`
//!
//! ```rust,ignore
//! use hspt::data::{CubeLoader, LoaderError};
//! use hspt::cube::Cube;
//!
//! pub struct MyFormatLoader;
//!
//! impl CubeLoader for MyFormatLoader {
//!     fn id(&self) -> &'static str { "myformat" }
//!     fn display_name(&self) -> &'static str { "My Format" }
//!     fn extensions(&self) -> &'static [&'static str] { &["myf"] }
//!     fn can_load(&self, data: &[u8]) -> bool { /* check magic bytes */ }
//!     fn load(&self, data: &[u8]) -> Result<Cube, LoaderError> { /* ... */ }
//! }
//! ```

mod error;
mod loader;
pub mod loaders;
mod store;

pub use error::StoreError;
pub use loader::{CubeLoader, LoaderError, LoaderRegistry};
pub use store::{CubeHeader, CubeStore, DataExtension, HEADER_EXTENSION, ImageStore, SaveOptions};
