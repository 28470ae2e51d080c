//! Built-in cube loaders.
//!
//! Implementations of the `CubeLoader` trait for bare data files.

mod image_loader;
mod npy_loader;

pub use image_loader::ImageLoader;
pub use npy_loader::NpyLoader;
