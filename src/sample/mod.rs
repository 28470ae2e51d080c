//! Extracting spectra from a cube at points and over rectangular regions.
//!
//! Coordinates follow the cube layout: a [`SamplePoint`] addresses
//! `(row, column)`, and flat coordinate strings such as `"x1 y1 x2 y2"`
//! map `x` to the row and `y` to the column.

pub mod point;
pub mod region;

pub use point::{SamplePoint, parse_int_list, parse_points_to_pairs, sample_all, sample_subset};
pub use region::{Region, extract_region, mean_over_regions, mean_spectrum, parse_regions};
