//! Region sampling.
//!
//! A region is reduced to its mean spectrum. Several regions are combined
//! by averaging their means, so a 2x2 patch counts as much as a 50x50 one.
//! That weighting is deliberate and callers comparing plots made with the
//! old tools rely on it.

use ndarray::{ArrayView3, Axis, Ix3, SliceInfo, SliceInfoElem, s};

use crate::cube::Cube;
use crate::error::{Result, SpectraError};
use crate::sample::point::SamplePoint;
use crate::waveform::{Waveform, average_waveforms};

/// A rectangle of pixels anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Top-left pixel
    pub anchor: SamplePoint,
    /// Extent in columns
    pub width: usize,
    /// Extent in rows
    pub height: usize,
}

impl Region {
    /// Create a region at `(row, column)` spanning `width` columns and
    /// `height` rows.
    pub fn new(row: usize, column: usize, width: usize, height: usize) -> Self {
        Self {
            anchor: SamplePoint::new(row, column),
            width,
            height,
        }
    }

    /// Number of pixels covered.
    pub fn pixel_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Check the region is non-empty and lies inside `cube`.
    pub fn check_bounds(&self, cube: &Cube) -> Result<()> {
        if self.width == 0 {
            return Err(SpectraError::out_of_bounds("region width", 0, cube.columns()));
        }
        if self.height == 0 {
            return Err(SpectraError::out_of_bounds("region height", 0, cube.rows()));
        }
        self.anchor.check_bounds(cube)?;

        let SamplePoint { row, column } = self.anchor;
        row.checked_add(self.height)
            .filter(|&end| end <= cube.rows())
            .ok_or_else(|| {
                SpectraError::out_of_bounds(
                    "region bottom",
                    row.saturating_add(self.height),
                    cube.rows() + 1,
                )
            })?;
        column
            .checked_add(self.width)
            .filter(|&end| end <= cube.columns())
            .ok_or_else(|| {
                SpectraError::out_of_bounds(
                    "region right edge",
                    column.saturating_add(self.width),
                    cube.columns() + 1,
                )
            })?;
        Ok(())
    }

    pub(crate) fn slice_info(&self) -> SliceInfo<[SliceInfoElem; 3], Ix3, Ix3> {
        let SamplePoint { row, column } = self.anchor;
        s![row..row + self.height, column..column + self.width, ..]
    }
}

/// Slice out the pixels of `region`, shape `(height, width, bands)`.
pub fn extract_region<'a>(cube: &'a Cube, region: &Region) -> Result<ArrayView3<'a, f64>> {
    region.check_bounds(cube)?;
    Ok(cube.view().slice_move(region.slice_info()))
}

/// Per-band mean over every pixel of a sub-cube.
///
/// The sub-cube must have at least one pixel.
pub fn mean_spectrum(sub_cube: ArrayView3<'_, f64>) -> Waveform {
    let bands = sub_cube.dim().2;
    let pixels = sub_cube.dim().0 * sub_cube.dim().1;
    let sum = sub_cube.sum_axis(Axis(0)).sum_axis(Axis(0));
    debug_assert_eq!(sum.len(), bands);
    Waveform::from(sum / pixels as f64)
}

/// Mean of the per-region mean spectra, each region weighted equally.
pub fn mean_over_regions(cube: &Cube, regions: &[Region]) -> Result<Waveform> {
    if regions.is_empty() {
        return Err(SpectraError::EmptyInput("no regions to average"));
    }

    let means = regions
        .iter()
        .map(|region| extract_region(cube, region).map(mean_spectrum))
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Averaging {} regions covering {} pixels",
        regions.len(),
        regions.iter().map(Region::pixel_count).sum::<usize>()
    );
    average_waveforms(&means)
}

/// Group a flat `row column width height ...` stream into regions.
///
/// A trailing incomplete group is dropped, matching the point parser.
pub fn parse_regions(values: &[usize]) -> Vec<Region> {
    if values.len() % 4 != 0 {
        log::warn!(
            "Region list has {} values, ignoring the last {}",
            values.len(),
            values.len() % 4
        );
    }
    values
        .chunks_exact(4)
        .map(|q| Region::new(q[0], q[1], q[2], q[3]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube() -> Cube {
        Cube::from_fn(6, 8, 3, |(r, c, b)| (r * 8 + c) as f64 + b as f64 * 1000.0)
    }

    #[test]
    fn test_extract_region_shape_and_values() {
        let cube = cube();
        let region = Region::new(1, 2, 3, 2);
        let sub = extract_region(&cube, &region).unwrap();

        assert_eq!(sub.dim(), (2, 3, 3));
        assert_eq!(sub[[0, 0, 0]], cube.get(1, 2, 0).unwrap());
        assert_eq!(sub[[1, 2, 2]], cube.get(2, 4, 2).unwrap());
    }

    #[test]
    fn test_extract_region_bounds() {
        let cube = cube();
        assert!(extract_region(&cube, &Region::new(0, 0, 8, 6)).is_ok());
        assert!(matches!(
            extract_region(&cube, &Region::new(5, 0, 1, 2)),
            Err(SpectraError::OutOfBounds { what: "region bottom", .. })
        ));
        assert!(matches!(
            extract_region(&cube, &Region::new(0, 6, 3, 1)),
            Err(SpectraError::OutOfBounds { what: "region right edge", .. })
        ));
        assert!(extract_region(&cube, &Region::new(6, 0, 1, 1)).is_err());
        assert!(extract_region(&cube, &Region::new(0, 0, 0, 1)).is_err());
        assert!(extract_region(&cube, &Region::new(0, 0, 1, 0)).is_err());
    }

    #[test]
    fn test_huge_region_size_is_out_of_bounds() {
        let cube = Cube::zeros(4, 4, 2);
        assert_eq!(
            extract_region(&cube, &Region::new(0, 1, usize::MAX, 1)),
            Err(SpectraError::out_of_bounds("region right edge", usize::MAX, 5))
        );
        assert_eq!(
            extract_region(&cube, &Region::new(1, 0, 1, usize::MAX)),
            Err(SpectraError::out_of_bounds("region bottom", usize::MAX, 5))
        );
        assert!(mean_over_regions(&cube, &[Region::new(2, 2, usize::MAX, usize::MAX)]).is_err());
    }

    #[test]
    fn test_mean_spectrum() {
        let cube = cube();
        let sub = extract_region(&cube, &Region::new(0, 0, 2, 2)).unwrap();
        // Pixels 0, 1, 8, 9 average to 4.5 in band 0.
        let mean = mean_spectrum(sub);
        assert_eq!(mean.values(), &[4.5, 1004.5, 2004.5]);
    }

    #[test]
    fn test_single_pixel_region_equals_pixel() {
        let cube = cube();
        let mean = mean_over_regions(&cube, &[Region::new(3, 5, 1, 1)]).unwrap();
        assert_eq!(mean.values(), cube.pixel(3, 5).as_slice().unwrap());
    }

    #[test]
    fn test_regions_weighted_equally() {
        let cube = Cube::from_fn(4, 4, 1, |(r, _, _)| if r == 0 { 10.0 } else { 0.0 });
        // One pixel of 10 and a 3x4 block of zeros.
        let regions = [Region::new(0, 0, 1, 1), Region::new(1, 0, 4, 3)];
        let mean = mean_over_regions(&cube, &regions).unwrap();
        assert_relative_eq!(mean.values()[0], 5.0);

        // A pooled mean would give 10 / 13 instead.
        assert!((mean.values()[0] - 10.0 / 13.0).abs() > 1.0);
    }

    #[test]
    fn test_mean_over_no_regions() {
        assert_eq!(
            mean_over_regions(&cube(), &[]),
            Err(SpectraError::EmptyInput("no regions to average"))
        );
    }

    #[test]
    fn test_mean_over_regions_propagates_bounds_error() {
        let regions = [Region::new(0, 0, 2, 2), Region::new(5, 7, 2, 2)];
        assert!(mean_over_regions(&cube(), &regions).is_err());
    }

    #[test]
    fn test_parse_regions() {
        assert_eq!(
            parse_regions(&[1, 2, 3, 4, 5, 6, 7, 8, 9]),
            vec![Region::new(1, 2, 3, 4), Region::new(5, 6, 7, 8)]
        );
    }
}
