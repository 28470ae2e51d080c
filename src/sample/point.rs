//! Point sampling.

use crate::cube::Cube;
use crate::error::{Result, SpectraError};
use crate::waveform::Waveform;

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplePoint {
    /// Pixel row
    pub row: usize,
    /// Pixel column
    pub column: usize,
}

impl SamplePoint {
    /// Create a point.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Check the point lies inside `cube`.
    pub fn check_bounds(&self, cube: &Cube) -> Result<()> {
        if self.row >= cube.rows() {
            return Err(SpectraError::out_of_bounds("row", self.row, cube.rows()));
        }
        if self.column >= cube.columns() {
            return Err(SpectraError::out_of_bounds(
                "column",
                self.column,
                cube.columns(),
            ));
        }
        Ok(())
    }
}

/// Full spectrum at each point, in input order.
pub fn sample_all(cube: &Cube, points: &[SamplePoint]) -> Result<Vec<Waveform>> {
    points
        .iter()
        .map(|point| {
            point.check_bounds(cube)?;
            Ok(Waveform::from(cube.pixel(point.row, point.column).to_owned()))
        })
        .collect()
}

/// Spectrum at each point restricted to `bands`, in the order given.
pub fn sample_subset(cube: &Cube, points: &[SamplePoint], bands: &[usize]) -> Result<Vec<Waveform>> {
    if let Some(&bad) = bands.iter().find(|&&b| b >= cube.band_count()) {
        return Err(SpectraError::out_of_bounds("band", bad, cube.band_count()));
    }

    let full = sample_all(cube, points)?;
    Ok(full
        .iter()
        .map(|waveform| {
            let values = waveform.values();
            Waveform::new(bands.iter().map(|&b| values[b]).collect())
        })
        .collect())
}

/// Pair a flat `x1 y1 x2 y2 ...` stream into points.
///
/// A trailing value without a partner is dropped.
pub fn parse_points_to_pairs(values: &[usize]) -> Vec<SamplePoint> {
    if values.len() % 2 != 0 {
        log::warn!(
            "Odd number of coordinates ({}), ignoring the last one",
            values.len()
        );
    }
    values
        .chunks_exact(2)
        .map(|pair| SamplePoint::new(pair[0], pair[1]))
        .collect()
}

/// Parse a whitespace separated list of non-negative integers.
pub fn parse_int_list(text: &str) -> Result<Vec<usize>> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token.parse::<usize>().map_err(|_| {
                SpectraError::parse(1, format!("item {}: '{}' is not an index", i + 1, token))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Cube {
        Cube::from_fn(4, 3, 5, |(r, c, b)| (r * 100 + c * 10 + b) as f64)
    }

    #[test]
    fn test_sample_all_in_order() {
        let points = [SamplePoint::new(3, 2), SamplePoint::new(0, 1)];
        let samples = sample_all(&cube(), &points).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].values(), &[320.0, 321.0, 322.0, 323.0, 324.0]);
        assert_eq!(samples[1].values(), &[10.0, 11.0, 12.0, 13.0, 14.0]);
    }

    #[test]
    fn test_sample_subset_matches_full() {
        let cube = cube();
        let points = [
            SamplePoint::new(1, 1),
            SamplePoint::new(2, 0),
            SamplePoint::new(3, 2),
        ];
        let bands = [4, 0, 2, 2];
        let full = sample_all(&cube, &points).unwrap();
        let subset = sample_subset(&cube, &points, &bands).unwrap();

        for (p, reduced) in subset.iter().enumerate() {
            assert_eq!(reduced.len(), bands.len());
            for (k, &band) in bands.iter().enumerate() {
                assert_eq!(reduced.values()[k], full[p].values()[band]);
            }
        }
    }

    #[test]
    fn test_sample_out_of_bounds() {
        let cube = cube();
        assert_eq!(
            sample_all(&cube, &[SamplePoint::new(4, 0)]),
            Err(SpectraError::out_of_bounds("row", 4, 4))
        );
        assert_eq!(
            sample_all(&cube, &[SamplePoint::new(0, 0), SamplePoint::new(0, 3)]),
            Err(SpectraError::out_of_bounds("column", 3, 3))
        );
        assert_eq!(
            sample_subset(&cube, &[SamplePoint::new(0, 0)], &[1, 5]),
            Err(SpectraError::out_of_bounds("band", 5, 5))
        );
    }

    #[test]
    fn test_sample_no_points() {
        assert!(sample_all(&cube(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_points_pairs() {
        assert_eq!(
            parse_points_to_pairs(&[1, 2, 3, 4]),
            vec![SamplePoint::new(1, 2), SamplePoint::new(3, 4)]
        );
    }

    #[test]
    fn test_parse_points_drops_trailing_value() {
        assert_eq!(
            parse_points_to_pairs(&[5, 6, 7]),
            vec![SamplePoint::new(5, 6)]
        );
        assert!(parse_points_to_pairs(&[9]).is_empty());
    }

    #[test]
    fn test_parse_int_list() {
        assert_eq!(parse_int_list(" 10 20\t30 ").unwrap(), vec![10, 20, 30]);
        assert!(parse_int_list("").unwrap().is_empty());
        assert!(matches!(
            parse_int_list("1 x"),
            Err(SpectraError::Parse { .. })
        ));
        assert!(parse_int_list("-1").is_err());
    }
}
