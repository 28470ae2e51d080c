//! Point picking sessions.
//!
//! A picker collects pixel coordinates from some outside source (a window,
//! a replay file, stdin) into a [`PickSession`]. The session is owned by
//! whoever runs the pick and hands its points back exactly once.

use std::io::BufRead;

use crate::cube::HyperspectralImage;
use crate::error::SpectraError;
use crate::sample::{SamplePoint, sample_all};
use crate::waveform::WaveformDataset;

/// Accumulates clicks for one picking session.
///
/// Clicks use screen axes: `x` is the column and `y` the row. The older
/// Python picking tool indexed the cube as `[x, y]`, i.e. it treated `x` as
/// the row. Point lists and waveform CSVs produced by that tool therefore
/// have row and column swapped relative to this session.
#[derive(Debug, Default)]
pub struct PickSession {
    points: Vec<SamplePoint>,
}

impl PickSession {
    /// Start an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click at screen position `(x, y)`: `x` is the column and
    /// `y` the row.
    pub fn record_click(&mut self, x: usize, y: usize) {
        log::debug!("Click at x={}, y={}", x, y);
        self.points.push(SamplePoint::new(y, x));
    }

    /// Clicks recorded so far.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True before the first click.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// End the session and take its points, in click order.
    pub fn finish(self) -> Vec<SamplePoint> {
        log::info!("Picking finished with {} points", self.points.len());
        self.points
    }
}

/// Something that lets a user choose pixels on an image.
pub trait PointPicker {
    /// Run a session over `image` and return the chosen points.
    fn pick_points(&mut self, image: &HyperspectralImage) -> std::io::Result<Vec<SamplePoint>>;
}

/// Replays `x y` lines from a reader as clicks.
///
/// Blank lines and lines starting with `#` are ignored. Malformed lines are
/// skipped with a warning. The session ends at end of input or on a line
/// reading `done`.
pub struct LinePicker<R> {
    reader: R,
}

impl<R: BufRead> LinePicker<R> {
    /// Read clicks from `reader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> PointPicker for LinePicker<R> {
    fn pick_points(&mut self, _image: &HyperspectralImage) -> std::io::Result<Vec<SamplePoint>> {
        let mut session = PickSession::new();
        let mut line = String::new();
        let mut line_number = 0;

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;

            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            if text.eq_ignore_ascii_case("done") {
                break;
            }

            let coords: Vec<&str> = text
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .collect();
            match coords.as_slice() {
                [x, y] => match (x.parse::<usize>(), y.parse::<usize>()) {
                    (Ok(x), Ok(y)) => session.record_click(x, y),
                    _ => log::warn!("Line {}: '{}' is not a pixel position", line_number, text),
                },
                _ => log::warn!("Line {}: expected 'x y', got '{}'", line_number, text),
            }
        }

        Ok(session.finish())
    }
}

/// Errors from [`select_points`].
#[derive(Debug, thiserror::Error)]
pub enum PickError {
    /// The picker failed to read input
    #[error("Picking failed: {0}")]
    Io(#[from] std::io::Error),
    /// A picked point could not be sampled
    #[error(transparent)]
    Spectra(#[from] SpectraError),
}

/// Let the user pick points on `image` and sample the full spectrum at each.
///
/// The band table falls back to band numbers when the image has no
/// wavelengths.
pub fn select_points(
    image: &HyperspectralImage,
    picker: &mut dyn PointPicker,
) -> Result<WaveformDataset, PickError> {
    let points = picker.pick_points(image)?;
    if points.is_empty() {
        log::warn!("No points were picked");
    }
    let waveforms = sample_all(&image.cube, &points)?;
    Ok(WaveformDataset::new(image.band_table(), waveforms)?)
}
