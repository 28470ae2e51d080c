//! Averaging and differencing waveforms.

use crate::error::{Result, SpectraError};
use crate::waveform::{Waveform, WaveformDataset};

/// Elementwise mean of every waveform in the dataset.
pub fn average(dataset: &WaveformDataset) -> Result<Waveform> {
    average_waveforms(dataset.waveforms())
}

/// Elementwise mean of a list of equal-length waveforms.
pub fn average_waveforms(waveforms: &[Waveform]) -> Result<Waveform> {
    let first = waveforms
        .first()
        .ok_or(SpectraError::EmptyInput("no waveforms to average"))?;

    let mut sum = vec![0.0; first.len()];
    for waveform in waveforms {
        if waveform.len() != sum.len() {
            return Err(SpectraError::shape_mismatch(
                "waveform length",
                sum.len(),
                waveform.len(),
            ));
        }
        for (total, value) in sum.iter_mut().zip(waveform.values()) {
            *total += value;
        }
    }

    let count = waveforms.len() as f64;
    Ok(Waveform::new(sum.into_iter().map(|s| s / count).collect()))
}

/// Result of [`difference`].
#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    /// `|a - b|` per band.
    Absolute(Waveform),
    /// `a - b` split for two-colour plotting.
    Split {
        /// Positive differences, zero elsewhere.
        positive: Waveform,
        /// Negative differences, zero elsewhere.
        negative: Waveform,
    },
}

impl Difference {
    /// The resulting waveforms in plotting order.
    pub fn into_waveforms(self) -> Vec<Waveform> {
        match self {
            Self::Absolute(waveform) => vec![waveform],
            Self::Split { positive, negative } => vec![positive, negative],
        }
    }
}

/// Elementwise `a - b`.
///
/// When the inputs differ in length only the shared prefix is compared;
/// the tail of the longer waveform is dropped without an error.
pub fn difference(a: &Waveform, b: &Waveform, use_absolute: bool) -> Difference {
    if a.len() != b.len() {
        log::warn!(
            "Differencing waveforms of length {} and {}, truncating to {}",
            a.len(),
            b.len(),
            a.len().min(b.len())
        );
    }
    let deltas = a.values().iter().zip(b.values()).map(|(x, y)| x - y);

    if use_absolute {
        return Difference::Absolute(deltas.map(f64::abs).collect::<Vec<_>>().into());
    }

    let (positive, negative): (Vec<f64>, Vec<f64>) = deltas
        .map(|d| if d > 0.0 { (d, 0.0) } else { (0.0, d) })
        .unzip();
    Difference::Split {
        positive: positive.into(),
        negative: negative.into(),
    }
}
