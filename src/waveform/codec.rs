//! CSV serialization of waveform datasets.
//!
//! The first row holds the band table, every following row one waveform.
//! Values are written with Rust's shortest round-trip float formatting so
//! reading a file back reproduces the same numbers. Reading and writing go
//! through the `csv` crate with headers off, since the header row is data.

use std::io;
use std::path::Path;

use crate::bands::BandTable;
use crate::error::{Result, SpectraError};
use crate::waveform::{Waveform, WaveformDataset};

/// Quote character. Numeric cells never need quoting; `|` is what older
/// waveform files were written with.
const QUOTE: u8 = b'|';

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.has_headers(false).quote(QUOTE);
    builder
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .quote(QUOTE)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

/// Render a dataset as CSV text.
pub fn serialize(dataset: &WaveformDataset) -> std::result::Result<String, WaveformFileError> {
    let mut writer = writer_builder().from_writer(Vec::new());
    write_records(&mut writer, dataset)?;
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    String::from_utf8(bytes)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

fn write_records<W: io::Write>(
    writer: &mut csv::Writer<W>,
    dataset: &WaveformDataset,
) -> csv::Result<()> {
    writer.write_record(dataset.bands().centers().iter().map(f64::to_string))?;
    for waveform in dataset.waveforms() {
        writer.write_record(waveform.values().iter().map(f64::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse CSV text back into a dataset.
///
/// The first non-blank row is the band table; a header of exactly
/// `1,2,...,n` is read as unknown wavelengths. Errors carry the 1-based
/// line number of the offending row.
pub fn deserialize(text: &str) -> Result<WaveformDataset> {
    let mut reader = reader_builder().from_reader(text.as_bytes());
    let mut rows = reader
        .records()
        .map(|record| {
            record.map_err(|err| {
                let line = err.position().map_or(1, |p| p.line() as usize);
                SpectraError::parse(line, err.to_string())
            })
        })
        .filter(|record| match record {
            Ok(record) => !record.iter().all(str::is_empty),
            Err(_) => true,
        });

    let header = rows
        .next()
        .ok_or_else(|| SpectraError::parse(1, "missing band header row"))??;
    let centers = parse_row(&header)?;
    let columns = centers.len();

    let mut waveforms = Vec::new();
    for record in rows {
        let record = record?;
        let values = parse_row(&record)?;
        if values.len() != columns {
            return Err(SpectraError::parse(
                line_of(&record),
                format!("expected {} columns, found {}", columns, values.len()),
            ));
        }
        waveforms.push(Waveform::new(values));
    }

    log::debug!(
        "Parsed waveform table with {} bands and {} waveforms",
        columns,
        waveforms.len()
    );
    WaveformDataset::new(band_table_from_header(centers), waveforms)
}

fn line_of(record: &csv::StringRecord) -> usize {
    record.position().map_or(1, |p| p.line() as usize)
}

fn parse_row(record: &csv::StringRecord) -> Result<Vec<f64>> {
    record
        .iter()
        .enumerate()
        .map(|(column, cell)| {
            cell.parse::<f64>().map_err(|_| {
                SpectraError::parse(
                    line_of(record),
                    format!("column {}: '{}' is not a number", column + 1, cell),
                )
            })
        })
        .collect()
}

fn band_table_from_header(centers: Vec<f64>) -> BandTable {
    let sequential = centers
        .iter()
        .enumerate()
        .all(|(i, &center)| center == (i + 1) as f64);
    if sequential {
        BandTable::Sequential(centers.len())
    } else {
        BandTable::Wavelengths(centers)
    }
}

/// Errors reading or writing waveform files.
#[derive(Debug, thiserror::Error)]
pub enum WaveformFileError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The CSV writer failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Malformed file content
    #[error(transparent)]
    Spectra(#[from] SpectraError),
}

/// Read a waveform CSV file.
pub fn read_dataset(path: &Path) -> std::result::Result<WaveformDataset, WaveformFileError> {
    let text = std::fs::read_to_string(path)?;
    let dataset = deserialize(&text)?;
    log::info!(
        "Read {} waveforms ({} bands) from {:?}",
        dataset.len(),
        dataset.bands().len(),
        path
    );
    Ok(dataset)
}

/// Write a waveform CSV file, replacing any existing file.
pub fn write_dataset(
    path: &Path,
    dataset: &WaveformDataset,
) -> std::result::Result<(), WaveformFileError> {
    let mut writer = writer_builder().from_path(path)?;
    write_records(&mut writer, dataset)?;
    log::info!("Wrote {} waveforms to {:?}", dataset.len(), path);
    Ok(())
}
