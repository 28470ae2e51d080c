//! Command line front end.
//!
//! Subcommands:
//! - `bands`: list band centers or find the band for a wavelength
//! - `convert`: gain adjust a cube and save it next to the input
//! - `sample`: spectra at pixel coordinates
//! - `regions`: equal-weight mean spectrum over rectangular regions
//! - `summarise`: whole-cube mean spectrum for one or more cubes
//! - `pick`: sample points read as `x y` lines from stdin
//! - `average`: mean of every waveform in a CSV file
//! - `difference`: difference of the first waveform in two CSV files
//! - `preview`: RGB composite written as PNG
//!
//! Waveform results are printed as CSV unless `--output` names a file.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::bands::{band_listing, find_band};
use crate::config::{AppConfig, LogLevel};
use crate::cube::HyperspectralImage;
use crate::data::{DataExtension, ImageStore, SaveOptions};
use crate::error::{AppError, SpectraError};
use crate::gain::gain_adjust_file;
use crate::pick::{LinePicker, select_points};
use crate::preview::{BandSelection, default_rgb_bands, rgb_composite, save_preview};
use crate::sample::{
    mean_over_regions, parse_int_list, parse_points_to_pairs, parse_regions, sample_all,
    sample_subset,
};
use crate::waveform::{
    Waveform, WaveformDataset, average, difference, read_dataset, serialize, write_dataset,
};

/// Hyperspectral cube sampling and processing
#[derive(Parser, Debug)]
#[command(name = "hspt")]
#[command(about = "Sample, correct and compare hyperspectral image cubes")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Band center queries
    Bands {
        #[command(subcommand)]
        action: BandsCommand,
    },

    /// Gain adjust a cube using its band widths
    Convert {
        /// Cube header or data file
        file: PathBuf,

        /// Output header path (defaults to the input name plus the gain suffix)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Data file extension: img, dat, raw or bin
        #[arg(short, long)]
        extension: Option<DataExtension>,
    },

    /// Sample spectra at pixel coordinates
    Sample {
        /// Cube header or data file
        #[arg(short, long)]
        file: PathBuf,

        /// Coordinates as "row1 col1 row2 col2 ..."
        #[arg(short, long)]
        points: String,

        /// Band indices to keep, as "b1 b2 ..."
        #[arg(short, long)]
        bands: Option<String>,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mean spectrum over rectangular regions, each weighted equally
    Regions {
        /// Cube header or data file
        file: PathBuf,

        /// Regions as "row col width height ..."
        #[arg(short, long)]
        regions: String,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Whole-cube mean spectrum, one waveform per file
    Summarise {
        /// Cube header or data files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample points entered as "x y" lines on stdin
    Pick {
        /// Cube header or data file
        file: PathBuf,

        /// Output CSV file (defaults to the configured pick output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an RGB preview to pick from before reading points
        #[arg(long)]
        preview: Option<PathBuf>,
    },

    /// Average every waveform in a CSV file
    Average {
        /// Waveform CSV file
        file: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Difference of the first waveform in each of two CSV files
    Difference {
        /// Waveform CSV file to subtract from
        first: PathBuf,

        /// Waveform CSV file to subtract
        second: PathBuf,

        /// Absolute difference instead of positive and negative parts
        #[arg(long = "abs")]
        absolute: bool,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an RGB composite of three bands as PNG
    Preview {
        /// Cube header or data file
        file: PathBuf,

        /// Output PNG file (defaults to the input name with "-preview.png")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Red, green and blue band indices (defaults from the config)
        #[arg(long, num_args = 3, value_names = ["RED", "GREEN", "BLUE"])]
        bands: Option<Vec<usize>>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BandsCommand {
    /// Print every band as "[ center index ]"
    Print {
        /// Cube header or data file
        file: PathBuf,
    },

    /// Find the first band at or above a wavelength
    Find {
        /// Cube header or data file
        file: PathBuf,

        /// Wavelength in nanometres
        wavelength: f64,
    },
}

/// Run a parsed command line against `store`.
pub fn run(cli: Cli, config: &AppConfig, store: &dyn ImageStore) -> Result<(), AppError> {
    match cli.command {
        Command::Bands { action } => run_bands(action, store),
        Command::Convert {
            file,
            output,
            extension,
        } => {
            let adjusted = gain_adjust_file(store, &file)?;
            let output = output.unwrap_or_else(|| {
                sibling_path(&file, &config.preferences.gain_suffix, "hdr")
            });
            let options = SaveOptions::new()
                .extension(extension.unwrap_or(config.preferences.data_extension))
                .description(format!("Gain adjusted from {}", file.display()));
            for path in store.save_cube(&output, &adjusted, &options)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Sample {
            file,
            points,
            bands,
            output,
        } => {
            let image = store.load(&file)?;
            let points = parse_points_to_pairs(&parse_int_list(&points)?);
            let dataset = match bands {
                Some(bands) => {
                    let bands = parse_int_list(&bands)?;
                    let waveforms = sample_subset(&image.cube, &points, &bands)?;
                    WaveformDataset::new(image.band_table().select(&bands), waveforms)?
                }
                None => {
                    let waveforms = sample_all(&image.cube, &points)?;
                    WaveformDataset::new(image.band_table(), waveforms)?
                }
            };
            emit(&dataset, output.as_deref())
        }
        Command::Regions {
            file,
            regions,
            output,
        } => {
            let image = store.load(&file)?;
            let regions = parse_regions(&parse_int_list(&regions)?);
            let mean = mean_over_regions(&image.cube, &regions)?;
            emit(
                &WaveformDataset::new(image.band_table(), vec![mean])?,
                output.as_deref(),
            )
        }
        Command::Summarise { files, output } => {
            let dataset = summarise(store, &files)?;
            emit(&dataset, output.as_deref())
        }
        Command::Pick {
            file,
            output,
            preview,
        } => {
            let image = store.load(&file)?;
            if let Some(preview) = preview {
                write_preview(&image, config, None, &preview)?;
            }
            eprintln!("Enter one \"x y\" pixel position per line, then \"done\" or end of input");
            let mut picker = LinePicker::new(std::io::stdin().lock());
            let dataset = select_points(&image, &mut picker)?;
            let output = output.unwrap_or_else(|| config.preferences.pick_output.clone());
            write_dataset(&output, &dataset)?;
            Ok(())
        }
        Command::Average { file, output } => {
            let dataset = read_dataset(&file)?;
            let mean = average(&dataset)?;
            emit(
                &WaveformDataset::new(dataset.bands().clone(), vec![mean])?,
                output.as_deref(),
            )
        }
        Command::Difference {
            first,
            second,
            absolute,
            output,
        } => {
            let first = read_dataset(&first)?;
            let second = read_dataset(&second)?;
            let (a, b) = match (first.waveforms().first(), second.waveforms().first()) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(SpectraError::EmptyInput("no waveforms to difference").into()),
            };
            let waveforms = difference(a, b, absolute).into_waveforms();
            let len = waveforms.first().map_or(0, Waveform::len);
            emit(
                &WaveformDataset::new(first.bands().truncate(len), waveforms)?,
                output.as_deref(),
            )
        }
        Command::Preview {
            file,
            output,
            bands,
        } => {
            let image = store.load(&file)?;
            let bands = bands.and_then(|b| match b.as_slice() {
                [red, green, blue] => Some(BandSelection::new(*red, *green, *blue)),
                _ => None,
            });
            let output = output.unwrap_or_else(|| sibling_path(&file, "-preview", "png"));
            write_preview(&image, config, bands, &output)?;
            println!("{}", output.display());
            Ok(())
        }
    }
}

fn run_bands(action: BandsCommand, store: &dyn ImageStore) -> Result<(), AppError> {
    match action {
        BandsCommand::Print { file } => {
            let mut stdout = std::io::stdout().lock();
            for entry in band_listing(store, &file)? {
                writeln!(stdout, "{}", entry)?;
            }
            Ok(())
        }
        BandsCommand::Find { file, wavelength } => {
            let found = find_band(store, &file, wavelength)?;
            println!("{}", found);
            Ok(())
        }
    }
}

/// One whole-cube mean spectrum per file, against the first file's bands.
fn summarise(store: &dyn ImageStore, files: &[PathBuf]) -> Result<WaveformDataset, AppError> {
    let mut bands = None;
    let mut waveforms = Vec::with_capacity(files.len());
    for file in files {
        let image = store.load(file)?;
        let mean = image
            .cube
            .mean_spectrum()
            .ok_or(SpectraError::EmptyInput("cube has no pixels"))?;
        bands.get_or_insert_with(|| image.band_table());
        waveforms.push(mean);
    }
    let bands = bands.ok_or(SpectraError::EmptyInput("no files to summarise"))?;
    Ok(WaveformDataset::new(bands, waveforms)?)
}

fn write_preview(
    image: &HyperspectralImage,
    config: &AppConfig,
    bands: Option<BandSelection>,
    output: &Path,
) -> Result<(), AppError> {
    let bands = bands.unwrap_or_else(|| default_rgb_bands(&image.band_table(), &config.preview));
    log::debug!("Preview bands {:?}", bands);
    let rgb = rgb_composite(&image.cube, bands)?;
    save_preview(&rgb, output)?;
    Ok(())
}

fn emit(dataset: &WaveformDataset, output: Option<&Path>) -> Result<(), AppError> {
    match output {
        Some(path) => write_dataset(path, dataset)?,
        None => std::io::stdout().lock().write_all(serialize(dataset)?.as_bytes())?,
    }
    Ok(())
}

/// `dir/leaf.hdr` with suffix `-x` and extension `png` becomes `dir/leaf-x.png`.
fn sibling_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandTable;
    use crate::cube::Cube;
    use crate::data::CubeStore;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hspt").chain(args.iter().copied())).unwrap()
    }

    fn saved_leaf(dir: &Path) -> PathBuf {
        let image = HyperspectralImage::new(Cube::from_fn(3, 4, 3, |(r, c, b)| {
            (r * 4 + c) as f64 + b as f64 * 100.0
        }))
        .with_centers(vec![500.0, 550.0, 600.0])
        .with_widths(vec![2.0, 1.0, 0.5]);
        let path = dir.join("leaf.hdr");
        CubeStore::new()
            .save_cube(&path, &image, &SaveOptions::new())
            .unwrap();
        path
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sample_args() {
        let cli = parse(&["sample", "-f", "leaf.hdr", "-p", "1 2 3 4", "-b", "0 5"]);
        match cli.command {
            Command::Sample {
                file,
                points,
                bands,
                output,
            } => {
                assert_eq!(file, PathBuf::from("leaf.hdr"));
                assert_eq!(points, "1 2 3 4");
                assert_eq!(bands.as_deref(), Some("0 5"));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_options() {
        let cli = parse(&["--log-level", "debug", "convert", "leaf.hdr", "-e", "raw"]);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(matches!(
            cli.command,
            Command::Convert {
                extension: Some(DataExtension::Raw),
                ..
            }
        ));
        assert!(Cli::try_parse_from(["hspt", "convert", "leaf.hdr", "-e", "tif"]).is_err());
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("/data/leaf.hdr"), "-gain-adjusted", "hdr"),
            PathBuf::from("/data/leaf-gain-adjusted.hdr")
        );
        assert_eq!(
            sibling_path(Path::new("leaf.npy"), "-preview", "png"),
            PathBuf::from("leaf-preview.png")
        );
    }

    #[test]
    fn test_convert_writes_gain_adjusted_cube() {
        let dir = tempfile::tempdir().unwrap();
        let input = saved_leaf(dir.path());
        let store = CubeStore::new();

        run(
            parse(&["convert", input.to_str().unwrap(), "-e", "dat"]),
            &AppConfig::default(),
            &store,
        )
        .unwrap();

        let adjusted = store
            .load(&dir.path().join("leaf-gain-adjusted.hdr"))
            .unwrap();
        assert!(dir.path().join("leaf-gain-adjusted.dat").exists());
        assert_eq!(adjusted.cube.get(1, 2, 0), Some(12.0));
        assert_eq!(adjusted.cube.get(1, 2, 2), Some(103.0));
    }

    #[test]
    fn test_sample_and_average_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = saved_leaf(dir.path());
        let samples = dir.path().join("samples.csv");
        let mean = dir.path().join("mean.csv");
        let store = CubeStore::new();
        let config = AppConfig::default();

        run(
            parse(&[
                "sample",
                "-f",
                input.to_str().unwrap(),
                "-p",
                "0 0 2 3",
                "-o",
                samples.to_str().unwrap(),
            ]),
            &config,
            &store,
        )
        .unwrap();
        run(
            parse(&["average", samples.to_str().unwrap(), "-o", mean.to_str().unwrap()]),
            &config,
            &store,
        )
        .unwrap();

        let dataset = read_dataset(&mean).unwrap();
        assert_eq!(
            dataset.bands(),
            &BandTable::Wavelengths(vec![500.0, 550.0, 600.0])
        );
        assert_eq!(dataset.waveforms()[0].values(), &[5.5, 105.5, 205.5]);
    }

    #[test]
    fn test_difference_split_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        let out = dir.path().join("diff.csv");
        std::fs::write(&a, "1,2,3\n1,5,3\n").unwrap();
        std::fs::write(&b, "1,2,3\n4,2,3\n").unwrap();

        run(
            parse(&[
                "difference",
                a.to_str().unwrap(),
                b.to_str().unwrap(),
                "-o",
                out.to_str().unwrap(),
            ]),
            &AppConfig::default(),
            &CubeStore::new(),
        )
        .unwrap();

        let dataset = read_dataset(&out).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.waveforms()[0].values(), &[0.0, 3.0, 0.0]);
        assert_eq!(dataset.waveforms()[1].values(), &[-3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_summarise_regions_and_preview() {
        let dir = tempfile::tempdir().unwrap();
        let input = saved_leaf(dir.path());
        let store = CubeStore::new();
        let config = AppConfig::default();

        let summary = summarise(&store, &[input.clone(), input.clone()]).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary.waveforms()[0].values(), &[5.5, 105.5, 205.5]);

        let regions = dir.path().join("regions.csv");
        run(
            parse(&[
                "regions",
                input.to_str().unwrap(),
                "-r",
                "0 0 1 1 2 3 1 1",
                "-o",
                regions.to_str().unwrap(),
            ]),
            &config,
            &store,
        )
        .unwrap();
        let dataset = read_dataset(&regions).unwrap();
        assert_eq!(dataset.waveforms()[0].values(), &[5.5, 105.5, 205.5]);

        run(
            parse(&["preview", input.to_str().unwrap()]),
            &config,
            &store,
        )
        .unwrap();
        let png = image::open(dir.path().join("leaf-preview.png")).unwrap();
        assert_eq!((png.width(), png.height()), (4, 3));
    }

    #[test]
    fn test_find_band_not_found_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = saved_leaf(dir.path());
        let result = run(
            parse(&["bands", "find", input.to_str().unwrap(), "700"]),
            &AppConfig::default(),
            &CubeStore::new(),
        );
        assert!(matches!(result, Err(AppError::Bands(_))));
    }
}
