//! Default values shared by the configuration and the command line.

/// Default red, green and blue preview wavelengths in nanometres.
pub const DEFAULT_RGB_WAVELENGTHS: [f64; 3] = [600.0, 565.0, 510.0];

/// Preview bands used when a cube has no wavelength metadata.
pub const DEFAULT_FALLBACK_BANDS: [usize; 3] = [102, 85, 55];

/// Suffix appended to the file stem of gain adjusted cubes.
pub const DEFAULT_GAIN_SUFFIX: &str = "-gain-adjusted";

/// Output file for picked point waveforms.
pub const DEFAULT_PICK_OUTPUT: &str = "output.csv";

/// Configuration file name.
pub const CONFIG_FILENAME: &str = "hspt-config.json";

/// Directory under the platform config directory.
pub const CONFIG_DIR: &str = "hspt";
