use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::config as constants;
use crate::params::{Sampling, WaveParameters};

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Settings {
        load_default_config().unwrap()
    }

    #[test]
    fn default_config_loads() {
        let settings = defaults();
        assert_eq!(settings.mode, Mode::Ellipse);
        assert_eq!(settings.ellipse.num_points, constants::ELLIPSE_NUM_POINTS);
        assert_eq!(settings.wave.num_points, constants::WAVE_NUM_POINTS);
        assert_eq!(settings.wave.num_cycles, constants::WAVE_NUM_CYCLES);
        assert_eq!(settings.wave.wavelength, constants::WAVE_WAVELENGTH);
        assert_eq!(settings.camera, CameraSettings::default());
    }

    #[test]
    fn cli_overrides() {
        let args = CliArgs::parse_from([
            "polviz",
            "--mode",
            "wave-phase",
            "--orientation",
            "90",
            "--phase",
            "-45",
            "--points",
            "50",
        ]);
        let mut settings = defaults();
        settings.apply_args(&args);
        assert_eq!(settings.mode, Mode::WavePhase);
        assert_eq!(settings.wave.orientation, 90.0);
        assert_eq!(settings.wave.phase_diff, -45.0);
        assert_eq!(settings.wave.num_points, 50);
        assert_eq!(
            settings.parameters(),
            WaveParameters::OrientationPhase {
                orientation: 90.0,
                phase_diff: -45.0
            }
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut settings = defaults();
        settings.ellipse.amplitude_h = 3.0;
        settings.ellipse.amplitude_v = -1.0;
        settings.ellipse.phase_diff = 200.0;
        settings.wave.ellipticity = -60.0;
        settings.wave.orientation = 180.0;
        settings.clamp_to_bounds();
        assert_eq!(settings.ellipse.amplitude_h, 2.0);
        assert_eq!(settings.ellipse.amplitude_v, 0.0);
        assert_eq!(settings.ellipse.phase_diff, 180.0);
        assert_eq!(settings.wave.ellipticity, -45.0);
        assert_eq!(settings.wave.orientation, 180.0);
    }

    #[test]
    fn invalid_sampling_is_rejected() {
        let mut settings = defaults();
        settings.wave.wavelength = 0.0;
        assert!(validate_config(&settings).is_err());

        let mut settings = defaults();
        settings.ellipse.num_points = 0;
        assert!(validate_config(&settings).is_err());
    }

    #[test]
    fn negative_amplitude_in_file_is_rejected() {
        let dir = std::env::temp_dir().join("polviz_negative_amplitude_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("negative.toml");
        let args = CliArgs::parse_from(["polviz", "--config", path.to_str().unwrap()]);

        // checked whichever mode is selected
        let mut settings = defaults();
        settings.mode = Mode::WavePhase;
        settings.ellipse.amplitude_v = -0.5;
        std::fs::write(&path, toml::to_string(&settings).unwrap()).unwrap();
        assert!(validate_config(&settings).is_err());
        assert!(load_config_with(&args).is_err());

        settings.ellipse.amplitude_v = 3.0;
        std::fs::write(&path, toml::to_string(&settings).unwrap()).unwrap();
        let loaded = load_config_with(&args).unwrap();
        assert_eq!(loaded.ellipse.amplitude_v, 2.0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn ellipse_sampling_is_one_period() {
        let settings = defaults();
        let sampling = settings.sampling();
        assert_eq!(sampling, Sampling::period(constants::ELLIPSE_NUM_POINTS));
    }
}

/// Which visualizer to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// 2D ellipse from amplitudes and phase difference.
    Ellipse,
    /// 3D wave from ellipticity and orientation.
    WaveEllipticity,
    /// 3D wave from orientation and phase difference.
    WavePhase,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Ellipse => "ellipse",
            Mode::WaveEllipticity => "wave-ellipticity",
            Mode::WavePhase => "wave-phase",
        };
        write!(f, "{}", name)
    }
}

/// Inputs of the 2D ellipse view.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct EllipseSettings {
    pub amplitude_h: f32,
    pub amplitude_v: f32,
    /// Degrees.
    pub phase_diff: f32,
    #[serde(default = "default_ellipse_points")]
    pub num_points: usize,
}

/// Inputs of the two 3D wave views.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct WaveSettings {
    /// Degrees, used by the ellipticity view.
    pub ellipticity: f32,
    /// Degrees, used by both wave views.
    pub orientation: f32,
    /// Degrees, used by the phase view.
    pub phase_diff: f32,
    pub wavelength: f32,
    pub num_cycles: usize,
    pub num_points: usize,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct CameraSettings {
    pub azimuth: f32,
    pub elevation: f32,
    pub radius: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            azimuth: constants::CAMERA_AZIMUTH,
            elevation: constants::CAMERA_ELEVATION,
            radius: constants::CAMERA_RADIUS,
        }
    }
}

/// Runtime configuration for the application.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    /// Logo image, relative to the project root.
    #[serde(default = "default_logo")]
    pub logo: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Also write the result as JSON.
    #[serde(default)]
    pub json: bool,
    pub ellipse: EllipseSettings,
    pub wave: WaveSettings,
    #[serde(default)]
    pub camera: CameraSettings,
}

fn default_ellipse_points() -> usize {
    constants::ELLIPSE_NUM_POINTS
}

fn default_logo() -> String {
    constants::LOGO_PATH.to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Settings {
    /// Parameters of the selected visualizer.
    pub fn parameters(&self) -> WaveParameters {
        match self.mode {
            Mode::Ellipse => WaveParameters::Amplitudes {
                amplitude_h: self.ellipse.amplitude_h,
                amplitude_v: self.ellipse.amplitude_v,
                phase_diff: self.ellipse.phase_diff,
            },
            Mode::WaveEllipticity => WaveParameters::EllipticityOrientation {
                ellipticity: self.wave.ellipticity,
                orientation: self.wave.orientation,
            },
            Mode::WavePhase => WaveParameters::OrientationPhase {
                orientation: self.wave.orientation,
                phase_diff: self.wave.phase_diff,
            },
        }
    }

    /// Sample grid of the selected visualizer.
    pub fn sampling(&self) -> Sampling {
        match self.mode {
            Mode::Ellipse => Sampling::period(self.ellipse.num_points),
            Mode::WaveEllipticity | Mode::WavePhase => Sampling {
                wavelength: self.wave.wavelength,
                num_cycles: self.wave.num_cycles,
                num_points: self.wave.num_points,
            },
        }
    }

    /// Pulls every slider value back into its declared bounds.
    pub fn clamp_to_bounds(&mut self) {
        clamp_value(
            "amplitude_h",
            &mut self.ellipse.amplitude_h,
            &constants::AMPLITUDE_BOUNDS,
        );
        clamp_value(
            "amplitude_v",
            &mut self.ellipse.amplitude_v,
            &constants::AMPLITUDE_BOUNDS,
        );
        clamp_value(
            "ellipse.phase_diff",
            &mut self.ellipse.phase_diff,
            &constants::PHASE_BOUNDS,
        );
        clamp_value(
            "ellipticity",
            &mut self.wave.ellipticity,
            &constants::ELLIPTICITY_BOUNDS,
        );
        clamp_value(
            "orientation",
            &mut self.wave.orientation,
            &constants::ORIENTATION_BOUNDS,
        );
        clamp_value(
            "wave.phase_diff",
            &mut self.wave.phase_diff,
            &constants::PHASE_BOUNDS,
        );
    }

    /// Overrides values from parsed command-line arguments.
    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(ah) = args.ah {
            self.ellipse.amplitude_h = ah;
        }
        if let Some(av) = args.av {
            self.ellipse.amplitude_v = av;
        }
        if let Some(phase) = args.phase {
            // the phase slider is shared by the ellipse and the phase wave view
            self.ellipse.phase_diff = phase;
            self.wave.phase_diff = phase;
        }
        if let Some(ellipticity) = args.ellipticity {
            self.wave.ellipticity = ellipticity;
        }
        if let Some(orientation) = args.orientation {
            self.wave.orientation = orientation;
        }
        if let Some(points) = args.points {
            match self.mode {
                Mode::Ellipse => self.ellipse.num_points = points,
                Mode::WaveEllipticity | Mode::WavePhase => self.wave.num_points = points,
            }
        }
        if let Some(wavelength) = args.wavelength {
            self.wave.wavelength = wavelength;
        }
        if let Some(cycles) = args.cycles {
            self.wave.num_cycles = cycles;
        }
        if let Some(output) = &args.output {
            self.output_dir = output.clone();
        }
        if args.json {
            self.json = true;
        }
    }
}

fn clamp_value(name: &str, value: &mut f32, bounds: &RangeInclusive<f32>) {
    let clamped = value.clamp(*bounds.start(), *bounds.end());
    if clamped != *value {
        tracing::warn!(
            "{} = {} is outside [{}, {}], using {}",
            name,
            value,
            bounds.start(),
            bounds.end(),
            clamped
        );
        *value = clamped;
    }
}

/// Loads `config/default.toml` without consulting the environment or the
/// command line.
pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let settings = read_config(&root.join("config/default.toml"), false)?;
    validate_config(&settings)?;
    Ok(settings)
}

/// Loads the configuration file, then environment overrides with the
/// `POLVIZ` prefix, then command-line overrides.
pub fn load_config() -> Result<Settings> {
    let args = CliArgs::parse();
    load_config_with(&args)
}

pub fn load_config_with(args: &CliArgs) -> Result<Settings> {
    let config_file = match &args.config {
        Some(path) => path.clone(),
        None => {
            let root = retrieve_project_root()?;
            let default_config_file = root.join("config/default.toml");
            let local_config = root.join("config/local.toml");

            // Check if local config exists, if not use default
            if local_config.exists() {
                tracing::info!("Using local configuration: {:?}", local_config);
                local_config
            } else {
                tracing::info!("Using default configuration: {:?}", default_config_file);
                default_config_file
            }
        }
    };

    let mut settings = read_config(&config_file, true)?;
    settings.apply_args(args);
    // negative amplitudes are rejected before clamping could hide them
    validate_config(&settings)?;
    settings.clamp_to_bounds();

    tracing::debug!("{:#?}", settings);

    Ok(settings)
}

fn read_config(path: &Path, with_env: bool) -> Result<Settings> {
    let mut builder = Config::builder().add_source(File::from(path).required(true));
    if with_env {
        builder = builder.add_source(Environment::with_prefix("POLVIZ").separator("__"));
    }
    let config = builder
        .build()
        .with_context(|| format!("Error loading configuration from {:?}", path))?;
    config
        .try_deserialize()
        .with_context(|| format!("Error deserializing configuration from {:?}", path))
}

/// Retrieve the project root directory.
/// This function tries to find the project root directory in different ways:
/// 1. If the CARGO_MANIFEST_DIR environment variable is set, use it.
/// 2. If the POLVIZ_ROOT_DIR environment variable is set, use it.
/// 3. If the "config" subdirectory is found in the executable directory or any of its parents, use it.
pub fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("POLVIZ_ROOT_DIR") {
        return Ok(PathBuf::from(path));
    }

    let exe_path = env::current_exe().context("Failed to get current executable path")?;
    let mut current_dir = exe_path.parent();
    while let Some(dir) = current_dir {
        if dir.join("config").is_dir() {
            return Ok(dir.to_path_buf());
        }
        current_dir = dir.parent();
    }
    Err(anyhow::anyhow!(
        "Could not find project root directory, set POLVIZ_ROOT_DIR"
    ))
}

pub fn validate_config(config: &Settings) -> Result<()> {
    Sampling::period(config.ellipse.num_points)
        .validate()
        .context("invalid ellipse sampling")?;
    Sampling {
        wavelength: config.wave.wavelength,
        num_cycles: config.wave.num_cycles,
        num_points: config.wave.num_points,
    }
    .validate()
    .context("invalid wave sampling")?;
    if !(config.camera.radius > 0.0) {
        return Err(anyhow::anyhow!(
            "camera radius must be positive, got {}",
            config.camera.radius
        ));
    }
    WaveParameters::Amplitudes {
        amplitude_h: config.ellipse.amplitude_h,
        amplitude_v: config.ellipse.amplitude_v,
        phase_diff: config.ellipse.phase_diff,
    }
    .validate()
    .context("invalid ellipse settings")?;
    config.parameters().validate()
}

#[derive(Parser, Debug)]
#[command(version, about = "polviz - polarization ellipse and wave visualizer")]
pub struct CliArgs {
    /// Visualizer to evaluate.
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Amplitude of the horizontal component, between 0 and 2.
    #[arg(long)]
    pub ah: Option<f32>,

    /// Amplitude of the vertical component, between 0 and 2.
    #[arg(long)]
    pub av: Option<f32>,

    /// Phase difference in degrees, between -180 and 180.
    #[arg(short, long, allow_negative_numbers = true)]
    pub phase: Option<f32>,

    /// Ellipticity angle in degrees, between -45 and 45.
    #[arg(short, long, allow_negative_numbers = true)]
    pub ellipticity: Option<f32>,

    /// Orientation angle in degrees, between 0 and 180.
    #[arg(short, long)]
    pub orientation: Option<f32>,

    /// Number of samples of the selected visualizer.
    #[arg(long)]
    pub points: Option<usize>,

    /// Wavelength of the propagating wave.
    #[arg(short, long)]
    pub wavelength: Option<f32>,

    /// Number of wavelengths along the propagation axis.
    #[arg(long)]
    pub cycles: Option<usize>,

    /// Directory the trajectory and settings are written to.
    #[arg(long)]
    pub output: Option<String>,

    /// Also write the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Configuration file to use instead of config/default.toml.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Ellipse => write!(
                f,
                "Settings:
  - Mode: {}
  - Amplitude (H): {:.2}
  - Amplitude (V): {:.2}
  - Phase Difference: {:.0}°
  - Points: {}
  ",
                self.mode,
                self.ellipse.amplitude_h,
                self.ellipse.amplitude_v,
                self.ellipse.phase_diff,
                self.ellipse.num_points,
            ),
            Mode::WaveEllipticity | Mode::WavePhase => write!(
                f,
                "Settings:
  - Mode: {}
  - Ellipticity: {:.0}°
  - Orientation: {:.0}°
  - Phase Difference: {:.0}°
  - Wavelength: {:.3}
  - Cycles: {}
  - Points: {}
  ",
                self.mode,
                self.wave.ellipticity,
                self.wave.orientation,
                self.wave.phase_diff,
                self.wave.wavelength,
                self.wave.num_cycles,
                self.wave.num_points,
            ),
        }
    }
}
