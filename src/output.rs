use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::izip;
use serde::Serialize;

use crate::{
    ellipse::EllipseDescriptors,
    field::{Evaluation, Wave},
    params::{WaveForm, WaveParameters},
    scene::{PlaneView, WaveScene},
    settings::{CameraSettings, Settings},
    trajectory::SampledTrajectory,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::PolarizationField, params::Sampling};

    #[test]
    fn degree_formatting() {
        assert_eq!(format_degrees(45.0, 2), "45.00°");
        assert_eq!(format_degrees(-12.345, 0), "-12°");
        assert_eq!(format_degrees(10.0, 3), "10.000°");
    }

    #[test]
    fn ellipse_metrics_two_decimals() {
        let field = PolarizationField::new(Sampling::period(300)).unwrap();
        let evaluation = Evaluation::Ellipse(field.ellipse(1.0, 1.0, 0.0));
        let metrics = metrics(&evaluation);
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0].label, "Absolute Phase (α)");
        assert_eq!(metrics[0].value, "45.00°");
        assert_eq!(metrics[1].value, "0.00°");
        assert_eq!(metrics[2].value, "45.00°");
    }

    #[test]
    fn degenerate_metrics_are_undefined() {
        let field = PolarizationField::new(Sampling::period(300)).unwrap();
        let evaluation = Evaluation::Ellipse(field.ellipse(0.0, 0.0, 90.0));
        let metrics = metrics(&evaluation);
        assert_eq!(metrics[1].value, "undefined");
        assert_eq!(metrics[2].value, "undefined");
        assert!(metrics.iter().all(|m| !m.value.contains("NaN")));
    }

    #[test]
    fn wave_metrics_echo_inputs() {
        let field = PolarizationField::new(Sampling::propagation()).unwrap();
        let evaluation = Evaluation::Wave(field.wave_from_phase(30.0, -90.0));
        let metrics = metrics(&evaluation);
        assert_eq!(metrics[0].value, "30°");
        assert_eq!(metrics[1].value, "-90°");

        let evaluation = Evaluation::Wave(field.wave_from_ellipticity(10.0, 45.0));
        let metrics = super::metrics(&evaluation);
        assert_eq!(metrics[0].label, "Phase Difference (δ)");
        assert_eq!(metrics[0].value, "20.000°");
    }

    #[test]
    fn writeup_columns() {
        let dir = std::env::temp_dir().join("polviz_writeup_test");
        let field = PolarizationField::new(Sampling::propagation()).unwrap();
        let evaluation = Evaluation::Wave(field.wave_from_phase(0.0, 0.0));
        let path = writeup(&dir, evaluation.trajectory()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1000);
        assert_eq!(lines[0].split_whitespace().count(), 3);
        fs::remove_dir_all(&dir).unwrap();
    }
}

/// Formats an angle in degrees with a fixed number of decimals.
pub fn format_degrees(value: f32, decimals: usize) -> String {
    format!("{:.*}°", decimals, value)
}

/// One labelled value of the metrics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Values shown next to the plot of an evaluation.
pub fn metrics(evaluation: &Evaluation) -> Vec<Metric> {
    match evaluation {
        Evaluation::Ellipse(ellipse) => ellipse_metrics(&ellipse.descriptors),
        Evaluation::Wave(wave) => wave_metrics(wave),
    }
}

fn ellipse_metrics(descriptors: &EllipseDescriptors) -> Vec<Metric> {
    let undefined_or = |value: f32| {
        if descriptors.degenerate {
            "undefined".to_string()
        } else {
            format_degrees(value, 2)
        }
    };
    vec![
        Metric::new(
            "Absolute Phase (α)",
            format_degrees(descriptors.absolute_phase, 2),
        ),
        Metric::new("Ellipticity Angle", undefined_or(descriptors.ellipticity)),
        Metric::new("Orientation Angle", undefined_or(descriptors.orientation)),
    ]
}

fn wave_metrics(wave: &Wave) -> Vec<Metric> {
    match wave.form {
        WaveForm::EllipticityOrientation { .. } => vec![Metric::new(
            "Phase Difference (δ)",
            format_degrees(wave.displayed_phase_diff(), 3),
        )],
        WaveForm::OrientationPhase {
            orientation,
            phase_diff,
        } => vec![
            Metric::new("Orientation", format_degrees(orientation, 0)),
            Metric::new("Phase Difference", format_degrees(phase_diff, 0)),
        ],
    }
}

/// Write the trajectory to `trajectory.dat` in `dir`, one sample per line
/// with the columns `x y` or `x y z`.
pub fn writeup(dir: &Path, trajectory: &SampledTrajectory) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join("trajectory.dat");
    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);

    match &trajectory.z {
        Some(z) => {
            for (x, y, z) in izip!(trajectory.x.iter(), trajectory.y.iter(), z.iter()) {
                writeln!(writer, "{} {} {}", x, y, z)?;
            }
        }
        None => {
            for (x, y) in izip!(trajectory.x.iter(), trajectory.y.iter()) {
                writeln!(writer, "{} {}", x, y)?;
            }
        }
    }
    writer.flush()?;

    Ok(path)
}

/// Write the effective settings to `settings.toml` in `dir`.
pub fn write_settings(dir: &Path, settings: &Settings) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join("settings.toml");
    let toml_string = toml::to_string(settings).context("Failed to serialize settings")?;
    fs::write(&path, toml_string).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    parameters: WaveParameters,
    metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    descriptors: Option<&'a EllipseDescriptors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase_delta: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plane: Option<PlaneView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<WaveScene>,
    x: Vec<f32>,
    y: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    z: Option<Vec<f32>>,
}

/// Write the evaluation, its metrics and its scene description to
/// `result.json` in `dir`.
pub fn write_json(dir: &Path, evaluation: &Evaluation, camera: &CameraSettings) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let trajectory = evaluation.trajectory();
    let report = match evaluation {
        Evaluation::Ellipse(ellipse) => Report {
            parameters: ellipse.parameters,
            metrics: metrics(evaluation),
            descriptors: Some(&ellipse.descriptors),
            phase_delta: None,
            plane: Some(PlaneView::default()),
            scene: None,
            x: trajectory.x.to_vec(),
            y: trajectory.y.to_vec(),
            z: None,
        },
        Evaluation::Wave(wave) => Report {
            parameters: WaveParameters::from(wave.form),
            metrics: metrics(evaluation),
            descriptors: None,
            phase_delta: Some(wave.phase_delta),
            plane: None,
            scene: Some(WaveScene::new(wave, camera)?),
            x: trajectory.x.to_vec(),
            y: trajectory.y.to_vec(),
            z: trajectory.z.as_ref().map(|z| z.to_vec()),
        },
    };

    let path = dir.join("result.json");
    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &report)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}
