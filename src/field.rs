use crate::{
    ellipse::EllipseDescriptors,
    params::{Sampling, WaveForm, WaveParameters},
    trajectory::SampledTrajectory,
};
use anyhow::Result;
use core::fmt;
use nalgebra::Vector2;
use ndarray::Array1;
use num_complex::Complex;

#[cfg(test)]
mod tests {

    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn circular_ellipse_radius() {
        let field = PolarizationField::new(Sampling::period(300)).unwrap();
        let ellipse = field.ellipse(1.5, 1.5, 90.0);
        for (x, y) in ellipse.trajectory.x.iter().zip(ellipse.trajectory.y.iter()) {
            assert!((x * x + y * y - 2.25).abs() < 1e-4);
        }
    }

    #[test]
    fn ellipse_spans_one_period() {
        let field = PolarizationField::new(Sampling::period(300)).unwrap();
        let ellipse = field.ellipse(1.0, 0.5, 30.0);
        assert_eq!(ellipse.trajectory.len(), 300);
        assert!(ellipse.trajectory.z.is_none());
        // closed curve
        assert!((ellipse.trajectory.x[0] - ellipse.trajectory.x[299]).abs() < 1e-5);
        assert!((ellipse.trajectory.y[0] - ellipse.trajectory.y[299]).abs() < 1e-5);
        assert!((ellipse.trajectory.y[0] - 0.5 * (PI / 6.0).cos()).abs() < 1e-6);
    }

    #[test]
    fn wave_has_propagation_axis() {
        let field = PolarizationField::new(Sampling::propagation()).unwrap();
        let wave = field.wave_from_phase(30.0, 45.0);
        let z = wave.trajectory.z.as_ref().unwrap();
        assert_eq!(z.len(), 1000);
        assert_eq!(z[0], 0.0);
        assert!((z[999] - 10.5).abs() < 1e-5);
        assert!((wave.length - 10.5).abs() < 1e-6);
        assert!((wave.phase_delta - PI / 4.0).abs() < 1e-6);
    }

    #[test]
    fn ellipticity_wave_label() {
        let field = PolarizationField::new(Sampling::propagation()).unwrap();
        let wave = field.wave_from_ellipticity(-20.0, 45.0);
        assert_eq!(wave.displayed_phase_diff(), -40.0);
        assert!(wave.phase_delta < 0.0);
    }

    #[test]
    fn components_share_the_grid() {
        for num_points in [1, 2, 64, 301] {
            let field = PolarizationField::new(Sampling::period(num_points)).unwrap();
            let ellipse = field.ellipse(0.3, 1.2, -75.0);
            assert_eq!(ellipse.trajectory.x.len(), num_points);
            assert_eq!(ellipse.trajectory.y.len(), num_points);

            let sampling = Sampling::new(1.5, 3, num_points).unwrap();
            let wave = PolarizationField::new(sampling)
                .unwrap()
                .wave_from_ellipticity(30.0, 60.0);
            assert_eq!(wave.trajectory.x.len(), num_points);
            assert_eq!(wave.trajectory.y.len(), num_points);
            assert_eq!(wave.trajectory.z.as_ref().unwrap().len(), num_points);
        }
    }

    #[test]
    fn circular_wave_at_ellipticity_limits() {
        let field = PolarizationField::new(Sampling::propagation()).unwrap();
        let right = field.wave_from_ellipticity(45.0, 45.0);
        let left = field.wave_from_ellipticity(-45.0, 45.0);
        assert!(right.phase_delta > 0.0);
        assert!(left.phase_delta < 0.0);
        // label and delta agree at the limits
        assert!((right.phase_delta.to_degrees() - right.displayed_phase_diff()).abs() < 1e-3);
        assert!((left.phase_delta.to_degrees() - left.displayed_phase_diff()).abs() < 1e-3);
    }

    #[test]
    fn evaluate_dispatch() {
        let field = PolarizationField::new(Sampling::period(64)).unwrap();
        let params = WaveParameters::Amplitudes {
            amplitude_h: 1.0,
            amplitude_v: 1.0,
            phase_diff: 0.0,
        };
        match field.evaluate(&params).unwrap() {
            Evaluation::Ellipse(ellipse) => assert_eq!(ellipse.trajectory.len(), 64),
            Evaluation::Wave(_) => panic!("expected an ellipse"),
        }

        let params = WaveParameters::OrientationPhase {
            orientation: 0.0,
            phase_diff: 0.0,
        };
        assert!(matches!(
            field.evaluate(&params).unwrap(),
            Evaluation::Wave(_)
        ));

        let params = WaveParameters::Amplitudes {
            amplitude_h: -1.0,
            amplitude_v: 1.0,
            phase_diff: 0.0,
        };
        assert!(field.evaluate(&params).is_err());
    }
}

/// Stateless evaluator of a transverse field over a fixed sample grid.
///
/// Each call synthesises the two field components from the Jones vector of
/// the requested state, `E(phi) = Re(J * exp(i * phi))`, at every sample
/// phase of the grid. Nothing is kept between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarizationField {
    pub sampling: Sampling,
}

/// 2D ellipse trace with its descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub parameters: WaveParameters,
    pub trajectory: SampledTrajectory,
    pub descriptors: EllipseDescriptors,
}

/// Wave propagating along `z` with its transverse field at each sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub form: WaveForm,
    pub trajectory: SampledTrajectory,
    /// Phase delta actually used for the second component, in radians.
    pub phase_delta: f32,
    /// Length of the propagation axis.
    pub length: f32,
}

/// Result of evaluating any of the three visualizers.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Ellipse(Ellipse),
    Wave(Wave),
}

impl PolarizationField {
    /// Creates a field evaluator over the given grid.
    pub fn new(sampling: Sampling) -> Result<Self> {
        sampling.validate()?;
        Ok(Self { sampling })
    }

    /// Ellipse traced by `Ex = A_h cos(t)`, `Ey = A_v cos(t + delta)`,
    /// with `delta` in degrees.
    pub fn ellipse(&self, amplitude_h: f32, amplitude_v: f32, phase_diff: f32) -> Ellipse {
        let parameters = WaveParameters::Amplitudes {
            amplitude_h,
            amplitude_v,
            phase_diff,
        };
        let (x, y) = self.synthesize(&parameters.jones());
        Ellipse {
            parameters,
            trajectory: SampledTrajectory { x, y, z: None },
            descriptors: EllipseDescriptors::from_amplitudes(amplitude_h, amplitude_v, phase_diff),
        }
    }

    /// Propagating wave of unit amplitude from the ellipticity and
    /// orientation angles in degrees. See [`WaveParameters::phase_delta`] for
    /// how the phase delta is recovered.
    pub fn wave_from_ellipticity(&self, ellipticity: f32, orientation: f32) -> Wave {
        self.wave(WaveForm::EllipticityOrientation {
            ellipticity,
            orientation,
        })
    }

    /// Propagating wave of unit amplitude from the orientation angle and the
    /// phase difference, both in degrees.
    pub fn wave_from_phase(&self, orientation: f32, phase_diff: f32) -> Wave {
        self.wave(WaveForm::OrientationPhase {
            orientation,
            phase_diff,
        })
    }

    /// Evaluates whichever visualizer the parameters describe.
    pub fn evaluate(&self, parameters: &WaveParameters) -> Result<Evaluation> {
        parameters.validate()?;
        let evaluation = match *parameters {
            WaveParameters::Amplitudes {
                amplitude_h,
                amplitude_v,
                phase_diff,
            } => Evaluation::Ellipse(self.ellipse(amplitude_h, amplitude_v, phase_diff)),
            WaveParameters::EllipticityOrientation {
                ellipticity,
                orientation,
            } => Evaluation::Wave(self.wave_from_ellipticity(ellipticity, orientation)),
            WaveParameters::OrientationPhase {
                orientation,
                phase_diff,
            } => Evaluation::Wave(self.wave_from_phase(orientation, phase_diff)),
        };
        Ok(evaluation)
    }

    /// Sample positions along the domain, from zero to its full length.
    pub fn positions(&self) -> Array1<f32> {
        Array1::linspace(0.0, self.sampling.length(), self.sampling.num_points)
    }

    fn wave(&self, form: WaveForm) -> Wave {
        let parameters = WaveParameters::from(form);
        let z = self.positions();
        let (x, y) = self.synthesize(&parameters.jones());
        Wave {
            form,
            trajectory: SampledTrajectory { x, y, z: Some(z) },
            phase_delta: parameters.phase_delta(),
            length: self.sampling.length(),
        }
    }

    /// Real field components `Re(J * exp(i * omega * z))` at every sample.
    fn synthesize(&self, jones: &Vector2<Complex<f32>>) -> (Array1<f32>, Array1<f32>) {
        let omega = self.sampling.angular_frequency();
        let phases = self.positions().mapv(|z| omega * z);
        let x = phases.mapv(|phi| (jones.x * Complex::from_polar(1.0, phi)).re);
        let y = phases.mapv(|phi| (jones.y * Complex::from_polar(1.0, phi)).re);
        (x, y)
    }
}

impl Wave {
    /// Phase difference shown next to the wave, in degrees.
    ///
    /// For the ellipticity/orientation view this is twice the ellipticity
    /// angle, a display label that generally differs from `phase_delta`.
    pub fn displayed_phase_diff(&self) -> f32 {
        match self.form {
            WaveForm::EllipticityOrientation { ellipticity, .. } => 2.0 * ellipticity,
            WaveForm::OrientationPhase { phase_diff, .. } => phase_diff,
        }
    }
}

impl Evaluation {
    pub fn trajectory(&self) -> &SampledTrajectory {
        match self {
            Evaluation::Ellipse(ellipse) => &ellipse.trajectory,
            Evaluation::Wave(wave) => &wave.trajectory,
        }
    }
}

impl fmt::Display for Wave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            WaveForm::EllipticityOrientation {
                ellipticity,
                orientation,
            } => write!(
                f,
                "Wave:
  - Ellipticity Angle: {:.0}°
  - Orientation Angle: {:.0}°
  - Phase Difference (δ): {:.3} degrees
  - Phase Delta Used: {:.3} degrees
  - Length: {:.2}",
                ellipticity,
                orientation,
                self.displayed_phase_diff(),
                self.phase_delta.to_degrees(),
                self.length
            ),
            WaveForm::OrientationPhase {
                orientation,
                phase_diff,
            } => write!(
                f,
                "Wave:
  - Orientation: {:.0}°
  - Phase Difference: {:.0}°
  - Length: {:.2}",
                orientation, phase_diff, self.length
            ),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Ellipse(ellipse) => write!(f, "{}", ellipse.descriptors),
            Evaluation::Wave(wave) => write!(f, "{}", wave),
        }
    }
}
