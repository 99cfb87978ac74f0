//! Scalar inputs for a single evaluation of the polarization field.
//!
//! A polarization state can be described in three equivalent-looking ways,
//! one per visualizer:
//! - the two transverse amplitudes and their phase difference (2D ellipse),
//! - the ellipticity and orientation angles (3D wave, variant 1),
//! - the orientation angle and phase difference (3D wave, variant 2).
//!
//! All angles are given in degrees and converted to radians here, so nothing
//! downstream has to care about the unit the user interface works in.

use anyhow::Result;
use nalgebra::Vector2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplitudes_phase_delta_is_raw_radians() {
        let params = WaveParameters::Amplitudes {
            amplitude_h: 1.0,
            amplitude_v: 1.0,
            phase_diff: 270.0,
        };
        assert!((params.phase_delta() - 270f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn ellipticity_inverse_is_zero_for_linear_states() {
        let params = WaveParameters::EllipticityOrientation {
            ellipticity: 0.0,
            orientation: 45.0,
        };
        assert!(params.phase_delta().abs() < 1e-6);
        let (ax, ay) = params.amplitudes();
        assert!((ax - ay).abs() < 1e-6);
    }

    #[test]
    fn ellipticity_inverse_stays_finite_at_orientation_zero() {
        for ellipticity in [-45.0, -10.0, 10.0, 45.0] {
            let params = WaveParameters::EllipticityOrientation {
                ellipticity,
                orientation: 0.0,
            };
            let delta = params.phase_delta();
            assert!(delta.is_finite());
            assert!(delta.abs() <= std::f32::consts::FRAC_PI_2 + 1e-6);
        }
    }

    #[test]
    fn circular_limits_keep_their_sense() {
        // the sign of sin(2 * orientation) carries over to the delta
        for (orientation, sign) in [(0.0, 1.0), (45.0, 1.0), (135.0, -1.0)] {
            let right = WaveParameters::EllipticityOrientation {
                ellipticity: 45.0,
                orientation,
            };
            let left = WaveParameters::EllipticityOrientation {
                ellipticity: -45.0,
                orientation,
            };
            assert!(sign * right.phase_delta() > 0.0, "orientation: {}", orientation);
            assert!(sign * left.phase_delta() < 0.0, "orientation: {}", orientation);
        }
        let right = WaveParameters::EllipticityOrientation {
            ellipticity: 45.0,
            orientation: 45.0,
        };
        assert!((right.phase_delta() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn wave_form_converts_to_parameters() {
        let form = WaveForm::OrientationPhase {
            orientation: 30.0,
            phase_diff: 90.0,
        };
        assert_eq!(
            WaveParameters::from(form),
            WaveParameters::OrientationPhase {
                orientation: 30.0,
                phase_diff: 90.0
            }
        );
        let form = WaveForm::EllipticityOrientation {
            ellipticity: 10.0,
            orientation: 20.0,
        };
        assert_eq!(
            WaveParameters::from(form).phase_delta(),
            WaveParameters::EllipticityOrientation {
                ellipticity: 10.0,
                orientation: 20.0
            }
            .phase_delta()
        );
    }

    #[test]
    fn negative_amplitude_is_rejected() {
        let params = WaveParameters::Amplitudes {
            amplitude_h: -0.5,
            amplitude_v: 1.0,
            phase_diff: 0.0,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn sampling_lengths() {
        let sampling = Sampling::propagation();
        assert!((sampling.length() - 10.5).abs() < 1e-6);
        assert!((Sampling::period(300).angular_frequency() - 1.0).abs() < 1e-6);
        assert!(Sampling::new(0.0, 1, 10).is_err());
        assert!(Sampling::new(1.0, 0, 10).is_err());
        assert!(Sampling::new(1.0, 1, 0).is_err());
    }
}

/// Scalar description of a polarization state. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WaveParameters {
    /// Amplitudes along the horizontal and vertical axes with the phase of
    /// the vertical component relative to the horizontal one.
    Amplitudes {
        amplitude_h: f32,
        amplitude_v: f32,
        phase_diff: f32,
    },
    /// Ellipticity and orientation of the polarization ellipse.
    EllipticityOrientation { ellipticity: f32, orientation: f32 },
    /// Orientation of a unit field with an explicit phase difference.
    OrientationPhase { orientation: f32, phase_diff: f32 },
}

impl WaveParameters {
    /// Phase of the second transverse component relative to the first, in radians.
    ///
    /// For the ellipticity/orientation form the delta comes from
    /// `atan(tan(2 * ellipticity) / (sin(2 * orientation) + PHASE_EPSILON))`.
    /// This is not an exact inverse of the ellipse equations. It is unstable
    /// where `sin(2 * orientation)` approaches zero, i.e. near 0, 90 and 180
    /// degrees, where the sign of the denominator flips and the result jumps
    /// between roughly +pi/2 and -pi/2.
    pub fn phase_delta(&self) -> f32 {
        match *self {
            WaveParameters::Amplitudes { phase_diff, .. }
            | WaveParameters::OrientationPhase { phase_diff, .. } => phase_diff.to_radians(),
            WaveParameters::EllipticityOrientation {
                ellipticity,
                orientation,
            } => {
                // in f32, 2 * 45 degrees lands past pi/2 and tan flips sign
                let chi = f64::from(ellipticity).to_radians();
                let theta = f64::from(orientation).to_radians();
                let numerator = (2.0 * chi).tan();
                let denominator = (2.0 * theta).sin() + config::PHASE_EPSILON;
                (numerator / denominator).atan() as f32
            }
        }
    }

    /// Real amplitudes of the two transverse components.
    pub fn amplitudes(&self) -> (f32, f32) {
        match *self {
            WaveParameters::Amplitudes {
                amplitude_h,
                amplitude_v,
                ..
            } => (amplitude_h, amplitude_v),
            WaveParameters::EllipticityOrientation { orientation, .. }
            | WaveParameters::OrientationPhase { orientation, .. } => {
                let theta = orientation.to_radians();
                (theta.cos(), theta.sin())
            }
        }
    }

    /// Jones vector `(A_h, A_v * exp(i * delta))` of the state.
    pub fn jones(&self) -> Vector2<Complex<f32>> {
        let (a_h, a_v) = self.amplitudes();
        Vector2::new(
            Complex::new(a_h, 0.0),
            Complex::from_polar(a_v, self.phase_delta()),
        )
    }

    /// Checks that every value is finite and that the amplitudes are not negative.
    pub fn validate(&self) -> Result<()> {
        let values: Vec<f32> = match *self {
            WaveParameters::Amplitudes {
                amplitude_h,
                amplitude_v,
                phase_diff,
            } => {
                if amplitude_h < 0.0 || amplitude_v < 0.0 {
                    return Err(anyhow::anyhow!(
                        "amplitudes must not be negative, got ({}, {})",
                        amplitude_h,
                        amplitude_v
                    ));
                }
                vec![amplitude_h, amplitude_v, phase_diff]
            }
            WaveParameters::EllipticityOrientation {
                ellipticity,
                orientation,
            } => vec![ellipticity, orientation],
            WaveParameters::OrientationPhase {
                orientation,
                phase_diff,
            } => vec![orientation, phase_diff],
        };

        if values.iter().any(|v| !v.is_finite()) {
            return Err(anyhow::anyhow!("wave parameters must be finite: {:?}", self));
        }
        Ok(())
    }
}

/// Inputs of the two propagating wave views. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WaveForm {
    EllipticityOrientation { ellipticity: f32, orientation: f32 },
    OrientationPhase { orientation: f32, phase_diff: f32 },
}

impl From<WaveForm> for WaveParameters {
    fn from(form: WaveForm) -> Self {
        match form {
            WaveForm::EllipticityOrientation {
                ellipticity,
                orientation,
            } => WaveParameters::EllipticityOrientation {
                ellipticity,
                orientation,
            },
            WaveForm::OrientationPhase {
                orientation,
                phase_diff,
            } => WaveParameters::OrientationPhase {
                orientation,
                phase_diff,
            },
        }
    }
}

/// Grid over which a field is sampled.
///
/// The sample positions run uniformly from zero to `num_cycles * wavelength`
/// and the sample phase at each position is `2 * pi / wavelength * position`.
/// The 2D ellipse uses a single period with a wavelength of `2 * pi`, so the
/// positions are the phases themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    pub wavelength: f32,
    pub num_cycles: usize,
    pub num_points: usize,
}

impl Sampling {
    pub fn new(wavelength: f32, num_cycles: usize, num_points: usize) -> Result<Self> {
        let sampling = Self {
            wavelength,
            num_cycles,
            num_points,
        };
        sampling.validate()?;
        Ok(sampling)
    }

    /// One period, `t` in `[0, 2 * pi]`.
    pub fn period(num_points: usize) -> Self {
        Self {
            wavelength: TAU,
            num_cycles: 1,
            num_points,
        }
    }

    /// Default grid of the propagating wave views.
    pub fn propagation() -> Self {
        Self {
            wavelength: config::WAVE_WAVELENGTH,
            num_cycles: config::WAVE_NUM_CYCLES,
            num_points: config::WAVE_NUM_POINTS,
        }
    }

    /// Total length of the sampled domain.
    pub fn length(&self) -> f32 {
        self.num_cycles as f32 * self.wavelength
    }

    pub fn angular_frequency(&self) -> f32 {
        TAU / self.wavelength
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.wavelength > 0.0) || !self.wavelength.is_finite() {
            return Err(anyhow::anyhow!(
                "wavelength must be positive, got {}",
                self.wavelength
            ));
        }
        if self.num_cycles == 0 {
            return Err(anyhow::anyhow!("number of cycles must be at least 1"));
        }
        if self.num_points == 0 {
            return Err(anyhow::anyhow!("number of points must be at least 1"));
        }
        Ok(())
    }
}
