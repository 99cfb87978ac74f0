//! Shape descriptors of the polarization ellipse.
//!
//! The ellipse traced by `(A_h cos t, A_v cos(t + delta))` is summarised by
//! three angles:
//! - absolute phase `alpha = atan2(A_v, A_h)`, the balance between the two
//!   amplitudes regardless of their phase relationship,
//! - ellipticity angle `chi = asin(2 A_h A_v sin(delta) / (A_h^2 + A_v^2)) / 2`,
//!   zero for linear and +/-45 degrees for circular polarization,
//! - orientation angle `psi = atan2(2 A_h A_v cos(delta), A_h^2 - A_v^2) / 2`,
//!   the angle of the major axis from the horizontal.
//!
//! The ellipticity and orientation are undefined for a zero field. That case
//! is reported with every angle at zero and the `degenerate` flag set, so a
//! NaN never reaches the display.

use pyo3::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_amplitudes_in_phase() {
        let descriptors = EllipseDescriptors::from_amplitudes(1.0, 1.0, 0.0);
        assert!((descriptors.absolute_phase - 45.0).abs() < 1e-4);
        assert!(descriptors.ellipticity.abs() < 1e-4);
        assert!((descriptors.orientation - 45.0).abs() < 1e-4);
        assert!(!descriptors.degenerate);
        assert_eq!(descriptors.handedness(), Handedness::Linear);
    }

    #[test]
    fn circular_states() {
        let right = EllipseDescriptors::from_amplitudes(1.0, 1.0, 90.0);
        assert!((right.ellipticity - 45.0).abs() < 1e-3);
        assert_eq!(right.handedness(), Handedness::Right);

        let left = EllipseDescriptors::from_amplitudes(1.0, 1.0, -90.0);
        assert!((left.ellipticity + 45.0).abs() < 1e-3);
        assert_eq!(left.handedness(), Handedness::Left);
    }

    #[test]
    fn zero_field_is_degenerate() {
        let descriptors = EllipseDescriptors::from_amplitudes(0.0, 0.0, 37.0);
        assert!(descriptors.degenerate);
        assert_eq!(descriptors.absolute_phase, 0.0);
        assert_eq!(descriptors.ellipticity, 0.0);
        assert_eq!(descriptors.orientation, 0.0);
        assert_eq!(descriptors.handedness(), Handedness::Linear);
    }

    #[test]
    fn weak_field_is_not_degenerate() {
        let descriptors = EllipseDescriptors::from_amplitudes(1e-7, 1e-7, 90.0);
        assert!(!descriptors.degenerate);
        assert!((descriptors.absolute_phase - 45.0).abs() < 1e-3);
        assert!((descriptors.ellipticity - 45.0).abs() < 1e-3);
        assert_eq!(descriptors.handedness(), Handedness::Right);
    }

    #[test]
    fn single_axis_field() {
        let horizontal = EllipseDescriptors::from_amplitudes(1.0, 0.0, 60.0);
        assert!(!horizontal.degenerate);
        assert_eq!(horizontal.ellipticity, 0.0);
        assert_eq!(horizontal.orientation, 0.0);
        assert_eq!(horizontal.absolute_phase, 0.0);

        let vertical = EllipseDescriptors::from_amplitudes(0.0, 2.0, 0.0);
        assert!((vertical.absolute_phase - 90.0).abs() < 1e-4);
        assert!((vertical.orientation - 90.0).abs() < 1e-4);
    }
}

/// Sense of rotation of the field vector as the sample phase increases.
///
/// Right-handed means clockwise when looking towards the source, which is
/// the case for a positive phase difference (`sin(delta) > 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Handedness {
    Left,
    Right,
    Linear,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Handedness::Left => "left-handed",
            Handedness::Right => "right-handed",
            Handedness::Linear => "linear",
        };
        write!(f, "{}", name)
    }
}

/// Derived angles of the 2D polarization ellipse, in degrees.
#[pyclass]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EllipseDescriptors {
    #[pyo3(get)]
    pub absolute_phase: f32,
    #[pyo3(get)]
    pub ellipticity: f32,
    #[pyo3(get)]
    pub orientation: f32,
    /// Set when both amplitudes vanish and the angles carry no meaning.
    #[pyo3(get)]
    pub degenerate: bool,
}

impl EllipseDescriptors {
    /// Computes the descriptors from the two amplitudes and the phase
    /// difference in degrees.
    pub fn from_amplitudes(amplitude_h: f32, amplitude_v: f32, phase_diff: f32) -> Self {
        let power = amplitude_h * amplitude_h + amplitude_v * amplitude_v;
        if power < config::ZERO_FIELD_THRESHOLD {
            return Self::degenerate();
        }

        let delta = phase_diff.to_radians();
        let cross = 2.0 * amplitude_h * amplitude_v;

        let alpha = amplitude_v.atan2(amplitude_h);
        // rounding can push the ratio just past 1 for circular states
        let sin_2chi = (cross * delta.sin() / power).clamp(-1.0, 1.0);
        let chi = 0.5 * sin_2chi.asin();
        let psi = 0.5 * (cross * delta.cos()).atan2(
            amplitude_h * amplitude_h - amplitude_v * amplitude_v,
        );

        Self {
            absolute_phase: alpha.to_degrees(),
            ellipticity: chi.to_degrees(),
            orientation: psi.to_degrees(),
            degenerate: false,
        }
    }

    /// Sentinel for a zero field.
    pub fn degenerate() -> Self {
        Self {
            absolute_phase: 0.0,
            ellipticity: 0.0,
            orientation: 0.0,
            degenerate: true,
        }
    }

    pub fn handedness(&self) -> Handedness {
        if self.degenerate || self.ellipticity.abs() < config::LINEAR_THRESHOLD {
            Handedness::Linear
        } else if self.ellipticity > 0.0 {
            Handedness::Right
        } else {
            Handedness::Left
        }
    }
}

#[pymethods]
impl EllipseDescriptors {
    #[getter(handedness)]
    fn py_handedness(&self) -> String {
        self.handedness().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "EllipseDescriptors(absolute_phase={:.2}, ellipticity={:.2}, orientation={:.2}, degenerate={})",
            self.absolute_phase, self.ellipticity, self.orientation, self.degenerate
        )
    }
}

impl fmt::Display for EllipseDescriptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.degenerate {
            return write!(f, "Ellipse: undefined (zero field)");
        }
        write!(
            f,
            "Ellipse:
  - Absolute Phase (α): {:.2}°
  - Ellipticity Angle: {:.2}°
  - Orientation Angle: {:.2}°
  - Handedness: {}",
            self.absolute_phase,
            self.ellipticity,
            self.orientation,
            self.handedness()
        )
    }
}
