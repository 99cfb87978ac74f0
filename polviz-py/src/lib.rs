use polviz::{
    ellipse::EllipseDescriptors,
    field::{PolarizationField, Wave},
    params::Sampling,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn field(sampling: Sampling) -> PyResult<PolarizationField> {
    PolarizationField::new(sampling).map_err(|e| PyValueError::new_err(e.to_string()))
}

fn unpack_wave(wave: Wave) -> (Vec<f32>, Vec<f32>, Vec<f32>, f32) {
    let z = wave.trajectory.z.map(|z| z.to_vec()).unwrap_or_default();
    (
        wave.trajectory.x.to_vec(),
        wave.trajectory.y.to_vec(),
        z,
        wave.phase_delta,
    )
}

/// Polarization ellipse from the two amplitudes and the phase difference in
/// degrees. Returns `(ex, ey, descriptors)`.
#[pyfunction]
#[pyo3(signature = (amplitude_h, amplitude_v, phase_diff, num_points=300))]
fn ellipse(
    amplitude_h: f32,
    amplitude_v: f32,
    phase_diff: f32,
    num_points: usize,
) -> PyResult<(Vec<f32>, Vec<f32>, EllipseDescriptors)> {
    if amplitude_h < 0.0 || amplitude_v < 0.0 {
        return Err(PyValueError::new_err("amplitudes must not be negative"));
    }
    let ellipse =
        field(Sampling::period(num_points))?.ellipse(amplitude_h, amplitude_v, phase_diff);
    Ok((
        ellipse.trajectory.x.to_vec(),
        ellipse.trajectory.y.to_vec(),
        ellipse.descriptors,
    ))
}

/// Propagating wave from the ellipticity and orientation angles in degrees.
/// Returns `(ex, ey, z, phase_delta)` with the phase delta in radians.
#[pyfunction]
fn wave_from_ellipticity(
    ellipticity: f32,
    orientation: f32,
) -> PyResult<(Vec<f32>, Vec<f32>, Vec<f32>, f32)> {
    let wave = field(Sampling::propagation())?.wave_from_ellipticity(ellipticity, orientation);
    Ok(unpack_wave(wave))
}

/// Propagating wave from the orientation and phase difference in degrees.
/// Returns `(ex, ey, z, phase_delta)` with the phase delta in radians.
#[pyfunction]
fn wave_from_phase(
    orientation: f32,
    phase_diff: f32,
) -> PyResult<(Vec<f32>, Vec<f32>, Vec<f32>, f32)> {
    let wave = field(Sampling::propagation())?.wave_from_phase(orientation, phase_diff);
    Ok(unpack_wave(wave))
}

/// A Python module implemented in Rust.
#[pymodule]
fn _polviz_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ellipse, m)?)?;
    m.add_function(wrap_pyfunction!(wave_from_ellipticity, m)?)?;
    m.add_function(wrap_pyfunction!(wave_from_phase, m)?)?;
    m.add_class::<EllipseDescriptors>()?;
    Ok(())
}
