use std::ops::RangeInclusive;

/// Number of samples across one period of the 2D polarization ellipse.
pub const ELLIPSE_NUM_POINTS: usize = 300;
/// Wavelength of the propagating wave, in scene units.
pub const WAVE_WAVELENGTH: f32 = 1.5;
/// Number of wavelengths drawn along the propagation axis.
pub const WAVE_NUM_CYCLES: usize = 7;
/// Number of samples along the propagation axis.
pub const WAVE_NUM_POINTS: usize = 1000;
/// Added to `sin(2 * orientation)` when inverting ellipticity and orientation
/// to a phase delta, to avoid a division by zero at 0 and 90 degrees.
pub const PHASE_EPSILON: f64 = 1e-6;
/// Total field power below which the ellipse descriptors are undefined.
/// Only a field that vanishes in `f32` falls under it.
pub const ZERO_FIELD_THRESHOLD: f32 = f32::MIN_POSITIVE;
/// Ellipticity angle (degrees) below which a state is reported as linear.
pub const LINEAR_THRESHOLD: f32 = 1e-3;

/// Slider bounds for the field amplitudes.
pub const AMPLITUDE_BOUNDS: RangeInclusive<f32> = 0.0..=2.0;
/// Slider bounds for the phase difference, in degrees.
pub const PHASE_BOUNDS: RangeInclusive<f32> = -180.0..=180.0;
/// Slider bounds for the ellipticity angle, in degrees.
pub const ELLIPTICITY_BOUNDS: RangeInclusive<f32> = -45.0..=45.0;
/// Slider bounds for the orientation angle, in degrees.
pub const ORIENTATION_BOUNDS: RangeInclusive<f32> = 0.0..=180.0;

/// Half extent of both axes in the 2D ellipse view.
pub const PLANE_AXIS_LIMIT: f32 = 2.0;
/// Half extent of the transverse axes in the 3D wave view.
pub const SPACE_TRANSVERSE_LIMIT: f32 = 2.6;
/// Aspect ratio (x, y, z) of the 3D wave view.
pub const SPACE_ASPECT: [f32; 3] = [1.0, 1.0, 2.5];
/// Distance of the projection walls from the propagation axis.
pub const WALL_OFFSET: f32 = 2.5;
/// Half width of the projection walls across the transverse direction.
pub const WALL_HALF_WIDTH: f32 = 1.5;

/// Default camera azimuth in degrees.
pub const CAMERA_AZIMUTH: f32 = 165.0;
/// Default camera elevation in degrees.
pub const CAMERA_ELEVATION: f32 = 30.0;
/// Default camera distance in normalised scene units.
pub const CAMERA_RADIUS: f32 = 2.75;

/// Logo location relative to the project root.
pub const LOGO_PATH: &str = "assets/mrslab.png";
