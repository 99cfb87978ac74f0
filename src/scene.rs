//! Renderer-facing description of the 2D and 3D views.
//!
//! Nothing here draws anything. The views only carry the fixed axis ranges,
//! the projection walls and the camera placement a plotting backend needs,
//! all derived from a sampled trajectory and the constants in [`config`].
//! The wall projections are the transverse components re-plotted against a
//! constant offset coordinate, so they share the trajectory's length.

use anyhow::Result;
use nalgebra::{Point2, Point3, Vector3};
use serde::Serialize;
use std::ops::RangeInclusive;

use crate::{config, field::Wave, settings::CameraSettings, trajectory::SampledTrajectory};


/// Fixed axes of the 2D ellipse plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneView {
    pub x_range: RangeInclusive<f32>,
    pub y_range: RangeInclusive<f32>,
    pub ticks: Vec<f32>,
    /// Dashed zero lines, horizontal then vertical.
    pub crosshair: [(Point2<f32>, Point2<f32>); 2],
}

impl Default for PlaneView {
    fn default() -> Self {
        let limit = config::PLANE_AXIS_LIMIT;
        let ticks = (-(limit as i32)..=limit as i32).map(|t| t as f32).collect();
        Self {
            x_range: -limit..=limit,
            y_range: -limit..=limit,
            ticks,
            crosshair: [
                (Point2::new(-limit, 0.0), Point2::new(limit, 0.0)),
                (Point2::new(0.0, -limit), Point2::new(0.0, limit)),
            ],
        }
    }
}

/// Fixed axes of the 3D wave plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceView {
    pub transverse_range: RangeInclusive<f32>,
    pub longitudinal_range: RangeInclusive<f32>,
    pub aspect: [f32; 3],
}

impl SpaceView {
    pub fn new(length: f32) -> Self {
        let limit = config::SPACE_TRANSVERSE_LIMIT;
        Self {
            transverse_range: -limit..=limit,
            longitudinal_range: 0.0..=length,
            aspect: config::SPACE_ASPECT,
        }
    }
}

/// Flat rectangle parallel to the propagation axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wall {
    pub name: &'static str,
    pub corners: [Point3<f32>; 4],
}

/// Polyline drawn on a wall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub name: &'static str,
    pub points: Vec<Point3<f32>>,
}

/// Camera position in normalised scene units, looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    /// Places the eye on a sphere of `radius` at the given azimuth and
    /// elevation in degrees.
    pub fn orbit(azimuth: f32, elevation: f32, radius: f32) -> Self {
        let az = azimuth.to_radians();
        let el = elevation.to_radians();
        Self {
            eye: Point3::new(
                radius * el.cos() * az.cos(),
                radius * el.cos() * az.sin(),
                radius * el.sin(),
            ),
            up: Vector3::y(),
        }
    }
}

/// Everything the 3D renderer draws besides the wave itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveScene {
    pub view: SpaceView,
    pub walls: [Wall; 2],
    pub projections: [Projection; 2],
    pub camera: Camera,
}

impl WaveScene {
    pub fn new(wave: &Wave, camera: &CameraSettings) -> Result<Self> {
        Ok(Self {
            view: SpaceView::new(wave.length),
            walls: walls(wave.length),
            projections: projections(&wave.trajectory)?,
            camera: Camera::orbit(camera.azimuth, camera.elevation, camera.radius),
        })
    }
}

/// The YZ wall at `x = +WALL_OFFSET` and the XZ back wall at `y = -WALL_OFFSET`.
pub fn walls(length: f32) -> [Wall; 2] {
    let (offset, half) = (config::WALL_OFFSET, config::WALL_HALF_WIDTH);
    [
        Wall {
            name: "YZ Wall",
            corners: [
                Point3::new(offset, -half, 0.0),
                Point3::new(offset, half, 0.0),
                Point3::new(offset, half, length),
                Point3::new(offset, -half, length),
            ],
        },
        Wall {
            name: "XZ Back Wall",
            corners: [
                Point3::new(-half, -offset, 0.0),
                Point3::new(half, -offset, 0.0),
                Point3::new(half, -offset, length),
                Point3::new(-half, -offset, length),
            ],
        },
    ]
}

/// X component pushed onto the back wall and Y component onto the YZ wall.
pub fn projections(trajectory: &SampledTrajectory) -> Result<[Projection; 2]> {
    let z = trajectory
        .z
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("wall projections need a propagation axis"))?;

    let x_component = trajectory
        .x
        .iter()
        .zip(z.iter())
        .map(|(&x, &z)| Point3::new(x, -config::WALL_OFFSET, z))
        .collect();
    let y_component = trajectory
        .y
        .iter()
        .zip(z.iter())
        .map(|(&y, &z)| Point3::new(config::WALL_OFFSET, y, z))
        .collect();

    Ok([
        Projection {
            name: "X Component",
            points: x_component,
        },
        Projection {
            name: "Y Component",
            points: y_component,
        },
    ])
}
