use nalgebra::{Point2, Point3};
use ndarray::Array1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_follow_components() {
        let x = Array1::from(vec![1.0, 2.0]);
        let y = Array1::from(vec![3.0, 4.0]);
        let z = Array1::from(vec![0.0, 0.5]);
        let trajectory = SampledTrajectory { x, y, z: Some(z) };
        let points = trajectory.points_3d().unwrap();
        assert_eq!(points[1], Point3::new(2.0, 4.0, 0.5));
        assert_eq!(trajectory.points_2d()[0], Point2::new(1.0, 3.0));
        assert!(trajectory.is_spatial());
    }
}

/// Field components sampled at uniformly spaced positions.
///
/// `x` and `y` hold the two transverse field components. `z` holds the
/// propagation coordinate of each sample for the 3D views and is absent for
/// the 2D ellipse. All sequences have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledTrajectory {
    pub x: Array1<f32>,
    pub y: Array1<f32>,
    pub z: Option<Array1<f32>>,
}

impl SampledTrajectory {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn is_spatial(&self) -> bool {
        self.z.is_some()
    }

    /// Transverse field vector at each sample.
    pub fn points_2d(&self) -> Vec<Point2<f32>> {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| Point2::new(x, y))
            .collect()
    }

    /// Field vector placed at its propagation coordinate, if there is one.
    pub fn points_3d(&self) -> Option<Vec<Point3<f32>>> {
        let z = self.z.as_ref()?;
        Some(
            self.x
                .iter()
                .zip(self.y.iter())
                .zip(z.iter())
                .map(|((&x, &y), &z)| Point3::new(x, y, z))
                .collect(),
        )
    }
}
