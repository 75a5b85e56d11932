//! Camera auto-framing.
//!
//! Places the camera so that a bounding volume fits the viewport while keeping
//! the current viewing direction.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Rad, Vector3};

/// Perspective camera state touched by framing and orbiting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub fov: Rad<f32>,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub far: f32,
}

impl Viewport {
    #[inline]
    pub fn distance(&self) -> f32 {
        (self.target - self.position).magnitude()
    }

    /// Unit vector from the camera towards the target, `-Z` when the two coincide.
    pub fn direction(&self) -> Vector3<f32> {
        let dir = self.target - self.position;
        if dir.magnitude2() > f32::EPSILON {
            dir.normalize()
        } else {
            -Vector3::unit_z()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingVolume {
    min: Vector3<f32>,
    max: Vector3<f32>,
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self {
            min: Vector3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vector3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }
}

impl BoundingVolume {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        let mut bbox = Self::default();
        bbox.merge(&min);
        bbox.merge(&max);
        bbox
    }

    /// Box around a flat `[x, y, z, x, y, z, ...]` buffer.
    pub fn from_points<T: Copy + Into<f64>>(points: &[T]) -> Self {
        let coord = |v: T| -> f32 {
            let v: f64 = v.into();
            v as f32
        };
        let mut bbox = Self::default();
        for p in points.chunks_exact(3) {
            bbox.merge(&Vector3::new(coord(p[0]), coord(p[1]), coord(p[2])));
        }
        bbox
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn merge(&mut self, point: &Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    #[inline]
    pub fn merge_box(&mut self, other: &BoundingVolume) {
        if other.is_empty() {
            return;
        }
        self.merge(&other.min);
        self.merge(&other.max);
    }

    pub fn center(&self) -> Point3<f32> {
        if self.is_empty() {
            return Point3::origin();
        }
        Point3::from_vec((self.min + self.max) / 2.0)
    }

    pub fn size(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::new(0.0, 0.0, 0.0);
        }
        self.max - self.min
    }

    #[inline]
    pub fn max_dim(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }
}

/// Tuning for [`frame_object`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Framing {
    pub padding: f32,
    pub min_far: f32,
    /// Floor for degenerate volumes, keeps the camera off the target.
    pub min_distance: f32,
}

impl Default for Framing {
    fn default() -> Self {
        Self {
            padding: 1.5,
            min_far: 2000.0,
            min_distance: 1.0,
        }
    }
}

/// Distance at which an object of extent `max_dim` fills `fov`, times `padding`.
#[inline]
pub fn fitting_distance(max_dim: f32, fov: Rad<f32>, padding: f32) -> f32 {
    (max_dim / 2.0 / (fov.0 / 2.0).tan()).abs() * padding
}

pub fn frame_object(bbox: &BoundingVolume, viewport: &Viewport, framing: &Framing) -> Viewport {
    let center = if bbox.is_empty() {
        viewport.target
    } else {
        bbox.center()
    };
    let fitted = fitting_distance(bbox.max_dim(), viewport.fov, framing.padding);
    let distance = if fitted > 0.0 && fitted.is_finite() {
        fitted
    } else {
        framing.min_distance
    };
    let dir = viewport.direction();

    Viewport {
        fov: viewport.fov,
        position: center - dir * distance,
        target: center,
        far: (distance * 2.0).max(framing.min_far),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Deg;

    fn viewport(fov_deg: f32) -> Viewport {
        Viewport {
            fov: Deg(fov_deg).into(),
            position: Point3::new(10.0, 10.0, 10.0),
            target: Point3::new(0.0, 0.0, 0.0),
            far: 2000.0,
        }
    }

    #[test]
    fn test_bounding_volume_from_points() {
        let bbox = BoundingVolume::from_points(&[1.0f64, -2.0, 3.0, -1.0, 4.0, 5.0]);
        assert_eq!(bbox.center(), Point3::new(0.0, 1.0, 4.0));
        assert_eq!(bbox.size(), Vector3::new(2.0, 6.0, 2.0));
        assert_relative_eq!(bbox.max_dim(), 6.0);
    }

    #[test]
    fn test_empty_volume() {
        let mut bbox = BoundingVolume::default();
        assert!(bbox.is_empty());
        assert_eq!(bbox.max_dim(), 0.0);
        bbox.merge_box(&BoundingVolume::default());
        assert!(bbox.is_empty());
    }

    #[test]
    fn test_frame_reference_scene() {
        let bbox = BoundingVolume::new(Vector3::new(-5.0, -5.0, -5.0), Vector3::new(5.0, 5.0, 5.0));
        let framed = frame_object(&bbox, &viewport(75.0), &Framing::default());

        let expected = 5.0 / (37.5f32.to_radians()).tan() * 1.5;
        assert_relative_eq!(framed.distance(), expected, epsilon = 1e-3);
        assert_relative_eq!(framed.distance(), 9.77, epsilon = 1e-2);
        assert_eq!(framed.far, 2000.0);
        assert_eq!(framed.target, Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_frame_keeps_direction() {
        let vp = viewport(75.0);
        let bbox = BoundingVolume::new(Vector3::new(2.0, 0.0, 0.0), Vector3::new(4.0, 1.0, 1.0));
        let framed = frame_object(&bbox, &vp, &Framing::default());

        let before = vp.direction();
        let after = framed.direction();
        assert_relative_eq!(before.x, after.x, epsilon = 1e-5);
        assert_relative_eq!(before.y, after.y, epsilon = 1e-5);
        assert_relative_eq!(before.z, after.z, epsilon = 1e-5);
        assert_eq!(framed.target, bbox.center());
    }

    #[test]
    fn test_far_plane_covers_large_objects() {
        let bbox = BoundingVolume::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(5000.0, 10.0, 10.0),
        );
        for fov in [20.0, 45.0, 75.0, 120.0] {
            let framed = frame_object(&bbox, &viewport(fov), &Framing::default());
            let distance = framed.distance();
            assert!(distance > 0.0);
            assert!(framed.far >= (2.0 * distance).max(2000.0) - 1.0);
            assert_eq!(framed.target, bbox.center());
        }
    }

    #[test]
    fn test_small_volume_is_not_floored() {
        let vp = viewport(75.0);
        let bbox = BoundingVolume::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.2, 0.1, 0.1));
        let framed = frame_object(&bbox, &vp, &Framing::default());

        let expected = fitting_distance(0.2, vp.fov, 1.5);
        assert!(expected < Framing::default().min_distance);
        assert_relative_eq!(framed.distance(), expected, epsilon = 1e-4);
        assert_eq!(framed.target, bbox.center());
    }

    #[test]
    fn test_degenerate_volume_uses_floor() {
        let point = BoundingVolume::new(Vector3::new(3.0, 3.0, 3.0), Vector3::new(3.0, 3.0, 3.0));
        let framing = Framing {
            min_distance: 4.0,
            ..Framing::default()
        };
        let framed = frame_object(&point, &viewport(75.0), &framing);
        assert_relative_eq!(framed.distance(), 4.0, epsilon = 1e-4);
        assert_eq!(framed.target, Point3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_camera_on_target_looks_down_z() {
        let vp = Viewport {
            position: Point3::new(0.0, 0.0, 0.0),
            ..viewport(75.0)
        };
        let bbox = BoundingVolume::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let framed = frame_object(&bbox, &vp, &Framing::default());
        assert!(framed.position.z > 0.0);
        assert_relative_eq!(framed.position.x, 0.0);
        assert_relative_eq!(framed.position.y, 0.0);
    }
}
