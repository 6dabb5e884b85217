//! Ray representation for 3D ray tracing.
//!
//! A ray is the half-line r(t) = origin + t * direction. The valid range of t
//! is supplied by callers as an [`Interval`](crate::interval::Interval) and is
//! never stored on the ray itself.

use glam::Vec3A;

/// Ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: Vec3A,

    /// Direction vector of the ray.
    ///
    /// Not required to be normalized; intersection code works with the
    /// squared length directly.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Compute the point at parameter t along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_along_ray() {
        let r = Ray::new(Vec3A::new(1.0, 0.0, 0.0), Vec3A::new(0.0, 2.0, 0.0));
        assert_eq!(r.at(0.0), Vec3A::new(1.0, 0.0, 0.0));
        assert_eq!(r.at(1.5), Vec3A::new(1.0, 3.0, 0.0));
        assert_eq!(r.at(-1.0), Vec3A::new(1.0, -2.0, 0.0));
    }
}
