//! Camera for ray generation.
//!
//! Pinhole camera with a fixed virtual viewport computed once at construction.
//! `get_ray` maps normalized viewport coordinates to world-space rays; the
//! camera is read-only afterwards and safe to share across render workers.

use glam::Vec3A;

use crate::ray::Ray;

/// Pinhole camera mapping normalized viewport coordinates to rays.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye point all primary rays originate from.
    origin: Vec3A,
    /// World position of the viewport's lower-left corner.
    lower_left_corner: Vec3A,
    /// Vector spanning the viewport's horizontal edge.
    horizontal: Vec3A,
    /// Vector spanning the viewport's vertical edge.
    vertical: Vec3A,
}

impl Camera {
    /// Create a camera looking from `lookfrom` towards `lookat`.
    ///
    /// `vfov` is the vertical field of view in degrees; `aspect_ratio` is
    /// width over height. The viewport sits at focal distance 1.
    pub fn new(lookfrom: Vec3A, lookat: Vec3A, vup: Vec3A, vfov: f32, aspect_ratio: f32) -> Self {
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Orthonormal camera frame: w opposes the view direction
        let w = (lookfrom - lookat).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = lookfrom;
        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
        }
    }

    /// Generate the ray through viewport coordinates (u, v) in [0, 1],
    /// measured from the lower-left corner.
    pub fn get_ray(&self, u: f32, v: f32) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + u * self.horizontal + v * self.vertical - self.origin,
        )
    }
}

impl Default for Camera {
    /// Eye at the origin looking down -z, 90° vertical FOV, 16:9 viewport.
    fn default() -> Self {
        Self::new(
            Vec3A::ZERO,
            Vec3A::new(0.0, 0.0, -1.0),
            Vec3A::new(0.0, 1.0, 0.0),
            90.0,
            16.0 / 9.0,
        )
    }
}
