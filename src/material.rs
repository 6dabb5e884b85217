//! Material system for ray tracing.
//!
//! Two material families: Lambertian (diffuse) and Metal (specular). A
//! material is a small copyable value that is stateless apart from its albedo;
//! scattering is a pure function of the incoming ray and the hit record.

use glam::Vec3A;

use crate::hittable::HitRecord;
use crate::random;
use crate::ray::Ray;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Result of a successful scatter: the re-emitted ray and the color filter
/// applied to whatever radiance it brings back.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    /// Component-wise color attenuation applied to the scattered radiance.
    pub attenuation: Color,
    /// Outgoing ray, originating at the hit point.
    pub scattered: Ray,
}

/// Material kinds for ray tracing.
///
/// Tagged-enum dispatch rather than trait objects: materials are tiny and
/// `Copy`, so they are stored by value on primitives and in hit records.
#[derive(Debug, Clone, Copy)]
pub enum Material {
    /// Lambertian diffuse material for matte surfaces.
    Lambertian {
        /// Surface color/reflectance.
        albedo: Color,
    },

    /// Metallic material with specular reflection.
    Metal {
        /// Metal color.
        albedo: Color,
        /// Surface roughness (0.0 = mirror, 1.0 = rough).
        fuzz: f32,
    },
}

impl Material {
    /// Compute ray scattering for this material.
    ///
    /// Returns `None` when the ray is absorbed, terminating the path with
    /// zero contribution.
    pub fn scatter(&self, r_in: &Ray, rec: &HitRecord) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => Self::scatter_lambertian(albedo, rec),
            Material::Metal { albedo, fuzz } => Self::scatter_metal(albedo, fuzz, r_in, rec),
        }
    }

    /// Diffuse scattering: normal plus a random unit vector approximates a
    /// cosine-weighted lobe.
    fn scatter_lambertian(albedo: Color, rec: &HitRecord) -> Option<Scatter> {
        let direction = lambertian_direction(rec.normal, random::random_unit_vector());
        Some(Scatter {
            attenuation: albedo,
            scattered: Ray::new(rec.p, direction),
        })
    }

    /// Mirror reflection with optional fuzz perturbation. The ray is absorbed
    /// when the perturbed direction ends up below the surface.
    fn scatter_metal(albedo: Color, fuzz: f32, r_in: &Ray, rec: &HitRecord) -> Option<Scatter> {
        let reflected = reflect(r_in.direction.normalize(), rec.normal);
        let direction = reflected + fuzz.min(1.0) * random::random_unit_vector();

        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(Scatter {
            attenuation: albedo,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Diffuse scatter direction for a sampled unit offset.
///
/// When the offset nearly cancels the normal the sum is too short to
/// normalize safely, so it falls back to the bare normal instead of letting
/// NaNs propagate into the path.
fn lambertian_direction(normal: Vec3A, offset: Vec3A) -> Vec3A {
    let direction = normal + offset;
    if direction.length_squared() < 1e-8 {
        normal
    } else {
        direction
    }
}

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}
