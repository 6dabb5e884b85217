//! Ray-object intersection system.
//!
//! Defines the [`Hittable`] trait for geometric primitives, [`HitRecord`] for
//! intersection results, and [`HittableList`] for aggregating a scene.

use glam::Vec3A;

use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;

/// Transient result of an intersection query.
///
/// Created fresh per query and discarded after shading; never persisted.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Point where the ray intersects the object
    pub p: Vec3A,
    /// Unit surface normal at the intersection point, oriented against the ray
    pub normal: Vec3A,
    /// Ray parameter t at the intersection point
    pub t: f32,
    /// True if the ray hit the front face, false for the back face
    pub front_face: bool,
    /// Material of the object at the hit point
    pub material: Material,
}

impl HitRecord {
    /// Build a record from an outward unit normal, flipping it so the stored
    /// normal always opposes the incident ray.
    pub fn new(r: &Ray, p: Vec3A, t: f32, outward_normal: Vec3A, material: Material) -> Self {
        let front_face = r.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };
        Self {
            p,
            normal,
            t,
            front_face,
            material,
        }
    }
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (`Sync + Send`): the scene is shared read-only across
/// all render workers.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection within the given parameter interval.
    ///
    /// Returns the hit record for the nearest intersection with t inside
    /// `ray_t`, or `None` if the ray misses.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

/// Collection of objects forming a scene.
///
/// Intersection is a linear scan over all objects; the query interval is
/// narrowed to the closest hit found so far, so later objects can only
/// improve the result.
#[derive(Default)]
pub struct HittableList {
    /// Vector of boxed hittable objects
    pub objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }
}

impl Hittable for HittableList {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest_so_far = ray_t.max;
        let mut closest_hit = None;

        for object in &self.objects {
            if let Some(rec) = object.hit(r, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                closest_hit = Some(rec);
            }
        }

        closest_hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;
    use crate::sphere::Sphere;

    fn gray() -> Material {
        Material::Lambertian {
            albedo: Color::new(0.5, 0.5, 0.5),
        }
    }

    #[test]
    fn test_empty_list_misses() {
        let world = HittableList::new();
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        assert!(world.hit(&r, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_closest_hit_wins() {
        // Three overlapping spheres along -z; the reported t must be the
        // minimum of the three individual hits, regardless of insertion order.
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Vec3A::new(0.0, 0.0, -3.0), 0.25, gray())));
        world.add(Box::new(Sphere::new(Vec3A::new(0.0, 0.0, -1.0), 0.25, gray())));
        world.add(Box::new(Sphere::new(Vec3A::new(0.0, 0.0, -2.0), 0.25, gray())));

        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let rec = world
            .hit(&r, Interval::new(0.001, f32::INFINITY))
            .expect("ray passes through all three spheres");
        assert!((rec.t - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_interval_excludes_near_hits() {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Vec3A::new(0.0, 0.0, -1.0), 0.25, gray())));
        world.add(Box::new(Sphere::new(Vec3A::new(0.0, 0.0, -3.0), 0.25, gray())));

        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        // Window past the first sphere entirely.
        let rec = world
            .hit(&r, Interval::new(1.5, f32::INFINITY))
            .expect("far sphere still in range");
        assert!((rec.t - 2.75).abs() < 1e-5);
    }

    #[test]
    fn test_back_face_normal_flipped() {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Vec3A::ZERO, 1.0, gray())));

        // Ray starting inside the sphere hits the back face; the stored
        // normal must still oppose the ray direction.
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let rec = world
            .hit(&r, Interval::new(0.001, f32::INFINITY))
            .expect("exit hit from inside");
        assert!(!rec.front_face);
        assert!(rec.normal.dot(r.direction) < 0.0);
    }
}
