//! scanray path tracer
//!
//! CPU Monte Carlo path tracer over sphere primitives with Lambertian and
//! Metal materials. Rendering is parallelized by scanline: worker threads
//! claim rows from a shared atomic counter until the image is covered.
//! Outputs PNG and PPM, with optional TEV viewer integration.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod hittable;
pub mod instrument;
pub mod interval;
pub mod material;
pub mod output;
pub mod random;
pub mod ray;
pub mod renderer;
pub mod sphere;
