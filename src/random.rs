//! Random number generation for sampling.
//!
//! Thread-local ChaCha20 PRNG; each render worker draws from its own
//! generator, so there is no seeding discipline and pixel values are not
//! bit-reproducible across runs or thread counts.

use glam::Vec3A;
use rand::{rng, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::cell::RefCell;

thread_local! {
    /// Thread-local ChaCha20 PRNG for quality random numbers.
    static RNG: RefCell<ChaCha20Rng> = RefCell::new(ChaCha20Rng::from_rng(&mut rng()));
}

/// Generate a random f32 in [0.0, 1.0)
pub fn random_f32() -> f32 {
    RNG.with(|rng| rng.borrow_mut().random())
}

/// Generate a random unit vector uniformly distributed on the unit sphere.
pub fn random_unit_vector() -> Vec3A {
    RNG.with(|rng| {
        let mut rng_mut = rng.borrow_mut();

        // Uniform θ in [0, 2π), uniform cos(φ) in [-1, 1]
        let theta = 2.0 * std::f32::consts::PI * rng_mut.random::<f32>();
        let cos_phi = 2.0 * rng_mut.random::<f32>() - 1.0;
        let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();

        Vec3A::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi)
    })
}
