//! Sampling helpers shared by the lights.

use lumen_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Density of a direction drawn uniformly over the whole sphere.
pub const UNIFORM_SPHERE_PDF: f32 = 1.0 / (4.0 * PI);

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Generate a random unit vector uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Uniform z in [-1, 1] and uniform azimuth give a uniform sphere
    let z = 2.0 * gen_f32(rng) - 1.0;
    let phi = 2.0 * PI * gen_f32(rng);
    let r = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Right-handed tangent frame around a unit axis `w`.
#[derive(Debug, Clone, Copy)]
pub struct OrthonormalBasis {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl OrthonormalBasis {
    /// Build a frame whose third axis is `w` (must be unit length).
    pub fn from_w(w: Vec3) -> Self {
        let up = if w.y.abs() < 0.999 { Vec3::Y } else { Vec3::X };
        let u = up.cross(w).normalize();
        let v = w.cross(u);
        Self { u, v, w }
    }

    /// Map local coordinates onto the frame.
    pub fn local(&self, a: f32, b: f32, c: f32) -> Vec3 {
        self.u * a + self.v * b + self.w * c
    }
}
