//! Material interface consumed by hit records.
//!
//! Scattering and BRDF evaluation live with the renderer; this core only
//! needs to hand a material reference back to the caller and to know what a
//! surface emits.

use lumen_math::{Color, Vec3};

/// Trait for materials attached to intersectable surfaces.
pub trait Material: Send + Sync {
    /// Get emitted light from this material.
    ///
    /// Returns the color of light emitted at the given UV coordinates and point.
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }

    /// Diffuse reflectance, for renderers that want a cheap surface tint.
    fn albedo(&self) -> Color {
        Color::ZERO
    }

    /// True if the material emits light.
    fn is_emissive(&self) -> bool {
        false
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn albedo(&self) -> Color {
        self.albedo
    }
}

/// Emissive material owned by area and sphere lights.
#[derive(Debug, Clone, Copy)]
pub struct Emissive {
    color: Color,
    intensity: f32,
}

impl Emissive {
    /// Create a new emitter with the given color and brightness multiplier.
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }

    /// Radiance leaving the surface.
    pub fn radiance(&self) -> Color {
        self.color * self.intensity
    }
}

impl Material for Emissive {
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.radiance()
    }

    fn is_emissive(&self) -> bool {
        true
    }
}
