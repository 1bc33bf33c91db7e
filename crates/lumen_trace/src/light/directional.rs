//! Light from infinitely far away, arriving along one direction.

use super::{luminance, Light, LightSample};
use lumen_math::{Color, Vec3};
use rand::RngCore;

/// A directional light (like the sun): parallel rays, no falloff.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Unit direction the light travels in
    direction: Vec3,
    color: Color,
    intensity: f32,
}

impl DirectionalLight {
    /// `direction` is the direction the light travels; it is normalized here.
    pub fn new(direction: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }
}

impl Light for DirectionalLight {
    fn sample(&self, _point: Vec3, _rng: &mut dyn RngCore) -> LightSample {
        LightSample {
            direction: -self.direction,
            distance: f32::INFINITY,
            intensity: self.color * self.intensity,
            pdf: 1.0,
        }
    }

    fn power(&self) -> f32 {
        self.intensity * luminance(self.color)
    }

    fn is_delta(&self) -> bool {
        true
    }
}
