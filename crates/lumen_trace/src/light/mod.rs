//! Light sources and power-weighted light selection.
//!
//! A [`Light`] answers one question: from this shading point, which
//! direction leads to the light, how far away is it, how much arrives, and
//! with what probability density was that direction drawn. Area and sphere
//! lights are also [`Hittable`](crate::Hittable) so camera and bounce rays
//! can see them.

mod area;
mod directional;
mod list;
mod point;
mod sphere;

pub use area::AreaLight;
pub use directional::DirectionalLight;
pub use list::LightList;
pub use point::PointLight;
pub use sphere::SphereLight;

use lumen_math::{Color, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// One draw from a light, as seen from a shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit direction from the shading point toward the light
    pub direction: Vec3,
    /// Distance to the sampled point on the light (infinite for directional lights)
    pub distance: f32,
    /// Light arriving along `direction`
    pub intensity: Color,
    /// Solid-angle density of `direction`; 1 for delta lights
    pub pdf: f32,
}

impl LightSample {
    /// A sample that contributes nothing.
    pub fn none() -> Self {
        Self {
            direction: Vec3::ZERO,
            distance: 0.0,
            intensity: Color::ZERO,
            pdf: 1.0,
        }
    }

    /// True if the sample carries any light.
    pub fn is_black(&self) -> bool {
        self.intensity == Color::ZERO
    }
}

/// Trait for anything that can illuminate a point.
pub trait Light: Send + Sync {
    /// Draw a direction toward the light from `point`.
    fn sample(&self, point: Vec3, rng: &mut dyn RngCore) -> LightSample;

    /// Coarse emitted power, only meaningful relative to other lights.
    fn power(&self) -> f32;

    /// Delta lights have no angular extent; their `pdf` of 1 is a marker, not
    /// a density, and must not be used in multiple-importance weights.
    fn is_delta(&self) -> bool {
        false
    }
}

impl<T: Light + ?Sized> Light for Arc<T> {
    fn sample(&self, point: Vec3, rng: &mut dyn RngCore) -> LightSample {
        (**self).sample(point, rng)
    }

    fn power(&self) -> f32 {
        (**self).power()
    }

    fn is_delta(&self) -> bool {
        (**self).is_delta()
    }
}

impl<T: Light + ?Sized> Light for Box<T> {
    fn sample(&self, point: Vec3, rng: &mut dyn RngCore) -> LightSample {
        (**self).sample(point, rng)
    }

    fn power(&self) -> f32 {
        (**self).power()
    }

    fn is_delta(&self) -> bool {
        (**self).is_delta()
    }
}

/// Mean of the RGB channels.
#[inline]
pub(crate) fn luminance(color: Color) -> f32 {
    (color.x + color.y + color.z) / 3.0
}
