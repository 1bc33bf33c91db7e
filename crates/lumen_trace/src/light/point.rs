//! Point light with inverse-square falloff.

use super::{luminance, Light, LightSample};
use lumen_math::{Color, Vec3};
use rand::RngCore;

/// A point light. Emits equally in all directions; hard shadows.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    position: Vec3,
    color: Color,
    intensity: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

impl Light for PointLight {
    fn sample(&self, point: Vec3, _rng: &mut dyn RngCore) -> LightSample {
        let to_light = self.position - point;
        let distance = to_light.length();

        // Inverse square falloff
        let attenuation = 1.0 / (distance * distance);

        LightSample {
            direction: to_light / distance,
            distance,
            intensity: self.color * self.intensity * attenuation,
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_point_light_sample() {
        let light = PointLight::new(Vec3::new(0.0, 5.0, 0.0), Color::ONE, 1.0);
        let mut rng = StdRng::seed_from_u64(0);

        let sample = light.sample(Vec3::ZERO, &mut rng);
        assert!((sample.distance - 5.0).abs() < 1e-6);
        assert!((sample.direction - Vec3::Y).length() < 1e-6);
        assert!((sample.intensity - Color::splat(1.0 / 25.0)).length() < 1e-6);
        assert_eq!(sample.pdf, 1.0);
    }

    #[test]
    fn test_point_light_power() {
        let light = PointLight::new(Vec3::ZERO, Color::new(1.0, 0.5, 0.0), 6.0);
        assert!((light.power() - 3.0).abs() < 1e-6);
        assert!(light.is_delta());
    }
}
