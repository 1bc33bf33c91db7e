//! Spherical area light.
//!
//! Outside the sphere, directions are drawn uniformly inside the cone it
//! subtends; inside, uniformly over the whole sphere.

use super::{luminance, Light, LightSample};
use crate::sampling::{gen_f32, random_unit_vector, OrthonormalBasis, UNIFORM_SPHERE_PDF};
use crate::{Emissive, HitRecord, Hittable, Sphere};
use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Round-off allowance on the near root, relative to the radius. Near roots
/// above `-NEAR_ROOT_TOLERANCE * radius` are kept (clamped to zero); only
/// roots clearly behind the shading point fall back to the far root.
const NEAR_ROOT_TOLERANCE: f32 = 1e-4;

/// A spherical emitter, e.g. a light bulb.
///
/// Intersection is delegated to an internal [`Sphere`] carrying the emissive
/// material, so the sphere math lives in one place.
pub struct SphereLight {
    center: Vec3,
    radius: f32,
    color: Color,
    intensity: f32,
    sphere: Sphere,
}

impl SphereLight {
    pub fn new(center: Vec3, radius: f32, color: Color, intensity: f32) -> Self {
        let material = Arc::new(Emissive::new(color, intensity));

        Self {
            center,
            radius,
            color,
            intensity,
            sphere: Sphere::new(center, radius, material),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance along `dir` (unit) from the shading point to the sphere
    /// surface, given `to_center = center - point`.
    fn surface_distance(&self, to_center: Vec3, dir: Vec3) -> f32 {
        let proj = to_center.dot(dir);
        let d_sq = to_center.length_squared() - proj * proj;
        // Sampled directions can graze the silhouette; clamp the discriminant
        let thc = (self.radius * self.radius - d_sq).max(0.0).sqrt();

        let near = proj - thc;
        if near >= -NEAR_ROOT_TOLERANCE * self.radius {
            near.max(0.0)
        } else {
            proj + thc
        }
    }
}

impl Light for SphereLight {
    fn sample(&self, point: Vec3, rng: &mut dyn RngCore) -> LightSample {
        let to_center = self.center - point;
        let distance_to_center = to_center.length();
        let radiance = self.color * self.intensity;

        if distance_to_center < self.radius {
            // Inside the light: every direction sees it
            return LightSample {
                direction: random_unit_vector(rng),
                distance: self.radius,
                intensity: radiance,
                pdf: UNIFORM_SPHERE_PDF,
            };
        }

        let onb = OrthonormalBasis::from_w(to_center / distance_to_center);

        // Cone subtended by the sphere
        let sin_theta_max = self.radius / distance_to_center;
        let sin2_theta_max = sin_theta_max * sin_theta_max;
        let cos_theta_max = (1.0 - sin2_theta_max).max(0.0).sqrt();
        // 1 - cos(theta_max), without cancellation for small or distant lights
        let one_minus_cos_max = sin2_theta_max / (1.0 + cos_theta_max);

        let u = gen_f32(rng);
        let v = gen_f32(rng);
        let cos_theta = 1.0 - u * one_minus_cos_max;
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * PI * v;

        let direction = onb
            .local(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
            .normalize();

        LightSample {
            direction,
            distance: self.surface_distance(to_center, direction),
            intensity: radiance,
            pdf: 1.0 / (2.0 * PI * one_minus_cos_max),
        }
    }

    fn power(&self) -> f32 {
        4.0 * PI * self.radius * self.radius * self.intensity * luminance(self.color)
    }
}

impl Hittable for SphereLight {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        self.sphere.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.sphere.bounding_box()
    }
}
