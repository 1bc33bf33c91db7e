//! Parallelogram area light.
//!
//! Sampled uniformly over its surface and converted to solid angle at the
//! shading point. It is also a [`Hittable`] carrying its own emissive material.

use super::{luminance, Light, LightSample};
use crate::sampling::gen_f32;
use crate::{Emissive, HitRecord, Hittable};
use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Padding on the bounding box; the rectangle itself is flat.
const BOX_PADDING: f32 = 1e-3;

/// An area light spanned by `corner + s*edge1 + t*edge2`, s,t in [0,1].
///
/// The edges need not be perpendicular; hits are located with the same
/// parallelogram coordinates that sampling uses. Emits from the side its
/// normal `edge1 x edge2` points to.
#[derive(Debug, Clone)]
pub struct AreaLight {
    corner: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    color: Color,
    intensity: f32,
    normal: Vec3,
    /// `n / |n|^2` for the unnormalized normal; maps plane offsets to (s, t)
    dual: Vec3,
    area: f32,
    material: Emissive,
}

impl AreaLight {
    pub fn new(corner: Vec3, edge1: Vec3, edge2: Vec3, color: Color, intensity: f32) -> Self {
        let cross = edge1.cross(edge2);

        Self {
            corner,
            edge1,
            edge2,
            color,
            intensity,
            normal: cross.normalize(),
            dual: cross / cross.length_squared(),
            area: cross.length(),
            material: Emissive::new(color, intensity),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn center(&self) -> Vec3 {
        self.corner + (self.edge1 + self.edge2) * 0.5
    }

    fn corners(&self) -> [Vec3; 4] {
        [
            self.corner,
            self.corner + self.edge1,
            self.corner + self.edge2,
            self.corner + self.edge1 + self.edge2,
        ]
    }
}

impl Light for AreaLight {
    fn sample(&self, point: Vec3, rng: &mut dyn RngCore) -> LightSample {
        let s = gen_f32(rng);
        let t = gen_f32(rng);
        let light_point = self.corner + self.edge1 * s + self.edge2 * t;

        let to_light = light_point - point;
        let distance = to_light.length();
        let direction = to_light / distance;

        // Negated test so a NaN cosine (zero-area light) also lands here
        let cos_angle = -direction.dot(self.normal);
        if !(cos_angle > 0.0) {
            return LightSample {
                direction,
                distance,
                intensity: Color::ZERO,
                pdf: 1.0,
            };
        }

        // Area measure to solid-angle measure
        let pdf = (distance * distance) / (cos_angle * self.area);

        LightSample {
            direction,
            distance,
            intensity: self.color * self.intensity,
            pdf,
        }
    }

    fn power(&self) -> f32 {
        self.area * self.intensity * luminance(self.color)
    }
}

impl Hittable for AreaLight {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.corner - ray.origin()).dot(self.normal) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Parallelogram coordinates of the hit, exact for sheared edges too
        let local = ray.at(t) - self.corner;
        let u = self.dual.dot(local.cross(self.edge2));
        let v = self.dual.dot(self.edge1.cross(local));
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, &self.material, (u, v)))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let [p0, p1, p2, p3] = self.corners();
        let bbox = Aabb::surrounding(&Aabb::from_points(p0, p3), &Aabb::from_points(p1, p2));

        Some(bbox.expand(2.0 * BOX_PADDING))
    }
}
