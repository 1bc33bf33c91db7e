//! Infinite plane primitive.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use std::sync::Arc;

/// Rays closer than this to parallel are treated as missing the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// An infinite plane through `point` with unit `normal`.
#[derive(Clone)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    material: Arc<dyn Material>,
}

impl Plane {
    /// Create a plane. The normal is normalized here.
    pub fn new(point: Vec3, normal: Vec3, material: Arc<dyn Material>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
            material,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Plane {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Tiling UVs from the fractional x/z position
        let p = ray.at(t);
        let uv = (p.x - p.x.floor(), p.z - p.z.floor());
        Some(HitRecord::new(ray, t, self.normal, self.material.as_ref(), uv))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        None
    }
}
