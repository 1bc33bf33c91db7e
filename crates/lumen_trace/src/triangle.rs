//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use std::sync::Arc;

/// Determinants below this mean the ray runs parallel to the triangle plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Padding applied to every side of the bounding box so axis-aligned
/// triangles never produce a zero-thickness box.
pub const BOX_PADDING: f32 = 1e-4;

/// A triangle primitive.
#[derive(Clone)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed edges from v0
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices (counter-clockwise winding
    /// gives the front face).
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize();

        let bbox = Aabb::surrounding(&Aabb::from_points(v0, v1), &Aabb::from_points(v2, v2))
            .expand(2.0 * BOX_PADDING);

        Self {
            v0,
            v1,
            v2,
            edge1,
            edge2,
            normal,
            material,
            bbox,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);
        if !ray_t.contains(t) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, self.material.as_ref(), (u, v)))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }
}
