//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use std::sync::Arc;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point, borrowed from the shape that was hit
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        material: &'a dyn Material,
        (u, v): (f32, f32),
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("u", &self.u)
            .field("v", &self.v)
            .field("t", &self.t)
            .field("front_face", &self.front_face)
            .finish_non_exhaustive()
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the nearest intersection with `ray_t.min <= t <= ray_t.max`.
    ///
    /// Roots outside the window are rejected even when they are valid
    /// intersections; callers rely on this to skip self-hits and to cull
    /// against the closest hit found so far.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;

    /// Get the axis-aligned bounding box of this object, or `None` if unbounded.
    fn bounding_box(&self) -> Option<Aabb>;
}

impl<T: Hittable + ?Sized> Hittable for Arc<T> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        (**self).hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        (**self).bounding_box()
    }
}

impl<T: Hittable + ?Sized> Hittable for Box<T> {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        (**self).hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        (**self).bounding_box()
    }
}

/// Nearest hit over a slice of objects, shrinking the window as hits are found.
pub(crate) fn closest_hit<'a, H: Hittable>(
    objects: &'a [H],
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let mut closest: Option<HitRecord<'a>> = None;

    for object in objects {
        let window = ray_t.with_max(closest.as_ref().map_or(ray_t.max, |rec| rec.t));
        if let Some(rec) = object.hit(ray, window) {
            closest = Some(rec);
        }
    }

    closest
}

/// A list of hittable objects.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    /// `None` when empty or when any member is unbounded
    bbox: Option<Aabb>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: None,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        let object_box = object.bounding_box();
        self.bbox = if self.objects.is_empty() {
            object_box
        } else {
            self.bbox
                .zip(object_box)
                .map(|(acc, b)| Aabb::surrounding(&acc, &b))
        };
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = None;
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the members over, e.g. to build a BVH.
    pub fn into_objects(self) -> Vec<Box<dyn Hittable>> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        closest_hit(&self.objects, ray, ray_t)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.bbox
    }
}
