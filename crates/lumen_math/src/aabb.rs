use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Stored as a min/max corner pair. `min <= max` componentwise for every box
/// produced by a bounded shape; only `EMPTY` (the identity of `surrounding`)
/// is inverted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from its minimum and maximum corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Get the extent along a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis(&self, n: usize) -> Interval {
        Interval::new(self.min[n], self.max[n])
    }

    /// Grow by `delta` in total along every axis, half on each side.
    pub fn expand(&self, delta: f32) -> Aabb {
        let [x, y, z] = [0, 1, 2].map(|n| self.axis(n).expand(delta));
        Aabb::new(Vec3::new(x.min, y.min, z.min), Vec3::new(x.max, y.max, z.max))
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. A zero direction component yields an infinite
    /// inverse; the `0 * inf` NaN that appears when the origin sits exactly on
    /// a slab face is dropped by `f32::max`/`f32::min`, leaving that slab
    /// unconstrained.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let dir = r.direction[axis];
            let adinv = if dir == 0.0 { f32::INFINITY } else { 1.0 / dir };
            let mut t0 = (self.min[axis] - r.origin[axis]) * adinv;
            let mut t1 = (self.max[axis] - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// True if `p` lies inside the box grown by `tolerance` on every side.
    pub fn contains_point(&self, p: Vec3, tolerance: f32) -> bool {
        let pad = Vec3::splat(tolerance);
        p.cmpge(self.min - pad).all() && p.cmple(self.max + pad).all()
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let [x, y, z] = [0, 1, 2].map(|n| self.axis(n).size());

        if x > y && x > z {
            0
        } else if y > z {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Inverted box; `surrounding(EMPTY, b) == b`.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };
}
