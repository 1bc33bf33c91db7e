//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A drop-in replacement for [`HittableList`](crate::HittableList): same
//! nearest-hit result and same conservative bounding box, cheaper traversal.
//! Unbounded members (planes) cannot be placed in the tree, so they are kept
//! in a side list and tested linearly after the tree.

use crate::hittable::closest_hit;
use crate::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<Box<dyn Hittable>>,
        bbox: Aabb,
    },
    /// Empty node (no bounded members).
    Empty,
}

/// A member paired with its box so the build never re-queries it.
struct Bounded {
    bbox: Aabb,
    object: Box<dyn Hittable>,
}

impl BvhNode {
    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort objects by centroid on the longest
    /// axis of the centroid bounds, split in half, recurse.
    fn build(mut members: Vec<Bounded>, stats: &mut BuildStats) -> Self {
        let n = members.len();

        let bounds = members
            .iter()
            .fold(Aabb::EMPTY, |acc, m| Aabb::surrounding(&acc, &m.bbox));

        if n <= LEAF_MAX_SIZE {
            stats.leaves += 1;
            return BvhNode::Leaf {
                objects: members.into_iter().map(|m| m.object).collect(),
                bbox: bounds,
            };
        }

        let centroid_bounds = members.iter().fold(Aabb::EMPTY, |acc, m| {
            let c = m.bbox.centroid();
            Aabb::surrounding(&acc, &Aabb::new(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        members.sort_unstable_by(|a, b| {
            a.bbox.centroid()[axis]
                .partial_cmp(&b.bbox.centroid()[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_members = members.split_off(n / 2);
        stats.branches += 1;

        BvhNode::Branch {
            left: Box::new(Self::build(members, stats)),
            right: Box::new(Self::build(right_members, stats)),
            bbox: bounds,
        }
    }

    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                closest_hit(objects, ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, ray_t.with_max(right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Option<Aabb> {
        match self {
            BvhNode::Empty => None,
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => Some(*bbox),
        }
    }
}

#[derive(Default)]
struct BuildStats {
    branches: usize,
    leaves: usize,
}

/// Bounding volume hierarchy over a set of hittables.
pub struct Bvh {
    root: BvhNode,
    unbounded: Vec<Box<dyn Hittable>>,
    len: usize,
}

impl Bvh {
    /// Build a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        let len = objects.len();
        let mut bounded = Vec::with_capacity(len);
        let mut unbounded = Vec::new();

        for object in objects {
            match object.bounding_box() {
                Some(bbox) => bounded.push(Bounded { bbox, object }),
                None => unbounded.push(object),
            }
        }

        let mut stats = BuildStats::default();
        let root = if bounded.is_empty() {
            BvhNode::Empty
        } else {
            BvhNode::build(bounded, &mut stats)
        };

        log::debug!(
            "Built BVH: {} objects, {} branches, {} leaves, {} unbounded",
            len,
            stats.branches,
            stats.leaves,
            unbounded.len()
        );

        Self {
            root,
            unbounded,
            len,
        }
    }

    /// Number of members, bounded and unbounded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Hittable for Bvh {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let tree_hit = self.root.hit(ray, ray_t);
        let window = ray_t.with_max(tree_hit.as_ref().map_or(ray_t.max, |rec| rec.t));

        closest_hit(&self.unbounded, ray, window).or(tree_hit)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        if !self.unbounded.is_empty() {
            return None;
        }
        self.root.bounding_box()
    }
}
