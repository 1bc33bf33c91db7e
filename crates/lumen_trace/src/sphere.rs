//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere primitive.
///
/// A negative radius keeps the same surface but flips the outward normal
/// inward, which is how hollow glass shells are modelled.
#[derive(Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        // Order-free corners, so a negative radius still yields a valid box
        let bbox = Aabb::from_points(center - radius, center + radius);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    pub(crate) fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle up from -Y
        // phi: angle around Y axis from -X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let half_b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.contains(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        let uv = Self::get_sphere_uv(outward_normal);
        Some(HitRecord::new(ray, root, outward_normal, self.material.as_ref(), uv))
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use lumen_math::Color;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, Interval::new(0.001, 1000.0)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!((rec.p - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_sphere_far_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, Interval::new(0.001, 1000.0)).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_window_is_hard() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        // Both roots (4 and 6) beyond t_max
        assert!(sphere.hit(&ray, Interval::new(0.001, 3.9)).is_none());
        // Near root excluded, far root taken
        let rec = sphere.hit(&ray, Interval::new(4.5, 1000.0)).unwrap();
        assert!((rec.t - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_negative_radius() {
        let sphere = Sphere::new(Vec3::ZERO, -1.0, grey());
        let bbox = sphere.bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::splat(-1.0));
        assert_eq!(bbox.max, Vec3::splat(1.0));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = sphere.hit(&ray, Interval::new(0.001, 1000.0)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-5);
        // Outward normal points inward, so the outside hit reads as a back face
        assert!(!rec.front_face);
        assert!(rec.normal.dot(ray.direction()) <= 0.0);
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = Sphere::get_sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);

        let (_, v) = Sphere::get_sphere_uv(Vec3::new(0.0, -1.0, 0.0));
        assert!(v.abs() < 1e-5);
        let (_, v) = Sphere::get_sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_hits_lie_on_surface_and_in_box() {
        let center = Vec3::new(1.0, -2.0, 0.5);
        let sphere = Sphere::new(center, 1.5, grey());
        let bbox = sphere.bounding_box().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let origin = Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            );
            let target = center + Vec3::new(rng.gen(), rng.gen(), rng.gen()) - 0.5;
            let ray = Ray::new(origin, target - origin);

            if let Some(rec) = sphere.hit(&ray, Interval::new(0.001, 1000.0)) {
                assert!(((rec.p - center).length() - 1.5).abs() < 1e-3);
                assert!(rec.normal.dot(ray.direction()) <= 0.0);
                assert!(bbox.contains_point(rec.p, 1e-3));
            }
        }
    }
}
