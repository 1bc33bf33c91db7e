//! Scene assembly: one intersectable world plus one light list.
//!
//! Intersection and sampling never fail; bad input is caught here, when the
//! scene is built, and reported as a [`SceneError`]. Once built, a [`Scene`]
//! is read-only and can be shared across render workers.

use crate::{
    AreaLight, Bvh, DirectionalLight, HitRecord, Hittable, HittableList, Light, LightList,
    LightSample, Material, Plane, PointLight, Sphere, SphereLight, Triangle,
};
use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;
use thiserror::Error;

/// Offset applied to both ends of a shadow ray so it neither starts on the
/// shading surface nor ends on the light itself.
pub const SHADOW_EPSILON: f32 = 1e-3;

/// Anything shorter than this is treated as zero length or zero area.
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Errors raised while assembling a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("{0} has a non-finite coordinate")]
    NonFinite(&'static str),

    #[error("radius must be non-zero and finite, got {0}")]
    InvalidRadius(f32),

    #[error("{0} has a zero-length direction or normal")]
    ZeroVector(&'static str),

    #[error("triangle has zero area")]
    DegenerateTriangle,

    #[error("area light has zero area")]
    DegenerateAreaLight,

    #[error("light intensity must be non-negative, got {0}")]
    NegativeIntensity(f32),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Which intersectable aggregate the built scene uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Accel {
    /// Linear list; fine for a handful of objects.
    List,
    /// Bounding volume hierarchy.
    #[default]
    Bvh,
}

/// Log and return a construction error.
fn reject<T>(err: SceneError) -> SceneResult<T> {
    log::warn!("Rejected scene input: {}", err);
    Err(err)
}

fn check_finite(what: &'static str, points: &[Vec3]) -> SceneResult<()> {
    if points.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        reject(SceneError::NonFinite(what))
    }
}

fn check_intensity(color: Color, intensity: f32) -> SceneResult<()> {
    check_finite("light color", &[color])?;
    if !intensity.is_finite() || intensity < 0.0 || color.min_element() < 0.0 {
        return reject(SceneError::NegativeIntensity(intensity.min(color.min_element())));
    }
    Ok(())
}

/// Collects geometry and lights, validating each piece as it is added.
#[derive(Default)]
pub struct SceneBuilder {
    objects: HittableList,
    lights: LightList,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already-constructed hittable without validation.
    pub fn object(&mut self, object: Box<dyn Hittable>) -> &mut Self {
        self.objects.add(object);
        self
    }

    /// Add a light that is not visible to rays (point, directional).
    pub fn light(&mut self, light: Box<dyn Light>) -> &mut Self {
        self.lights.add(light);
        self
    }

    /// Add an entity that both emits and can be hit. It is shared between
    /// the two collections rather than duplicated.
    pub fn emitter<E: Light + Hittable + 'static>(&mut self, emitter: Arc<E>) -> &mut Self {
        self.objects.add(Box::new(Arc::clone(&emitter)));
        self.lights.add(Box::new(emitter));
        self
    }

    pub fn sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> SceneResult<&mut Self> {
        check_finite("sphere", &[center])?;
        if radius == 0.0 || !radius.is_finite() {
            return reject(SceneError::InvalidRadius(radius));
        }
        Ok(self.object(Box::new(Sphere::new(center, radius, material))))
    }

    pub fn plane(
        &mut self,
        point: Vec3,
        normal: Vec3,
        material: Arc<dyn Material>,
    ) -> SceneResult<&mut Self> {
        check_finite("plane", &[point, normal])?;
        if normal.length_squared() < DEGENERATE_EPSILON {
            return reject(SceneError::ZeroVector("plane"));
        }
        Ok(self.object(Box::new(Plane::new(point, normal, material))))
    }

    pub fn triangle(
        &mut self,
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        material: Arc<dyn Material>,
    ) -> SceneResult<&mut Self> {
        check_finite("triangle", &[v0, v1, v2])?;
        if (v1 - v0).cross(v2 - v0).length_squared() < DEGENERATE_EPSILON {
            return reject(SceneError::DegenerateTriangle);
        }
        Ok(self.object(Box::new(Triangle::new(v0, v1, v2, material))))
    }

    pub fn point_light(
        &mut self,
        position: Vec3,
        color: Color,
        intensity: f32,
    ) -> SceneResult<&mut Self> {
        check_finite("point light", &[position])?;
        check_intensity(color, intensity)?;
        Ok(self.light(Box::new(PointLight::new(position, color, intensity))))
    }

    pub fn directional_light(
        &mut self,
        direction: Vec3,
        color: Color,
        intensity: f32,
    ) -> SceneResult<&mut Self> {
        check_finite("directional light", &[direction])?;
        if direction.length_squared() < DEGENERATE_EPSILON {
            return reject(SceneError::ZeroVector("directional light"));
        }
        check_intensity(color, intensity)?;
        Ok(self.light(Box::new(DirectionalLight::new(direction, color, intensity))))
    }

    pub fn area_light(
        &mut self,
        corner: Vec3,
        edge1: Vec3,
        edge2: Vec3,
        color: Color,
        intensity: f32,
    ) -> SceneResult<&mut Self> {
        check_finite("area light", &[corner, edge1, edge2])?;
        if edge1.cross(edge2).length_squared() < DEGENERATE_EPSILON {
            return reject(SceneError::DegenerateAreaLight);
        }
        check_intensity(color, intensity)?;
        let light = AreaLight::new(corner, edge1, edge2, color, intensity);
        Ok(self.emitter(Arc::new(light)))
    }

    pub fn sphere_light(
        &mut self,
        center: Vec3,
        radius: f32,
        color: Color,
        intensity: f32,
    ) -> SceneResult<&mut Self> {
        check_finite("sphere light", &[center])?;
        if radius <= 0.0 || !radius.is_finite() {
            return reject(SceneError::InvalidRadius(radius));
        }
        check_intensity(color, intensity)?;
        let light = SphereLight::new(center, radius, color, intensity);
        Ok(self.emitter(Arc::new(light)))
    }

    /// Finish construction. The scene is immutable from here on.
    pub fn build(self, accel: Accel) -> Scene {
        log::info!(
            "Building scene: {} objects, {} lights, total light power {:.3}",
            self.objects.len(),
            self.lights.len(),
            self.lights.total_power()
        );

        let world: Box<dyn Hittable> = match accel {
            Accel::List => Box::new(self.objects),
            Accel::Bvh => Box::new(Bvh::new(self.objects.into_objects())),
        };

        Scene {
            world,
            lights: self.lights,
        }
    }
}

/// A built scene: the root intersectable and the light list.
pub struct Scene {
    world: Box<dyn Hittable>,
    lights: LightList,
}

impl Scene {
    /// Nearest hit against all geometry, emitters included.
    pub fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        self.world.hit(ray, ray_t)
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        self.world.bounding_box()
    }

    pub fn lights(&self) -> &LightList {
        &self.lights
    }

    /// Draw one light sample for next-event estimation.
    pub fn sample_light(&self, point: Vec3, rng: &mut dyn RngCore) -> (LightSample, Option<usize>) {
        self.lights.sample(point, rng)
    }

    /// True if something blocks the path from `point` to the sampled light.
    pub fn occluded(&self, point: Vec3, sample: &LightSample) -> bool {
        let max = if sample.distance.is_finite() {
            sample.distance - SHADOW_EPSILON
        } else {
            f32::INFINITY
        };
        if max <= SHADOW_EPSILON {
            return false;
        }

        let shadow_ray = Ray::new(point, sample.direction);
        self.world
            .hit(&shadow_ray, Interval::new(SHADOW_EPSILON, max))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn room(accel: Accel) -> Scene {
        let mut builder = SceneBuilder::new();
        builder
            .plane(Vec3::ZERO, Vec3::Y, grey())
            .unwrap()
            .sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, grey())
            .unwrap()
            .area_light(
                Vec3::new(-1.0, 5.0, -1.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 2.0),
                Color::ONE,
                4.0,
            )
            .unwrap();
        builder.build(accel)
    }

    #[test]
    fn test_rejects_invalid_geometry() {
        let mut builder = SceneBuilder::new();

        assert_eq!(
            builder.sphere(Vec3::ZERO, 0.0, grey()).err(),
            Some(SceneError::InvalidRadius(0.0))
        );
        assert_eq!(
            builder.sphere(Vec3::new(f32::NAN, 0.0, 0.0), 1.0, grey()).err(),
            Some(SceneError::NonFinite("sphere"))
        );
        assert_eq!(
            builder.plane(Vec3::ZERO, Vec3::ZERO, grey()).err(),
            Some(SceneError::ZeroVector("plane"))
        );
        assert_eq!(
            builder.triangle(Vec3::ZERO, Vec3::X, Vec3::X * 2.0, grey()).err(),
            Some(SceneError::DegenerateTriangle)
        );
    }

    #[test]
    fn test_rejects_invalid_lights() {
        let mut builder = SceneBuilder::new();

        assert_eq!(
            builder
                .area_light(Vec3::ZERO, Vec3::X, Vec3::X, Color::ONE, 1.0)
                .err(),
            Some(SceneError::DegenerateAreaLight)
        );
        assert_eq!(
            builder.point_light(Vec3::ZERO, Color::ONE, -1.0).err(),
            Some(SceneError::NegativeIntensity(-1.0))
        );
        assert_eq!(
            builder.sphere_light(Vec3::ZERO, -0.5, Color::ONE, 1.0).err(),
            Some(SceneError::InvalidRadius(-0.5))
        );
        assert_eq!(
            builder.directional_light(Vec3::ZERO, Color::ONE, 1.0).err(),
            Some(SceneError::ZeroVector("directional light"))
        );

        let scene = builder.build(Accel::List);
        assert!(scene.lights().is_empty());
    }

    #[test]
    fn test_negative_radius_sphere_is_allowed() {
        let mut builder = SceneBuilder::new();
        assert!(builder.sphere(Vec3::ZERO, -1.0, grey()).is_ok());
    }

    #[test]
    fn test_emitter_is_visible_and_sampled() {
        let scene = room(Accel::Bvh);
        assert_eq!(scene.lights().len(), 1);

        // Looking straight up from beside the sphere hits the light panel
        let ray = Ray::new(Vec3::new(0.5, 0.5, 2.0), Vec3::new(0.0, 1.0, -0.4));
        let rec = scene.hit(&ray, Interval::new(0.001, 100.0)).unwrap();
        assert!(rec.material.is_emissive());

        let mut rng = StdRng::seed_from_u64(30);
        let (sample, index) = scene.sample_light(Vec3::new(3.0, 0.0, 0.0), &mut rng);
        assert_eq!(index, Some(0));
        assert!(!sample.is_black());
    }

    #[test]
    fn test_occlusion() {
        let scene = room(Accel::List);
        let mut rng = StdRng::seed_from_u64(31);

        // Directly below the sphere: the light is blocked
        let under = Vec3::new(0.0, 0.0, 0.0);
        let (sample, _) = scene.sample_light(under, &mut rng);
        assert!(scene.occluded(under, &sample));

        // Far off to the side the panel is visible and the shadow ray stops
        // short of the panel itself
        let side = Vec3::new(4.0, 0.01, 0.0);
        for _ in 0..20 {
            let (sample, _) = scene.sample_light(side, &mut rng);
            assert!(!scene.occluded(side, &sample));
        }
    }

    #[test]
    fn test_occlusion_directional_light() {
        let mut builder = SceneBuilder::new();
        builder
            .sphere(Vec3::new(0.0, 3.0, 0.0), 1.0, grey())
            .unwrap()
            .directional_light(-Vec3::Y, Color::ONE, 1.0)
            .unwrap();
        let scene = builder.build(Accel::Bvh);
        let mut rng = StdRng::seed_from_u64(32);

        let (sample, _) = scene.sample_light(Vec3::ZERO, &mut rng);
        assert!(scene.occluded(Vec3::ZERO, &sample));
        let (sample, _) = scene.sample_light(Vec3::new(5.0, 0.0, 0.0), &mut rng);
        assert!(!scene.occluded(Vec3::new(5.0, 0.0, 0.0), &sample));
    }

    #[test]
    fn test_list_and_bvh_scenes_agree() {
        let list = room(Accel::List);
        let bvh = room(Accel::Bvh);
        assert!(list.bounding_box().is_none());
        assert!(bvh.bounding_box().is_none());

        for i in 0..50 {
            let x = -2.0 + i as f32 * 0.08;
            let ray = Ray::new(Vec3::new(x, 3.0, 6.0), Vec3::new(0.0, -0.3, -1.0));
            let window = Interval::new(0.001, 100.0);
            assert_eq!(
                list.hit(&ray, window).map(|r| r.t),
                bvh.hit(&ray, window).map(|r| r.t)
            );
        }
    }
}
