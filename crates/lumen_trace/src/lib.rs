//! Lumen trace core - ray/scene intersection and light sampling.
//!
//! Two capability contracts live here:
//!
//! - [`Hittable`]: "does this ray hit me, and what box bounds me?"
//!   Implemented by the primitives, the linear [`HittableList`], the
//!   [`Bvh`], and the area/sphere lights.
//! - [`Light`]: "sample a direction toward me from this point."
//!   Implemented by every light; [`LightList`] picks among them by power.
//!
//! [`SceneBuilder`] validates input and wires dual-role emitters into both
//! collections.

mod bvh;
mod hittable;
mod material;
mod plane;
mod sphere;
mod triangle;

pub mod light;
pub mod sampling;
pub mod scene;

pub use bvh::Bvh;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use light::{
    AreaLight, DirectionalLight, Light, LightList, LightSample, PointLight, SphereLight,
};
pub use material::{Emissive, Lambertian, Material};
pub use plane::Plane;
pub use scene::{Accel, Scene, SceneBuilder, SceneError, SceneResult};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
