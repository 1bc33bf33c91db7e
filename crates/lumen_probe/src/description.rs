//! JSON scene descriptions.
//!
//! ```json
//! {
//!   "materials": { "grey": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] } },
//!   "objects": [ { "type": "sphere", "center": [0, 1, 0], "radius": 1, "material": "grey" } ],
//!   "lights": [ { "type": "point", "position": [0, 5, 0], "color": [1, 1, 1], "intensity": 10 } ],
//!   "probe": { "width": 64, "height": 48 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lumen_math::Vec3;
use lumen_trace::{Lambertian, Material, Scene, SceneBuilder, SceneError};
use serde::Deserialize;
use thiserror::Error;

use crate::probe::ProbeConfig;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("object {index} references unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },

    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),
}

pub type DescriptionResult<T> = Result<T, DescriptionError>;

const DEMO_SCENE: &str = r#"{
    "materials": {
        "floor": { "type": "lambertian", "albedo": [0.8, 0.8, 0.8] },
        "red":   { "type": "lambertian", "albedo": [0.7, 0.2, 0.2] },
        "blue":  { "type": "lambertian", "albedo": [0.2, 0.3, 0.8] }
    },
    "objects": [
        { "type": "plane", "point": [0, 0, 0], "normal": [0, 1, 0], "material": "floor" },
        { "type": "sphere", "center": [-1.2, 1, -4], "radius": 1, "material": "red" },
        { "type": "sphere", "center": [1.2, 0.6, -3.5], "radius": 0.6, "material": "blue" },
        { "type": "triangle", "vertices": [[-3, 0, -6], [3, 0, -6], [0, 3, -6.5]],
          "material": "floor" }
    ],
    "lights": [
        { "type": "area", "corner": [-1, 4, -5], "edge1": [2, 0, 0], "edge2": [0, 0, 2],
          "color": [1, 0.95, 0.9], "intensity": 6 },
        { "type": "sphere", "center": [3, 2.5, -2], "radius": 0.3,
          "color": [1, 0.6, 0.3], "intensity": 20 },
        { "type": "point", "position": [-3, 3, -1], "color": [0.6, 0.7, 1], "intensity": 8 },
        { "type": "directional", "direction": [0.3, -1, -0.2],
          "color": [1, 1, 1], "intensity": 0.2 }
    ]
}"#;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian { albedo: [f32; 3] },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    Sphere {
        center: [f32; 3],
        radius: f32,
        material: String,
    },
    Plane {
        point: [f32; 3],
        normal: [f32; 3],
        material: String,
    },
    Triangle {
        vertices: [[f32; 3]; 3],
        material: String,
    },
}

impl ObjectDesc {
    fn material(&self) -> &str {
        match self {
            ObjectDesc::Sphere { material, .. }
            | ObjectDesc::Plane { material, .. }
            | ObjectDesc::Triangle { material, .. } => material,
        }
    }
}

fn default_intensity() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDesc {
    Point {
        position: [f32; 3],
        color: [f32; 3],
        #[serde(default = "default_intensity")]
        intensity: f32,
    },
    Directional {
        direction: [f32; 3],
        color: [f32; 3],
        #[serde(default = "default_intensity")]
        intensity: f32,
    },
    Area {
        corner: [f32; 3],
        edge1: [f32; 3],
        edge2: [f32; 3],
        color: [f32; 3],
        #[serde(default = "default_intensity")]
        intensity: f32,
    },
    Sphere {
        center: [f32; 3],
        radius: f32,
        color: [f32; 3],
        #[serde(default = "default_intensity")]
        intensity: f32,
    },
}

/// A parsed scene file.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub materials: HashMap<String, MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
    #[serde(default)]
    pub lights: Vec<LightDesc>,
    #[serde(default)]
    pub probe: ProbeConfig,
}

impl SceneDescription {
    /// Load a description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> DescriptionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> DescriptionResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The built-in demo scene.
    pub fn demo() -> DescriptionResult<Self> {
        Self::from_json(DEMO_SCENE)
    }

    /// Validate and assemble the scene.
    pub fn build(&self) -> DescriptionResult<Scene> {
        let materials: HashMap<&str, Arc<dyn Material>> = self
            .materials
            .iter()
            .map(|(name, desc)| {
                let material: Arc<dyn Material> = match desc {
                    MaterialDesc::Lambertian { albedo } => {
                        Arc::new(Lambertian::new(Vec3::from_array(*albedo)))
                    }
                };
                (name.as_str(), material)
            })
            .collect();

        let mut builder = SceneBuilder::new();

        for (index, object) in self.objects.iter().enumerate() {
            let material = materials
                .get(object.material())
                .cloned()
                .ok_or_else(|| DescriptionError::UnknownMaterial {
                    index,
                    name: object.material().to_string(),
                })?;

            match object {
                ObjectDesc::Sphere { center, radius, .. } => {
                    builder.sphere(Vec3::from_array(*center), *radius, material)?;
                }
                ObjectDesc::Plane { point, normal, .. } => {
                    builder.plane(Vec3::from_array(*point), Vec3::from_array(*normal), material)?;
                }
                ObjectDesc::Triangle { vertices, .. } => {
                    let [v0, v1, v2] = vertices.map(Vec3::from_array);
                    builder.triangle(v0, v1, v2, material)?;
                }
            }
        }

        for light in &self.lights {
            match light {
                LightDesc::Point {
                    position,
                    color,
                    intensity,
                } => {
                    builder.point_light(
                        Vec3::from_array(*position),
                        Vec3::from_array(*color),
                        *intensity,
                    )?;
                }
                LightDesc::Directional {
                    direction,
                    color,
                    intensity,
                } => {
                    builder.directional_light(
                        Vec3::from_array(*direction),
                        Vec3::from_array(*color),
                        *intensity,
                    )?;
                }
                LightDesc::Area {
                    corner,
                    edge1,
                    edge2,
                    color,
                    intensity,
                } => {
                    builder.area_light(
                        Vec3::from_array(*corner),
                        Vec3::from_array(*edge1),
                        Vec3::from_array(*edge2),
                        Vec3::from_array(*color),
                        *intensity,
                    )?;
                }
                LightDesc::Sphere {
                    center,
                    radius,
                    color,
                    intensity,
                } => {
                    builder.sphere_light(
                        Vec3::from_array(*center),
                        *radius,
                        Vec3::from_array(*color),
                        *intensity,
                    )?;
                }
            }
        }

        Ok(builder.build(self.probe.accel.into()))
    }
}
