//! Parallel probe of a built scene.
//!
//! Casts a pinhole grid of rays, one rayon task per row. Each row owns a
//! seeded `StdRng`, so reports are reproducible for a given seed.

use std::f32::consts::FRAC_1_PI;

use lumen_math::{Color, Interval, Ray, Vec3};
use lumen_trace::sampling::OrthonormalBasis;
use lumen_trace::{Accel, HitRecord, Scene};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::Deserialize;

/// Acceleration structure selection as it appears in scene files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccelChoice {
    List,
    #[default]
    Bvh,
}

impl From<AccelChoice> for Accel {
    fn from(choice: AccelChoice) -> Self {
        match choice {
            AccelChoice::List => Accel::List,
            AccelChoice::Bvh => Accel::Bvh,
        }
    }
}

/// Probe settings, read from the optional `"probe"` section of a scene file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Grid width in rays
    pub width: u32,
    /// Grid height in rays
    pub height: u32,
    pub origin: [f32; 3],
    pub look_at: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near end of the intersection window
    pub t_min: f32,
    /// Far end of the intersection window
    pub t_max: f32,
    /// Light samples drawn per non-emissive hit
    pub light_samples: u32,
    pub accel: AccelChoice,
    pub seed: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 120,
            origin: [0.0, 1.5, 2.0],
            look_at: [0.0, 1.0, -4.0],
            fov_degrees: 60.0,
            t_min: 1e-3,
            t_max: f32::INFINITY,
            light_samples: 4,
            accel: AccelChoice::Bvh,
            seed: 42,
        }
    }
}

/// Aggregate statistics over all probe rays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbeReport {
    pub rays: u64,
    pub hits: u64,
    /// Hits whose material emits light
    pub emitter_hits: u64,
    pub shadow_tests: u64,
    pub shadowed: u64,
    /// Sum of per-hit direct lighting estimates over non-emissive hits
    pub direct_sum: Color,
    /// Sum of emitted radiance over emitter hits
    pub emitted_sum: Color,
}

impl ProbeReport {
    pub fn merge(mut self, other: Self) -> Self {
        self.rays += other.rays;
        self.hits += other.hits;
        self.emitter_hits += other.emitter_hits;
        self.shadow_tests += other.shadow_tests;
        self.shadowed += other.shadowed;
        self.direct_sum += other.direct_sum;
        self.emitted_sum += other.emitted_sum;
        self
    }

    /// Fraction of rays that hit something.
    pub fn coverage(&self) -> f32 {
        ratio(self.hits, self.rays)
    }

    pub fn shadowed_fraction(&self) -> f32 {
        ratio(self.shadowed, self.shadow_tests)
    }

    /// Mean direct lighting over non-emissive hits.
    pub fn mean_direct(&self) -> Color {
        let lit = self.hits - self.emitter_hits;
        if lit == 0 {
            Color::ZERO
        } else {
            self.direct_sum / lit as f32
        }
    }
}

fn ratio(num: u64, den: u64) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

struct Frame {
    origin: Vec3,
    basis: OrthonormalBasis,
    half_width: f32,
    half_height: f32,
}

impl Frame {
    fn new(config: &ProbeConfig) -> Self {
        let origin = Vec3::from_array(config.origin);
        let forward = (Vec3::from_array(config.look_at) - origin)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        let half_height = (config.fov_degrees.to_radians() * 0.5).tan();
        let aspect = config.width.max(1) as f32 / config.height.max(1) as f32;
        Self {
            origin,
            basis: OrthonormalBasis::from_w(forward),
            half_width: half_height * aspect,
            half_height,
        }
    }

    fn ray(&self, i: u32, j: u32, width: u32, height: u32) -> Ray {
        let x = ((i as f32 + 0.5) / width as f32 * 2.0 - 1.0) * self.half_width;
        let y = (1.0 - (j as f32 + 0.5) / height as f32 * 2.0) * self.half_height;
        // from_w builds a right-handed frame, so +u points left of forward
        let direction = self.basis.local(-x, y, 1.0).normalize();
        Ray::new(self.origin, direction)
    }
}

/// Probe the scene with the configured ray grid.
pub fn run(scene: &Scene, config: &ProbeConfig) -> ProbeReport {
    let frame = Frame::new(config);
    let window = Interval::new(config.t_min, config.t_max);

    log::debug!(
        "Probing {}x{} rays, {} light samples per hit",
        config.width,
        config.height,
        config.light_samples
    );

    let rows: Vec<ProbeReport> = (0..config.height)
        .into_par_iter()
        .map(|j| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(j as u64));
            let mut report = ProbeReport::default();
            for i in 0..config.width {
                let ray = frame.ray(i, j, config.width, config.height);
                report.rays += 1;
                if let Some(rec) = scene.hit(&ray, window) {
                    shade(scene, &rec, config.light_samples, &mut rng, &mut report);
                }
            }
            report
        })
        .collect();

    // Sequential fold keeps the float sums independent of scheduling
    rows.into_iter().fold(ProbeReport::default(), ProbeReport::merge)
}

fn shade(
    scene: &Scene,
    rec: &HitRecord,
    light_samples: u32,
    rng: &mut dyn RngCore,
    report: &mut ProbeReport,
) {
    report.hits += 1;

    if rec.material.is_emissive() {
        report.emitter_hits += 1;
        report.emitted_sum += rec.material.emitted(rec.u, rec.v, rec.p);
        return;
    }

    if light_samples == 0 {
        return;
    }

    let brdf = rec.material.albedo() * FRAC_1_PI;
    let mut direct = Color::ZERO;
    for _ in 0..light_samples {
        let (sample, _) = scene.sample_light(rec.p, rng);
        if sample.is_black() {
            continue;
        }
        let cos_theta = rec.normal.dot(sample.direction);
        if cos_theta <= 0.0 {
            continue;
        }
        report.shadow_tests += 1;
        if scene.occluded(rec.p, &sample) {
            report.shadowed += 1;
            continue;
        }
        direct += brdf * sample.intensity * cos_theta / sample.pdf;
    }
    report.direct_sum += direct / light_samples as f32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_trace::{Lambertian, SceneBuilder};
    use std::sync::Arc;

    fn narrow_config() -> ProbeConfig {
        ProbeConfig {
            width: 8,
            height: 6,
            origin: [0.0, 0.0, 0.0],
            look_at: [0.0, 0.0, -1.0],
            fov_degrees: 10.0,
            ..ProbeConfig::default()
        }
    }

    #[test]
    fn test_empty_scene() {
        let scene = SceneBuilder::new().build(Accel::Bvh);
        let report = run(&scene, &narrow_config());

        assert_eq!(report.rays, 48);
        assert_eq!(report.hits, 0);
        assert_eq!(report.coverage(), 0.0);
        assert_eq!(report.mean_direct(), Color::ZERO);
        assert_eq!(report.shadowed_fraction(), 0.0);
    }

    #[test]
    fn test_sphere_lit_from_camera() {
        let mut builder = SceneBuilder::new();
        builder
            .sphere(
                Vec3::new(0.0, 0.0, -3.0),
                1.0,
                Arc::new(Lambertian::new(Color::splat(0.5))),
            )
            .unwrap();
        builder.point_light(Vec3::ZERO, Color::ONE, 10.0).unwrap();
        let scene = builder.build(Accel::List);

        let report = run(&scene, &narrow_config());

        assert_eq!(report.hits, report.rays);
        assert_eq!(report.emitter_hits, 0);
        assert_eq!(report.shadowed, 0);
        assert_eq!(report.shadow_tests, report.rays * 4);

        // Near the axis: 0.5/pi * 10/4 * cos ~= 0.4
        let mean = report.mean_direct();
        assert!(mean.x > 0.3 && mean.x < 0.45, "mean {}", mean);
    }

    #[test]
    fn test_emitter_hits_are_counted() {
        let mut builder = SceneBuilder::new();
        builder
            .sphere_light(Vec3::new(0.0, 0.0, -3.0), 1.0, Color::ONE, 2.0)
            .unwrap();
        let scene = builder.build(Accel::Bvh);

        let report = run(&scene, &narrow_config());

        assert_eq!(report.hits, report.rays);
        assert_eq!(report.emitter_hits, report.hits);
        let mean_emitted = report.emitted_sum / report.emitter_hits as f32;
        assert!((mean_emitted - Color::splat(2.0)).abs().max_element() < 1e-4);
    }

    #[test]
    fn test_reports_are_reproducible() {
        let scene = crate::description::SceneDescription::demo()
            .unwrap()
            .build()
            .unwrap();
        let config = ProbeConfig {
            width: 24,
            height: 16,
            ..ProbeConfig::default()
        };

        let first = run(&scene, &config);
        let second = run(&scene, &config);
        assert_eq!(first, second);
        assert!(first.hits > 0);
    }

    #[test]
    fn test_accel_choice_parses() {
        let config: ProbeConfig =
            serde_json::from_str(r#"{ "accel": "list", "light_samples": 2 }"#).unwrap();
        assert_eq!(config.accel, AccelChoice::List);
        assert_eq!(config.light_samples, 2);
        assert_eq!(config.width, ProbeConfig::default().width);
        assert_eq!(Accel::from(config.accel), Accel::List);
    }
}
