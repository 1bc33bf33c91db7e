//! Power-weighted selection over a set of lights.

use super::{Light, LightSample};
use crate::sampling::gen_f32;
use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Collection of lights with power-weighted selection.
///
/// The total power and its prefix sums are rebuilt on every mutation, so
/// sampling never writes and a finished list can be shared across workers.
pub struct LightList {
    lights: Vec<Box<dyn Light>>,
    /// `cumulative[i]` = power of lights `0..=i`
    cumulative: Vec<f32>,
    total_power: f32,
}

impl LightList {
    pub fn new() -> Self {
        Self {
            lights: Vec::new(),
            cumulative: Vec::new(),
            total_power: 0.0,
        }
    }

    /// Add a light to the list.
    pub fn add(&mut self, light: Box<dyn Light>) {
        self.lights.push(light);
        self.update_power();
    }

    /// Remove all lights.
    pub fn clear(&mut self) {
        self.lights.clear();
        self.update_power();
    }

    fn update_power(&mut self) {
        self.cumulative.clear();
        let mut running = 0.0;
        for light in &self.lights {
            running += light.power();
            self.cumulative.push(running);
        }
        self.total_power = running;
    }

    pub fn total_power(&self) -> f32 {
        self.total_power
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Light> {
        self.lights.get(index).map(|light| light.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Light> {
        self.lights.iter().map(|light| light.as_ref())
    }

    /// Probability that `sample` picks light `index`.
    pub fn selection_probability(&self, index: usize) -> f32 {
        match self.lights.get(index) {
            None => 0.0,
            Some(_) if self.lights.len() == 1 => 1.0,
            Some(_) if self.total_power <= 0.0 => 1.0 / self.lights.len() as f32,
            Some(light) => light.power() / self.total_power,
        }
    }

    /// First light whose cumulative power exceeds `target`. Zero-power
    /// lights never exceed their predecessor, so they are never picked while
    /// the total is positive. If rounding pushed `target` to the total, the
    /// last light with any power is used.
    fn select(&self, target: f32) -> usize {
        let index = self.cumulative.partition_point(|&c| c <= target);
        if index < self.lights.len() {
            index
        } else {
            self.cumulative.partition_point(|&c| c < self.total_power)
        }
    }

    /// Pick one light with probability proportional to its power and sample it.
    ///
    /// The returned pdf includes the selection probability. Returns
    /// `(LightSample::none(), None)` when the list is empty.
    pub fn sample(&self, point: Vec3, rng: &mut dyn RngCore) -> (LightSample, Option<usize>) {
        match self.lights.len() {
            0 => (LightSample::none(), None),
            1 => (self.lights[0].sample(point, rng), Some(0)),
            n => {
                let index = if self.total_power > 0.0 {
                    self.select(gen_f32(rng) * self.total_power)
                } else {
                    // All-dark list: fall back to uniform selection
                    rng.gen_range(0..n)
                };

                let mut sample = self.lights[index].sample(point, rng);
                sample.pdf *= self.selection_probability(index);
                (sample, Some(index))
            }
        }
    }
}

impl Default for LightList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{AreaLight, DirectionalLight, PointLight};
    use lumen_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn point(intensity: f32) -> Box<dyn Light> {
        Box::new(PointLight::new(Vec3::new(0.0, 5.0, 0.0), Color::ONE, intensity))
    }

    #[test]
    fn test_empty_list_sample() {
        let lights = LightList::new();
        let mut rng = StdRng::seed_from_u64(0);

        let (sample, index) = lights.sample(Vec3::ZERO, &mut rng);
        assert_eq!(index, None);
        assert!(sample.is_black());
        assert_eq!(lights.total_power(), 0.0);
    }

    #[test]
    fn test_single_light_is_not_reweighted() {
        let area = AreaLight::new(
            Vec3::new(-1.0, 4.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Color::ONE,
            5.0,
        );
        let mut lights = LightList::new();
        lights.add(Box::new(area.clone()));

        let mut rng_a = StdRng::seed_from_u64(21);
        let mut rng_b = StdRng::seed_from_u64(21);
        let (sample, index) = lights.sample(Vec3::ZERO, &mut rng_a);
        let direct = area.sample(Vec3::ZERO, &mut rng_b);

        assert_eq!(index, Some(0));
        assert_eq!(sample.pdf, direct.pdf);
        assert_eq!(sample, direct);
    }

    #[test]
    fn test_total_power_tracks_membership() {
        let mut lights = LightList::new();
        lights.add(point(2.0));
        assert!((lights.total_power() - 2.0).abs() < 1e-6);

        let before = lights.total_power();
        lights.add(Box::new(DirectionalLight::new(-Vec3::Y, Color::ONE, 3.0)));
        assert!(lights.total_power() > before);
        assert!((lights.total_power() - 5.0).abs() < 1e-6);

        let sum: f32 = lights.iter().map(|l| l.power()).sum();
        assert!((lights.total_power() - sum).abs() < 1e-6);

        lights.clear();
        assert!(lights.is_empty());
        assert_eq!(lights.total_power(), 0.0);
    }

    #[test]
    fn test_select_walks_prefix_sum() {
        let mut lights = LightList::new();
        lights.add(point(1.0));
        lights.add(point(2.0));
        lights.add(point(1.0));

        assert_eq!(lights.select(0.0), 0);
        assert_eq!(lights.select(0.5), 0);
        // A draw on a boundary belongs to the next light
        assert_eq!(lights.select(1.0), 1);
        assert_eq!(lights.select(2.9), 1);
        assert_eq!(lights.select(3.0), 2);
        assert_eq!(lights.select(3.5), 2);
        // At or past the total from rounding: last light
        assert_eq!(lights.select(4.0), 2);
        assert_eq!(lights.select(4.0001), 2);
    }

    #[test]
    fn test_select_skips_dark_lights() {
        let mut lights = LightList::new();
        lights.add(point(0.0));
        lights.add(point(2.0));
        lights.add(point(0.0));

        // A zero draw must not land on the leading dark light
        assert_eq!(lights.select(0.0), 1);
        assert_eq!(lights.select(1.0), 1);
        // Nor can rounding past the total land on the trailing one
        assert_eq!(lights.select(2.0), 1);

        let mut rng = StdRng::seed_from_u64(25);
        for _ in 0..200 {
            let (sample, index) = lights.sample(Vec3::ZERO, &mut rng);
            assert_eq!(index, Some(1));
            assert!(sample.pdf > 0.0);
        }
    }

    #[test]
    fn test_selection_frequency_follows_power() {
        let mut lights = LightList::new();
        lights.add(point(1.0));
        lights.add(point(3.0));

        let mut rng = StdRng::seed_from_u64(22);
        let n = 20_000;
        let mut counts = [0usize; 2];
        for _ in 0..n {
            let (_, index) = lights.sample(Vec3::ZERO, &mut rng);
            counts[index.unwrap()] += 1;
        }

        let fraction = counts[1] as f32 / n as f32;
        assert!((fraction - 0.75).abs() < 0.02, "fraction = {}", fraction);
    }

    #[test]
    fn test_pdf_includes_selection_probability() {
        let mut lights = LightList::new();
        lights.add(point(1.0));
        lights.add(point(3.0));

        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..50 {
            let (sample, index) = lights.sample(Vec3::ZERO, &mut rng);
            let expected = match index {
                Some(0) => 0.25,
                Some(1) => 0.75,
                other => panic!("unexpected index {:?}", other),
            };
            assert!((sample.pdf - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dark_lights_select_uniformly() {
        let mut lights = LightList::new();
        lights.add(point(0.0));
        lights.add(point(0.0));

        let mut rng = StdRng::seed_from_u64(24);
        let (sample, index) = lights.sample(Vec3::ZERO, &mut rng);
        assert!(index.is_some());
        assert!((sample.pdf - 0.5).abs() < 1e-6);
        assert!(sample.pdf.is_finite());
    }
}
