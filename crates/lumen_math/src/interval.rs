/// Closed range of ray parameters `[min, max]`.
///
/// Intersection routines take one of these as the search window and accept a
/// root only if [`contains`](Interval::contains) holds. Aabb slabs reuse it
/// for per-axis extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// `min <= t <= max`. Both ends are accepted.
    pub fn contains(&self, t: f32) -> bool {
        self.min <= t && t <= self.max
    }

    /// Same window with a new far end. Aggregates use this to cull against
    /// the closest hit found so far.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval { max, ..*self }
    }

    /// Grow by `delta` in total, half on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let half = 0.5 * delta;
        Interval::new(self.min - half, self.max + half)
    }
}
