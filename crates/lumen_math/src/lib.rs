// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// RGB color, linear. Shares the vector type so color math is just vector math.
pub type Color = Vec3;
