//! 2D vector helpers
//!
//! `Vector2` is a plain `glam::DVec2` value; these free functions pin down
//! the handful of operations the collision core relies on, including the
//! zero-vector behaviour of `normalize`.

use glam::DVec2;

/// Double-precision 2D vector (screen coordinates, y grows downward)
pub type Vector2 = DVec2;

#[inline]
pub fn add(a: Vector2, b: Vector2) -> Vector2 {
    a + b
}

#[inline]
pub fn sub(a: Vector2, b: Vector2) -> Vector2 {
    a - b
}

#[inline]
pub fn scale(v: Vector2, k: f64) -> Vector2 {
    v * k
}

#[inline]
pub fn dot(a: Vector2, b: Vector2) -> f64 {
    a.dot(b)
}

#[inline]
pub fn magnitude(v: Vector2) -> f64 {
    v.length()
}

#[inline]
pub fn magnitude_squared(v: Vector2) -> f64 {
    v.length_squared()
}

/// Unit vector in the direction of `v`, or the zero vector if `v` has no direction
#[inline]
pub fn normalize(v: Vector2) -> Vector2 {
    v.normalize_or_zero()
}

/// Vector perpendicular to `v`, rotated a quarter turn clockwise on a y-down screen
#[inline]
pub fn perp_right(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}
