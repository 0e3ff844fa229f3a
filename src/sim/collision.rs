//! Collision detection and response for a ball against straight edges
//!
//! The tricky part of the demo: finding the perpendicular offset from the
//! ball centre to an edge line, deciding whether the circle crosses that line
//! (or skipped clean through it during the last step), pushing it back out
//! and reflecting its velocity.
//!
//! "Normal" throughout this module means the offset vector from the
//! projection of the ball centre on the line to the ball centre. It is not a
//! unit vector.

use super::edge::{Edge, EdgeKind};
use super::vector::{self, Vector2};
use crate::consts::GEOMETRY_EPSILON;

/// A ball overlapping, or having crossed, one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the edge within the boundary's edge list
    pub edge: usize,
    /// Offset from the line to the ball centre at detection
    pub normal: Vector2,
    /// Unit normal of the edge pointing into free space
    pub outward: Vector2,
    /// How far the circle reaches past the line (radius minus signed distance)
    pub depth: f64,
    /// Centre switched sides of the line since the previous frame
    pub tunnelled: bool,
}

/// Offset from the orthogonal projection of `point` onto the edge's infinite line to `point`
///
/// A zero-length edge has no line; the offset is the zero vector.
pub fn project_onto_line(point: Vector2, edge: &Edge) -> Vector2 {
    if edge.is_degenerate() {
        return Vector2::ZERO;
    }
    let s = edge.start();
    let foot = match edge.kind() {
        EdgeKind::Sloped { gradient: g } => {
            // Intersection of the line with its perpendicular through `point`
            let x = (point.x + g * g * s.x + g * (point.y - s.y)) / (g * g + 1.0);
            let y = g * x - g * s.x + s.y;
            Vector2::new(x, y)
        }
        EdgeKind::Vertical => Vector2::new(s.x, point.y),
    };
    vector::sub(point, foot)
}

/// Whether a circle of `radius` whose centre sits at `normal` from a line overlaps it
///
/// Looser than a strict `|normal| < radius`: contact within
/// `GEOMETRY_EPSILON` of exact tangency counts as resting, not penetrating,
/// so a ball just placed against a line by
/// [`reposition_out_of_penetration`] is not hit again through rounding.
#[inline]
pub fn is_penetrating(normal: Vector2, radius: f64) -> bool {
    vector::magnitude(normal) < radius - GEOMETRY_EPSILON
}

/// Whether the ball centre switched sides of a line between two frames
///
/// Compares the signs of the offset components. This is a discrete check on
/// sampled frames, not a swept test: a ball fast enough to cross and come
/// back within one step goes unnoticed.
#[inline]
pub fn has_tunnelled(prev_normal: Vector2, new_normal: Vector2) -> bool {
    prev_normal.x * new_normal.x < 0.0 || prev_normal.y * new_normal.y < 0.0
}

/// Distance from the line to `point`, positive on the edge's free side
#[inline]
pub fn signed_distance(point: Vector2, edge: &Edge) -> f64 {
    vector::dot(project_onto_line(point, edge), edge.outward_normal())
}

/// New centre for a ball so its circle just touches the line on the free side
///
/// `normal` is the offset of `position` from the line and `outward` the
/// edge's unit normal into free space. A centre still on the free side moves
/// out by `radius - |normal|`; one that crossed moves back by
/// `radius + |normal|`. Both collapse to "foot of the perpendicular plus
/// `radius` along `outward`". A zero `outward` leaves the position alone.
pub fn reposition_out_of_penetration(
    position: Vector2,
    radius: f64,
    normal: Vector2,
    outward: Vector2,
) -> Vector2 {
    if vector::magnitude_squared(outward) < GEOMETRY_EPSILON {
        return position;
    }
    let foot = vector::sub(position, normal);
    vector::add(foot, vector::scale(outward, radius))
}

/// Elastic reflection of `velocity` about a surface with normal `normal`
///
/// `v' = v - 2 * n * (v.n / |n|^2)`; `normal` need not be unit length.
/// A zero normal leaves the velocity unchanged.
pub fn reflect(velocity: Vector2, normal: Vector2) -> Vector2 {
    let len_sq = vector::magnitude_squared(normal);
    if len_sq < GEOMETRY_EPSILON * GEOMETRY_EPSILON {
        return velocity;
    }
    let along_normal = vector::scale(normal, vector::dot(velocity, normal) / len_sq);
    vector::sub(velocity, vector::scale(along_normal, 2.0))
}

/// Check a ball against one edge
///
/// Hits when the circle overlaps the line, the centre is on the blocked
/// side, or the centre crossed the line since `prev_position`. Degenerate
/// edges never hit.
pub fn check_edge(
    index: usize,
    edge: &Edge,
    prev_position: Option<Vector2>,
    position: Vector2,
    radius: f64,
) -> Option<Contact> {
    if edge.is_degenerate() {
        return None;
    }

    let normal = project_onto_line(position, edge);
    let outward = edge.outward_normal();
    let distance = vector::dot(normal, outward);
    let tunnelled = prev_position
        .map(|prev| has_tunnelled(project_onto_line(prev, edge), normal))
        .unwrap_or(false);

    if is_penetrating(normal, radius) || distance < 0.0 || tunnelled {
        Some(Contact {
            edge: index,
            normal,
            outward,
            depth: radius - distance,
            tunnelled,
        })
    } else {
        None
    }
}

/// Whether a ball at `position` would start out overlapping or behind any edge
pub fn overlaps_any(position: Vector2, radius: f64, edges: &[Edge]) -> bool {
    edges
        .iter()
        .enumerate()
        .any(|(i, edge)| check_edge(i, edge, None, position, radius).is_some())
}
