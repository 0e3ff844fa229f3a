//! Fixed-step frame advance
//!
//! One call moves the ball by exactly one frame. Collision response is split
//! across two frames: the frame that detects a hit moves the ball back to the
//! surface and queues the reflection; the next frame applies the reflection
//! and moves the ball with no gravity added, so the bounce frame never pays
//! for gravity twice.

use super::body::{MotionPhase, RigidBody};
use super::collision::{self, Contact};
use super::edge::Edge;
use super::vector::{self, Vector2};
use crate::consts::GEOMETRY_EPSILON;

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Edges hit this frame, in resolution order
    pub contacts: Vec<Contact>,
    /// Reflections queued by the previous frame were applied
    pub bounced: bool,
    /// Responses skipped because their normal had no direction
    pub ignored_responses: u32,
}

impl FrameReport {
    #[inline]
    pub fn hit(&self) -> bool {
        !self.contacts.is_empty()
    }
}

/// Create a body at rest, or `None` if it would start overlapping or behind an edge
pub fn spawn_body(position: Vector2, radius: f64, edges: &[Edge]) -> Option<RigidBody> {
    if !position.is_finite() || !(radius.is_finite() && radius > 0.0) {
        return None;
    }
    if collision::overlaps_any(position, radius, edges) {
        return None;
    }
    Some(RigidBody::new(position, radius))
}

/// Advance `body` by one frame against `edges` under `gravity`
pub fn step_frame(body: &RigidBody, edges: &[Edge], gravity: Vector2) -> RigidBody {
    advance_frame(body, edges, gravity).0
}

/// [`step_frame`] plus a report of the frame's contacts and bounces
pub fn advance_frame(
    body: &RigidBody,
    edges: &[Edge],
    gravity: Vector2,
) -> (RigidBody, FrameReport) {
    let mut body = body.clone();
    let mut report = FrameReport::default();
    let prev_position = body.position;

    match std::mem::take(&mut body.phase) {
        MotionPhase::Bouncing { normals } => {
            for normal in normals {
                if vector::magnitude(normal) < GEOMETRY_EPSILON {
                    log::warn!("Skipping bounce with zero normal");
                    report.ignored_responses += 1;
                    continue;
                }
                body.bounce(normal);
            }
            report.bounced = true;
            log::debug!("Bounce applied: {}", body);
        }
        MotionPhase::Falling => body.apply_force(gravity),
    }

    body.integrate();

    // Edges are resolved one at a time; a corner hit moves the ball off each line in turn
    for (index, edge) in edges.iter().enumerate() {
        let Some(contact) =
            collision::check_edge(index, edge, Some(prev_position), body.position, body.radius)
        else {
            continue;
        };

        if vector::magnitude(contact.outward) < GEOMETRY_EPSILON {
            log::warn!("Edge {} has no outward normal, ignoring contact", index);
            report.ignored_responses += 1;
            continue;
        }

        log::debug!(
            "Contact with edge {}: depth={:.3} tunnelled={}",
            index,
            contact.depth,
            contact.tunnelled
        );
        body.move_out_of(contact.normal, contact.outward);
        body.queue_bounce(contact.outward);
        report.contacts.push(contact);
    }

    (body, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::edge::{Quadrilateral, Side};

    fn floor(y: f64) -> Edge {
        Edge::new(Vector2::new(0.0, y), Vector2::new(2000.0, y), Side::Left)
    }

    const GRAVITY: Vector2 = Vector2::new(0.0, 0.5);

    #[test]
    fn test_spawn_rejects_overlap() {
        let edges = [floor(500.0)];
        assert!(spawn_body(Vector2::new(100.0, 100.0), 30.0, &edges).is_some());
        assert!(spawn_body(Vector2::new(100.0, 480.0), 30.0, &edges).is_none());
        assert!(spawn_body(Vector2::new(100.0, 700.0), 30.0, &edges).is_none());
        assert!(spawn_body(Vector2::new(f64::NAN, 10.0), 30.0, &edges).is_none());
    }

    #[test]
    fn test_falling_frame_applies_gravity() {
        let body = RigidBody::new(Vector2::new(100.0, 100.0), 30.0);
        let next = step_frame(&body, &[floor(500.0)], GRAVITY);
        assert_eq!(next.velocity, Vector2::new(0.0, 0.5));
        assert_eq!(next.position, Vector2::new(100.0, 100.5));
        // Input untouched
        assert_eq!(body.position, Vector2::new(100.0, 100.0));
    }

    #[test]
    fn test_bounce_off_floor_is_elastic() {
        let edges = [floor(500.0)];
        let mut body = spawn_body(Vector2::new(100.0, 100.0), 30.0, &edges).unwrap();

        let mut frames = 0;
        while body.position.y + 30.0 < 500.0 - 1e-9 {
            body = step_frame(&body, &edges, GRAVITY);
            frames += 1;
            assert!(frames < 1000, "ball never reached the floor");
        }

        // Contact frame: resting on the surface, reflection queued
        assert!(body.is_bouncing());
        assert!((body.position.y - 470.0).abs() < 1e-9);
        let downward = body.velocity.y;
        assert!(downward > 0.0);

        let (after, report) = advance_frame(&body, &edges, GRAVITY);
        assert!(report.bounced);
        assert!(after.velocity.y < 0.0);
        assert!((after.velocity.y + downward).abs() < 1e-9);
        assert!(!after.is_bouncing());
    }

    #[test]
    fn test_bounce_frame_skips_gravity() {
        let body = RigidBody {
            phase: MotionPhase::Bouncing {
                normals: vec![Vector2::new(0.0, -1.0)],
            },
            ..RigidBody::new(Vector2::new(100.0, 470.0), 30.0).with_velocity(Vector2::new(1.0, 8.0))
        };
        let next = step_frame(&body, &[floor(500.0)], GRAVITY);
        assert!((next.velocity - Vector2::new(1.0, -8.0)).length() < 1e-12);
        assert!((next.position - Vector2::new(101.0, 462.0)).length() < 1e-12);
    }

    #[test]
    fn test_zero_normal_bounce_ignored() {
        let body = RigidBody {
            phase: MotionPhase::Bouncing {
                normals: vec![Vector2::ZERO],
            },
            ..RigidBody::new(Vector2::new(100.0, 100.0), 30.0).with_velocity(Vector2::new(0.0, 2.0))
        };
        let (next, report) = advance_frame(&body, &[floor(500.0)], GRAVITY);
        assert_eq!(report.ignored_responses, 1);
        assert_eq!(next.velocity, Vector2::new(0.0, 2.0));
    }

    #[test]
    fn test_tunnelling_through_thin_edge_caught() {
        // Fast enough to jump from well above to well below in one frame
        let edges = [floor(500.0)];
        let body = RigidBody::new(Vector2::new(100.0, 400.0), 10.0)
            .with_velocity(Vector2::new(0.0, 250.0));
        let (next, report) = advance_frame(&body, &edges, GRAVITY);
        assert_eq!(report.contacts.len(), 1);
        assert!(report.contacts[0].tunnelled);
        assert!((next.position.y - 490.0).abs() < 1e-9);
        assert!(next.is_bouncing());
    }

    #[test]
    fn test_corner_hit_resolves_each_edge() {
        let quad = Quadrilateral::new(2000.0, 200.0, 200.0, 800.0, 800.0);
        let body = RigidBody::new(Vector2::new(1960.0, 760.0), 30.0)
            .with_velocity(Vector2::new(20.0, 20.0));
        let (next, report) = advance_frame(&body, quad.edges(), Vector2::ZERO);

        assert_eq!(report.contacts.len(), 2);
        assert!((next.position - Vector2::new(1970.0, 770.0)).length() < 1e-9);

        // Both components flip on the following frame
        let after = step_frame(&next, quad.edges(), Vector2::ZERO);
        assert!((after.velocity - Vector2::new(-20.0, -20.0)).length() < 1e-9);
    }

    #[test]
    fn test_ball_stays_inside_quad() {
        let quad = Quadrilateral::new(2000.0, 200.0, 250.0, 800.0, 750.0);
        let mut body = spawn_body(Vector2::new(1000.0, 400.0), 30.0, quad.edges())
            .unwrap()
            .with_velocity(Vector2::new(13.0, -4.0));
        for _ in 0..2000 {
            body = step_frame(&body, quad.edges(), GRAVITY);
            for edge in quad.edges() {
                assert!(collision::signed_distance(body.position, edge) > 0.0);
            }
        }
    }
}
