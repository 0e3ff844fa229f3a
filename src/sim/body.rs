//! The single moving ball

use std::fmt;

use serde::{Deserialize, Serialize};

use super::collision;
use super::vector::{self, Vector2};

/// Where a body is in the bounce cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum MotionPhase {
    /// Gravity, integrate, collide
    #[default]
    Falling,
    /// Reflections queued by last frame's collisions, applied before anything else this frame
    Bouncing { normals: Vec<Vector2> },
}

/// Kinematic state of the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vector2,
    pub velocity: Vector2,
    /// Accumulated force for the current frame (unit mass)
    pub acceleration: Vector2,
    pub radius: f64,
    #[serde(default)]
    pub phase: MotionPhase,
}

impl RigidBody {
    /// Body at rest at `position`
    pub fn new(position: Vector2, radius: f64) -> Self {
        Self {
            position,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            radius,
            phase: MotionPhase::Falling,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Accumulate a force into this frame's acceleration
    #[inline]
    pub fn apply_force(&mut self, force: Vector2) {
        self.acceleration = vector::add(self.acceleration, force);
    }

    /// Semi-implicit Euler step of one frame: velocity first, then position
    pub fn integrate(&mut self) {
        self.velocity = vector::add(self.velocity, self.acceleration);
        self.position = vector::add(self.position, self.velocity);
        self.acceleration = Vector2::ZERO;
    }

    /// Reflect velocity about `normal`
    #[inline]
    pub fn bounce(&mut self, normal: Vector2) {
        self.velocity = collision::reflect(self.velocity, normal);
    }

    /// Move the centre so the circle just touches a line on its free side
    #[inline]
    pub fn move_out_of(&mut self, normal: Vector2, outward: Vector2) {
        self.position =
            collision::reposition_out_of_penetration(self.position, self.radius, normal, outward);
    }

    /// Queue a reflection for the start of next frame
    pub fn queue_bounce(&mut self, normal: Vector2) {
        match &mut self.phase {
            MotionPhase::Bouncing { normals } => normals.push(normal),
            MotionPhase::Falling => {
                self.phase = MotionPhase::Bouncing {
                    normals: vec![normal],
                }
            }
        }
    }

    #[inline]
    pub fn is_bouncing(&self) -> bool {
        matches!(self.phase, MotionPhase::Bouncing { .. })
    }
}

impl fmt::Display for RigidBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) acc=({:.2}, {:.2}) r={:.1}",
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.acceleration.x,
            self.acceleration.y,
            self.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_semi_implicit() {
        let mut body = RigidBody::new(Vector2::new(100.0, 100.0), 30.0);
        body.apply_force(Vector2::new(0.0, 0.5));
        body.apply_force(Vector2::new(0.0, 0.5));
        body.integrate();

        // Velocity updated before position
        assert_eq!(body.velocity, Vector2::new(0.0, 1.0));
        assert_eq!(body.position, Vector2::new(100.0, 101.0));
        assert_eq!(body.acceleration, Vector2::ZERO);
    }

    #[test]
    fn test_bounce() {
        let mut body = RigidBody::new(Vector2::ZERO, 10.0).with_velocity(Vector2::new(2.0, 5.0));
        body.bounce(Vector2::new(0.0, -3.0));
        assert!((body.velocity - Vector2::new(2.0, -5.0)).length() < 1e-12);
    }

    #[test]
    fn test_queue_bounce_accumulates() {
        let mut body = RigidBody::new(Vector2::ZERO, 10.0);
        assert!(!body.is_bouncing());
        body.queue_bounce(Vector2::new(0.0, 1.0));
        body.queue_bounce(Vector2::new(-1.0, 0.0));
        assert_eq!(
            body.phase,
            MotionPhase::Bouncing {
                normals: vec![Vector2::new(0.0, 1.0), Vector2::new(-1.0, 0.0)]
            }
        );
    }

    #[test]
    fn test_display() {
        let body = RigidBody::new(Vector2::new(1.0, 2.0), 3.0);
        assert_eq!(
            body.to_string(),
            "pos=(1.00, 2.00) vel=(0.00, 0.00) acc=(0.00, 0.00) r=3.0"
        );
    }
}
