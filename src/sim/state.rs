//! Simulation context
//!
//! Owns everything one running demo needs: the configuration, the live
//! boundary, the gravity setting and the (at most one) ball. The caller owns
//! the context and drives it one frame at a time.

use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::edge::{Boundary, Edge, EdgeId, Endpoint};
use super::tick::{FrameReport, advance_frame, spawn_body};
use super::vector::Vector2;
use crate::config::{BoundaryLayout, SimConfig};
use crate::error::{ConfigError, SimError};

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SimulationRepr")]
pub struct Simulation {
    config: SimConfig,
    boundary: Boundary,
    /// Downward gravity scalar, always within the configured range
    gravity: f64,
    body: Option<RigidBody>,
    /// Frames advanced since creation
    frame: u64,
    /// Frames on which a queued bounce was applied
    bounces: u64,
    /// Collision responses skipped because their geometry was degenerate
    ignored_responses: u64,
}

/// Serialized form; a snapshot must carry a valid config
#[derive(Deserialize)]
struct SimulationRepr {
    config: SimConfig,
    boundary: Boundary,
    gravity: f64,
    body: Option<RigidBody>,
    frame: u64,
    bounces: u64,
    ignored_responses: u64,
}

impl TryFrom<SimulationRepr> for Simulation {
    type Error = ConfigError;

    fn try_from(repr: SimulationRepr) -> Result<Self, Self::Error> {
        let mut config = repr.config;
        config.validate()?;
        config.layout = repr.boundary.layout();
        let gravity = if repr.gravity.is_finite() {
            config.gravity.clamp(repr.gravity)
        } else {
            config.initial_gravity()
        };
        Ok(Self {
            config,
            boundary: repr.boundary,
            gravity,
            body: repr.body,
            frame: repr.frame,
            bounces: repr.bounces,
            ignored_responses: repr.ignored_responses,
        })
    }
}

impl Simulation {
    /// Build a simulation from `config`
    ///
    /// A config that fails validation is still accepted; its ranges are read
    /// leniently by the clamps and a warning is logged.
    pub fn new(config: SimConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("Running with an unchecked config: {}", e);
        }
        let boundary = Boundary::from_config(&config);
        let gravity = config.initial_gravity();
        log::info!(
            "Simulation created: {} layout, gravity {}, {} fps",
            boundary.layout().as_str(),
            gravity,
            config.frame_rate
        );
        Self {
            config,
            boundary,
            gravity,
            body: None,
            frame: 0,
            bounces: 0,
            ignored_responses: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        self.boundary.edges()
    }

    #[inline]
    pub fn body(&self) -> Option<&RigidBody> {
        self.body.as_ref()
    }

    #[inline]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Gravity as a force vector (screen y points down)
    #[inline]
    pub fn gravity_vector(&self) -> Vector2 {
        Vector2::new(0.0, self.gravity)
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn bounces(&self) -> u64 {
        self.bounces
    }

    #[inline]
    pub fn ignored_responses(&self) -> u64 {
        self.ignored_responses
    }

    /// Replace the ball with a new one at rest at `position`
    ///
    /// A position that overlaps or sits behind an edge is rejected and
    /// leaves no ball at all.
    pub fn spawn_body(&mut self, position: Vector2) -> Option<&RigidBody> {
        self.body = spawn_body(position, self.config.ball_radius(), self.boundary.edges());
        match &self.body {
            Some(_) => log::info!("Spawned ball at ({:.1}, {:.1})", position.x, position.y),
            None => log::warn!(
                "Rejected spawn at ({:.1}, {:.1}): inside the boundary",
                position.x,
                position.y
            ),
        }
        self.body.as_ref()
    }

    /// Set the gravity scalar, clamped into the configured range
    ///
    /// Non-finite input is ignored. Returns the value in effect.
    pub fn set_gravity_scalar(&mut self, value: f64) -> f64 {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite gravity {}", value);
            return self.gravity;
        }
        self.gravity = self.config.gravity.clamp(value);
        self.gravity
    }

    /// Drag an edge endpoint to height `y`
    ///
    /// The gradient is re-derived and `y` clamped into the handle margins.
    /// Non-finite `y` leaves the endpoint where it is. Returns the height in
    /// effect.
    pub fn set_edge_endpoint(
        &mut self,
        edge: EdgeId,
        endpoint: Endpoint,
        y: f64,
    ) -> Result<f64, SimError> {
        if !y.is_finite() {
            log::warn!("Ignoring non-finite endpoint height for {:?}", edge);
            return self.boundary.endpoint(edge, endpoint).map(|p| p.y);
        }
        let applied = self
            .boundary
            .set_endpoint_y(edge, endpoint, y, &self.config)?;
        log::debug!("{:?} {:?} moved to y={:.1}", edge, endpoint, applied);
        Ok(applied)
    }

    /// Swap to a fresh boundary of another layout; a ball that no longer fits is removed
    pub fn set_layout(&mut self, layout: BoundaryLayout) {
        self.config.layout = layout;
        self.boundary = Boundary::from_config(&self.config);
        log::info!("Boundary layout set to {}", layout.as_str());

        if let Some(body) = &self.body {
            if spawn_body(body.position, body.radius, self.boundary.edges()).is_none() {
                log::info!("Ball removed: outside the new boundary");
                self.body = None;
            }
        }
    }

    /// Advance one frame
    pub fn tick(&mut self) -> FrameReport {
        self.frame += 1;
        let Some(body) = &self.body else {
            return FrameReport::default();
        };

        let (next, report) = advance_frame(body, self.boundary.edges(), self.gravity_vector());
        if report.bounced {
            self.bounces += 1;
        }
        if report.ignored_responses > 0 {
            self.ignored_responses += u64::from(report.ignored_responses);
            log::warn!(
                "Frame {}: {} collision responses ignored ({} total)",
                self.frame,
                report.ignored_responses,
                self.ignored_responses
            );
        }
        self.body = Some(next);
        report
    }

    /// Advance `frames` frames, returning how many of them had a contact
    pub fn run(&mut self, frames: u64) -> u64 {
        (0..frames).filter(|_| self.tick().hit()).count() as u64
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_from_config() {
        let sim = Simulation::default();
        assert_eq!(sim.gravity(), 0.5);
        assert_eq!(sim.edges().len(), 1);
        assert!(sim.body().is_none());

        let quad = Simulation::new(SimConfig::with_layout(BoundaryLayout::Quad));
        assert_eq!(quad.edges().len(), 4);
    }

    #[test]
    fn test_spawn_above_and_below_slope() {
        let mut sim = Simulation::default();
        let body = sim.spawn_body(Vector2::new(100.0, 100.0)).unwrap();
        assert_eq!(body.radius, 30.0);

        // Slope is at y~500 near the left edge; spawning below it fails and clears the ball
        assert!(sim.spawn_body(Vector2::new(100.0, 900.0)).is_none());
        assert!(sim.body().is_none());
    }

    #[test]
    fn test_gravity_clamped() {
        let mut sim = Simulation::default();
        assert_eq!(sim.set_gravity_scalar(25.0), 10.0);
        assert_eq!(sim.set_gravity_scalar(-1.0), 0.1);
        assert_eq!(sim.set_gravity_scalar(f64::NAN), 0.1);
        assert_eq!(sim.set_gravity_scalar(3.0), 3.0);
        assert_eq!(sim.gravity_vector(), Vector2::new(0.0, 3.0));
    }

    #[test]
    fn test_drag_beyond_viewport_clamps() {
        let mut sim = Simulation::default();
        let y = sim
            .set_edge_endpoint(EdgeId::Slope, Endpoint::Start, -1000.0)
            .unwrap();
        assert_eq!(y, 18.75);
        let y = sim
            .set_edge_endpoint(EdgeId::Slope, Endpoint::End, 1e9)
            .unwrap();
        assert_eq!(y, 981.25);

        let y = sim
            .set_edge_endpoint(EdgeId::Slope, Endpoint::End, f64::INFINITY)
            .unwrap();
        assert_eq!(y, 981.25);

        assert_eq!(
            sim.set_edge_endpoint(EdgeId::Top, Endpoint::Start, 10.0),
            Err(SimError::UnknownEdge(EdgeId::Top))
        );
    }

    #[test]
    fn test_tick_without_body() {
        let mut sim = Simulation::default();
        let report = sim.tick();
        assert!(!report.hit());
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn test_ball_bounces_on_slope() {
        let mut sim = Simulation::default();
        sim.spawn_body(Vector2::new(1000.0, 100.0)).unwrap();

        let hits = sim.run(600);
        assert!(hits > 0);
        assert!(sim.bounces() > 0);
        assert_eq!(sim.ignored_responses(), 0);

        // Never ends up below the slope
        let body = sim.body().unwrap();
        let edge = &sim.edges()[0];
        assert!(crate::sim::collision::signed_distance(body.position, edge) > 0.0);
    }

    #[test]
    fn test_layout_switch_drops_misplaced_ball() {
        let mut sim = Simulation::default();
        sim.spawn_body(Vector2::new(1000.0, 100.0)).unwrap();
        // y=100 is above the quad's top edge at y=200
        sim.set_layout(BoundaryLayout::Quad);
        assert!(sim.body().is_none());

        sim.spawn_body(Vector2::new(1000.0, 500.0)).unwrap();
        sim.set_layout(BoundaryLayout::Slope);
        assert!(sim.body().is_some());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut sim = Simulation::default();
        sim.spawn_body(Vector2::new(300.0, 100.0));
        sim.run(10);
        let json = serde_json::to_string(&sim).unwrap();
        let back: Simulation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frame(), 10);
        let (a, b) = (back.body().unwrap(), sim.body().unwrap());
        assert!((a.position - b.position).length() < 1e-9);
        assert!((a.velocity - b.velocity).length() < 1e-9);
    }

    #[test]
    fn test_unchecked_config_does_not_panic() {
        let mut sim = Simulation::new(SimConfig {
            height: 30.0,
            ..SimConfig::default()
        });
        assert_eq!(sim.edges()[0].start().y, 15.0);
        assert_eq!(sim.set_edge_endpoint(EdgeId::Slope, Endpoint::End, 5.0), Ok(15.0));

        let mut sim = Simulation::new(SimConfig {
            gravity: crate::config::GravityRange {
                min: 5.0,
                max: 1.0,
                initial: 2.0,
            },
            ..SimConfig::default()
        });
        assert_eq!(sim.gravity(), 2.0);
        assert_eq!(sim.set_gravity_scalar(9.0), 5.0);
        sim.spawn_body(Vector2::new(1000.0, 100.0)).unwrap();
        sim.run(60);
    }

    #[test]
    fn test_snapshot_with_invalid_config_rejected() {
        let sim = Simulation::default();
        let mut json: serde_json::Value = serde_json::to_value(&sim).unwrap();
        json["config"]["height"] = serde_json::json!(10.0);
        let err = serde_json::from_value::<Simulation>(json).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn test_snapshot_gravity_clamped_on_load() {
        let sim = Simulation::default();
        let mut json: serde_json::Value = serde_json::to_value(&sim).unwrap();
        json["gravity"] = serde_json::json!(99.0);
        let back: Simulation = serde_json::from_value(json).unwrap();
        assert_eq!(back.gravity(), 10.0);
    }
}
