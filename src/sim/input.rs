//! Pointer handling: drag handles on edge endpoints and click-to-spawn
//!
//! Handles are `border_size` squares sitting just outside each draggable
//! endpoint, vertically centred on it. A click that finishes a drag must not
//! also spawn a ball, so releasing a handle swallows the click that follows.

use super::edge::{EdgeId, Endpoint};
use super::state::Simulation;
use super::vector::Vector2;

/// Axis-aligned handle hit box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleRect {
    pub min: Vector2,
    pub max: Vector2,
}

impl HandleRect {
    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Hit box of the handle for one endpoint
///
/// Endpoints on the left half of the viewport get a handle to their left,
/// the others to their right.
pub fn handle_rect(sim: &Simulation, edge: EdgeId, endpoint: Endpoint) -> Option<HandleRect> {
    let p = sim.boundary().endpoint(edge, endpoint).ok()?;
    let size = sim.config().border_size;
    let x0 = if p.x < sim.config().width / 2.0 { p.x - size } else { p.x };
    Some(HandleRect {
        min: Vector2::new(x0, p.y - size / 2.0),
        max: Vector2::new(x0 + size, p.y + size / 2.0),
    })
}

/// Result of a click on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A new ball replaced the old one
    Spawned,
    /// The position was inside the boundary; no ball remains
    Rejected,
    /// The click ended a drag gesture
    Ignored,
}

/// Pointer gesture state carried between events
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    dragging: Option<(EdgeId, Endpoint)>,
    swallow_click: bool,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle currently held, if any
    #[inline]
    pub fn dragging(&self) -> Option<(EdgeId, Endpoint)> {
        self.dragging
    }

    /// Pointer pressed; grabs a handle under `p`. Returns whether one was grabbed.
    pub fn press(&mut self, sim: &Simulation, p: Vector2) -> bool {
        self.swallow_click = false;
        self.dragging = sim
            .boundary()
            .handles()
            .iter()
            .copied()
            .find(|&(edge, endpoint)| {
                handle_rect(sim, edge, endpoint).is_some_and(|rect| rect.contains(p))
            });
        if let Some((edge, endpoint)) = self.dragging {
            log::debug!("Grabbed {:?} {:?}", edge, endpoint);
        }
        self.dragging.is_some()
    }

    /// Pointer moved while pressed; moves the held endpoint to `p.y`
    ///
    /// Returns the height applied, or `None` when nothing is held.
    pub fn drag(&mut self, sim: &mut Simulation, p: Vector2) -> Option<f64> {
        let (edge, endpoint) = self.dragging?;
        match sim.set_edge_endpoint(edge, endpoint, p.y) {
            Ok(y) => Some(y),
            Err(err) => {
                log::warn!("Drag dropped: {}", err);
                self.dragging = None;
                None
            }
        }
    }

    /// Pointer released
    pub fn release(&mut self) {
        if self.dragging.take().is_some() {
            self.swallow_click = true;
        }
    }

    /// Click at `p`; spawns a ball unless the click ends a drag
    pub fn click(&mut self, sim: &mut Simulation, p: Vector2) -> ClickOutcome {
        if self.dragging.is_some() || std::mem::take(&mut self.swallow_click) {
            return ClickOutcome::Ignored;
        }
        match sim.spawn_body(p) {
            Some(_) => ClickOutcome::Spawned,
            None => ClickOutcome::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoundaryLayout, SimConfig};

    #[test]
    fn test_handle_rects_sit_outside_endpoints() {
        let sim = Simulation::default();
        let left = handle_rect(&sim, EdgeId::Slope, Endpoint::Start).unwrap();
        assert_eq!(left.min, Vector2::new(-25.0, 487.5));
        assert_eq!(left.max, Vector2::new(0.0, 512.5));

        let right = handle_rect(&sim, EdgeId::Slope, Endpoint::End).unwrap();
        assert_eq!(right.min, Vector2::new(2000.0, 687.5));

        assert!(handle_rect(&sim, EdgeId::Top, Endpoint::Start).is_none());
    }

    #[test]
    fn test_drag_moves_endpoint() {
        let mut sim = Simulation::default();
        let mut input = PointerInput::new();

        assert!(input.press(&sim, Vector2::new(-10.0, 500.0)));
        assert_eq!(input.drag(&mut sim, Vector2::new(-10.0, 300.0)), Some(300.0));
        assert_eq!(input.drag(&mut sim, Vector2::new(-10.0, -80.0)), Some(18.75));
        input.release();

        assert_eq!(sim.edges()[0].start(), Vector2::new(0.0, 18.75));
        assert!(input.dragging().is_none());
    }

    #[test]
    fn test_click_after_drag_is_swallowed() {
        let mut sim = Simulation::default();
        let mut input = PointerInput::new();

        input.press(&sim, Vector2::new(2010.0, 700.0));
        input.drag(&mut sim, Vector2::new(2010.0, 650.0));
        input.release();
        assert_eq!(input.click(&mut sim, Vector2::new(2010.0, 650.0)), ClickOutcome::Ignored);
        assert!(sim.body().is_none());

        // Next gesture is a plain click
        assert!(!input.press(&sim, Vector2::new(500.0, 100.0)));
        input.release();
        assert_eq!(input.click(&mut sim, Vector2::new(500.0, 100.0)), ClickOutcome::Spawned);
        assert!(sim.body().is_some());
    }

    #[test]
    fn test_click_inside_geometry_rejected() {
        let mut sim = Simulation::default();
        let mut input = PointerInput::new();
        assert_eq!(input.click(&mut sim, Vector2::new(500.0, 900.0)), ClickOutcome::Rejected);
    }

    #[test]
    fn test_quad_corner_handles() {
        let mut sim = Simulation::new(SimConfig::with_layout(BoundaryLayout::Quad));
        let mut input = PointerInput::new();

        // Bottom-right corner at (2000, 800); its handle lies to the right
        assert!(input.press(&sim, Vector2::new(2012.0, 805.0)));
        assert_eq!(input.dragging(), Some((EdgeId::Bottom, Endpoint::Start)));
        assert_eq!(input.drag(&mut sim, Vector2::new(2012.0, 900.0)), Some(900.0));
    }
}
