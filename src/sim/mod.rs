//! Collision core
//!
//! Pure and deterministic:
//! - One fixed step per frame, no substepping
//! - At most one ball; edges are fixed within a frame
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod edge;
pub mod input;
pub mod state;
pub mod tick;
pub mod vector;

pub use body::{MotionPhase, RigidBody};
pub use collision::{
    Contact, check_edge, has_tunnelled, is_penetrating, project_onto_line, reflect,
    reposition_out_of_penetration, signed_distance,
};
pub use edge::{Boundary, Corner, Edge, EdgeId, EdgeKind, Endpoint, Quadrilateral, Side};
pub use input::{ClickOutcome, PointerInput};
pub use state::Simulation;
pub use tick::{FrameReport, advance_frame, spawn_body, step_frame};
pub use vector::Vector2;
