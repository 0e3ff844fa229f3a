//! Ball Slope - a ball bouncing off a draggable slope or bounded region
//!
//! Core modules:
//! - `sim`: Collision core (vector math, edges, rigid body, frame step)
//! - `config`: Data-driven simulation configuration
//! - `error`: Error types for configuration and edge editing
//! - `wasm`: Browser bindings (wasm32 only)

pub mod config;
pub mod error;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::{BoundaryLayout, GravityRange, SimConfig};
pub use error::{ConfigError, SimError};

/// Simulation constants
pub mod consts {
    /// Target frame rate of the demo loop (one integration step per frame)
    pub const FRAME_RATE: u32 = 60;

    /// Default viewport dimensions
    pub const VIEWPORT_WIDTH: f64 = 2000.0;
    pub const VIEWPORT_HEIGHT: f64 = 1000.0;

    /// Side length of a drag handle square
    pub const BORDER_SIZE: f64 = 25.0;
    /// Fraction of `BORDER_SIZE` kept clear between a dragged endpoint and the viewport edge
    pub const HANDLE_MARGIN_FRACTION: f64 = 0.75;

    /// Gravity slider range and starting value (pixels/frame²)
    pub const GRAVITY_MIN: f64 = 0.1;
    pub const GRAVITY_MAX: f64 = 10.0;
    pub const GRAVITY_DEFAULT: f64 = 0.5;

    /// Ball radius as a fraction of viewport height
    pub const BALL_RADIUS_FRACTION: f64 = 0.03;

    /// Initial slope endpoint heights as fractions of viewport height
    pub const SLOPE_START_FRACTION: f64 = 0.5;
    pub const SLOPE_END_FRACTION: f64 = 0.7;

    /// Initial quadrilateral top/bottom heights as fractions of viewport height
    pub const QUAD_TOP_FRACTION: f64 = 0.2;
    pub const QUAD_BOTTOM_FRACTION: f64 = 0.8;
    /// Smallest vertical gap kept between the top and bottom edges of a quadrilateral
    pub const QUAD_MIN_OPENING: f64 = 100.0;

    /// Tolerance below which lengths are treated as zero and contacts as resting
    pub const GEOMETRY_EPSILON: f64 = 1e-6;
}
