//! Simulation configuration
//!
//! Everything the frame step reads but never owns: viewport, gravity range,
//! drag margins and the initial boundary. Loaded from JSON; missing fields
//! fall back to the demo defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Which boundary the simulation starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryLayout {
    /// A single slope spanning the viewport; free space above it
    #[default]
    Slope,
    /// A closed four-sided region; free space inside it
    Quad,
}

impl BoundaryLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryLayout::Slope => "slope",
            BoundaryLayout::Quad => "quad",
        }
    }
}

/// Bounds and starting value of the gravity control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityRange {
    pub min: f64,
    pub max: f64,
    pub initial: f64,
}

impl Default for GravityRange {
    fn default() -> Self {
        Self {
            min: GRAVITY_MIN,
            max: GRAVITY_MAX,
            initial: GRAVITY_DEFAULT,
        }
    }
}

impl GravityRange {
    /// Clamp a gravity scalar into `[min, max]`
    ///
    /// An inverted range is read with its bounds swapped.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        value.max(lo).min(hi)
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Viewport ===
    pub width: f64,
    pub height: f64,

    // === Drag handles ===
    /// Handle square size; also the base of the endpoint margin
    pub border_size: f64,
    /// Margin kept between a dragged endpoint and the viewport, as a fraction of `border_size`
    pub handle_margin_fraction: f64,

    // === Dynamics ===
    pub gravity: GravityRange,
    /// Frames per second of the driving loop
    pub frame_rate: u32,
    /// Ball radius as a fraction of `height`
    pub ball_radius_fraction: f64,

    // === Boundary ===
    pub layout: BoundaryLayout,
    pub slope_start_fraction: f64,
    pub slope_end_fraction: f64,
    pub quad_top_fraction: f64,
    pub quad_bottom_fraction: f64,
    /// Smallest vertical gap between the top and bottom edge at either side
    pub quad_min_opening: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,

            border_size: BORDER_SIZE,
            handle_margin_fraction: HANDLE_MARGIN_FRACTION,

            gravity: GravityRange::default(),
            frame_rate: FRAME_RATE,
            ball_radius_fraction: BALL_RADIUS_FRACTION,

            layout: BoundaryLayout::Slope,
            slope_start_fraction: SLOPE_START_FRACTION,
            slope_end_fraction: SLOPE_END_FRACTION,
            quad_top_fraction: QUAD_TOP_FRACTION,
            quad_bottom_fraction: QUAD_BOTTOM_FRACTION,
            quad_min_opening: QUAD_MIN_OPENING,
        }
    }
}

impl SimConfig {
    /// Default configuration with a different starting boundary
    pub fn with_layout(layout: BoundaryLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Distance a dragged endpoint must keep from the top and bottom of the viewport
    #[inline]
    pub fn handle_margin(&self) -> f64 {
        self.handle_margin_fraction * self.border_size
    }

    /// Clamp an endpoint height into `[margin, height - margin]`
    ///
    /// When the margins overlap there is no band left and every height maps
    /// to the middle of the viewport.
    pub fn clamp_y(&self, y: f64) -> f64 {
        let margin = self.handle_margin();
        let (lo, hi) = (margin, self.height - margin);
        if lo > hi {
            return self.height / 2.0;
        }
        y.max(lo).min(hi)
    }

    /// Radius of a freshly spawned ball
    #[inline]
    pub fn ball_radius(&self) -> f64 {
        self.ball_radius_fraction * self.height
    }

    /// Gravity value the simulation starts with, clamped into range
    #[inline]
    pub fn initial_gravity(&self) -> f64 {
        self.gravity.clamp(self.gravity.initial)
    }

    /// Check every field for values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::invalid("width", "must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::invalid("height", "must be positive"));
        }
        if !(self.border_size.is_finite() && self.border_size >= 0.0) {
            return Err(ConfigError::invalid("border_size", "must be non-negative"));
        }
        if !(self.handle_margin_fraction.is_finite() && self.handle_margin_fraction >= 0.0) {
            return Err(ConfigError::invalid(
                "handle_margin_fraction",
                "must be non-negative",
            ));
        }
        if 2.0 * self.handle_margin() >= self.height {
            return Err(ConfigError::invalid(
                "handle_margin_fraction",
                "leaves no room between the margins",
            ));
        }
        let g = &self.gravity;
        if !(g.min.is_finite() && g.max.is_finite() && g.initial.is_finite()) {
            return Err(ConfigError::invalid("gravity", "must be finite"));
        }
        if g.min > g.max {
            return Err(ConfigError::invalid("gravity", "min exceeds max"));
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::invalid("frame_rate", "must be non-zero"));
        }
        if !(self.ball_radius_fraction.is_finite() && self.ball_radius_fraction > 0.0) {
            return Err(ConfigError::invalid("ball_radius_fraction", "must be positive"));
        }
        for (field, value) in [
            ("slope_start_fraction", self.slope_start_fraction),
            ("slope_end_fraction", self.slope_end_fraction),
            ("quad_top_fraction", self.quad_top_fraction),
            ("quad_bottom_fraction", self.quad_bottom_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, "must be within 0..=1"));
            }
        }
        if self.quad_top_fraction >= self.quad_bottom_fraction {
            return Err(ConfigError::invalid(
                "quad_top_fraction",
                "must be above quad_bottom_fraction",
            ));
        }
        if !(self.quad_min_opening.is_finite() && self.quad_min_opening >= 0.0) {
            return Err(ConfigError::invalid("quad_min_opening", "must be non-negative"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded config from {} ({} layout, {}x{})",
            path.display(),
            config.layout.as_str(),
            config.width,
            config.height
        );
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
