//! Edge geometry: straight boundary segments and the boundaries built from them
//!
//! An edge is a directed segment with a derived gradient. Which side of the
//! edge is free space is stored explicitly, so the outward normal never has
//! to be guessed from the sign of a coordinate.

use serde::{Deserialize, Serialize};

use super::vector::{self, Vector2};
use crate::config::{BoundaryLayout, SimConfig};
use crate::consts::GEOMETRY_EPSILON;
use crate::error::SimError;

/// Gradient classification of an edge's line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Finite gradient `dy/dx`
    Sloped { gradient: f64 },
    /// `start.x == end.x`; the gradient is undefined
    Vertical,
}

impl EdgeKind {
    fn between(start: Vector2, end: Vector2) -> Self {
        let dx = end.x - start.x;
        if dx == 0.0 {
            EdgeKind::Vertical
        } else {
            EdgeKind::Sloped {
                gradient: (end.y - start.y) / dx,
            }
        }
    }
}

/// Side of a directed edge, as seen on a y-down screen walking from start to end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// A directed boundary segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "EdgeRepr", into = "EdgeRepr")]
pub struct Edge {
    start: Vector2,
    end: Vector2,
    kind: EdgeKind,
    /// Side of the line the ball is allowed to occupy
    free_side: Side,
}

/// Serialized form; `kind` is always re-derived on load
#[derive(Serialize, Deserialize)]
struct EdgeRepr {
    start: Vector2,
    end: Vector2,
    free_side: Side,
}

impl From<EdgeRepr> for Edge {
    fn from(repr: EdgeRepr) -> Self {
        Edge::new(repr.start, repr.end, repr.free_side)
    }
}

impl From<Edge> for EdgeRepr {
    fn from(edge: Edge) -> Self {
        Self {
            start: edge.start,
            end: edge.end,
            free_side: edge.free_side,
        }
    }
}

impl Edge {
    pub fn new(start: Vector2, end: Vector2, free_side: Side) -> Self {
        Self {
            start,
            end,
            kind: EdgeKind::between(start, end),
            free_side,
        }
    }

    #[inline]
    pub fn start(&self) -> Vector2 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Vector2 {
        self.end
    }

    #[inline]
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    #[inline]
    pub fn free_side(&self) -> Side {
        self.free_side
    }

    /// Gradient of the line, `None` when vertical
    pub fn gradient(&self) -> Option<f64> {
        match self.kind {
            EdgeKind::Sloped { gradient } => Some(gradient),
            EdgeKind::Vertical => None,
        }
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        matches!(self.kind, EdgeKind::Vertical)
    }

    /// Vector from start to end
    #[inline]
    pub fn direction(&self) -> Vector2 {
        vector::sub(self.end, self.start)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        vector::magnitude(self.direction())
    }

    /// Zero-length edges define no line and never collide
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length() < GEOMETRY_EPSILON
    }

    /// Unit normal pointing into free space (zero for a degenerate edge)
    pub fn outward_normal(&self) -> Vector2 {
        let right = vector::normalize(vector::perp_right(self.direction()));
        match self.free_side {
            Side::Right => right,
            Side::Left => -right,
        }
    }

    pub fn set_start(&mut self, start: Vector2) {
        self.set_endpoints(start, self.end);
    }

    pub fn set_end(&mut self, end: Vector2) {
        self.set_endpoints(self.start, end);
    }

    /// Move both endpoints and re-derive the gradient
    pub fn set_endpoints(&mut self, start: Vector2, end: Vector2) {
        self.start = start;
        self.end = end;
        self.kind = EdgeKind::between(start, end);
    }

    /// Position of one endpoint
    pub fn endpoint(&self, endpoint: Endpoint) -> Vector2 {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }
}

/// Names every edge a boundary can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeId {
    Slope,
    Top,
    Right,
    Bottom,
    Left,
}

/// One end of a directed edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

/// Corners of a [`Quadrilateral`], clockwise from the top left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// Corner on the same vertical side of the region
    fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomLeft,
            Corner::TopRight => Corner::BottomRight,
            Corner::BottomRight => Corner::TopRight,
            Corner::BottomLeft => Corner::TopLeft,
        }
    }

    fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Closed four-sided region: top, right, bottom, left, each edge ending where the next starts
///
/// Traversal is clockwise on screen, so free space (the interior) lies on the
/// right of every edge. Left and right edges stay vertical at `x = 0` and
/// `x = width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuadrilateralRepr")]
pub struct Quadrilateral {
    edges: [Edge; 4],
}

/// Serialized form; the loop is checked on load
#[derive(Deserialize)]
struct QuadrilateralRepr {
    edges: [Edge; 4],
}

impl TryFrom<QuadrilateralRepr> for Quadrilateral {
    type Error = SimError;

    fn try_from(repr: QuadrilateralRepr) -> Result<Self, Self::Error> {
        let quad = Self { edges: repr.edges };
        if quad.is_closed() {
            Ok(quad)
        } else {
            Err(SimError::OpenQuadrilateral)
        }
    }
}

impl Quadrilateral {
    pub const TOP: usize = 0;
    pub const RIGHT: usize = 1;
    pub const BOTTOM: usize = 2;
    pub const LEFT: usize = 3;

    /// Region spanning `0..width` with the given corner heights
    pub fn new(
        width: f64,
        top_left_y: f64,
        top_right_y: f64,
        bottom_right_y: f64,
        bottom_left_y: f64,
    ) -> Self {
        let top_left = Vector2::new(0.0, top_left_y);
        let top_right = Vector2::new(width, top_right_y);
        let bottom_right = Vector2::new(width, bottom_right_y);
        let bottom_left = Vector2::new(0.0, bottom_left_y);

        Self {
            edges: [
                Edge::new(top_left, top_right, Side::Right),
                Edge::new(top_right, bottom_right, Side::Right),
                Edge::new(bottom_right, bottom_left, Side::Right),
                Edge::new(bottom_left, top_left, Side::Right),
            ],
        }
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn top(&self) -> &Edge {
        &self.edges[Self::TOP]
    }

    pub fn right(&self) -> &Edge {
        &self.edges[Self::RIGHT]
    }

    pub fn bottom(&self) -> &Edge {
        &self.edges[Self::BOTTOM]
    }

    pub fn left(&self) -> &Edge {
        &self.edges[Self::LEFT]
    }

    pub fn corner(&self, corner: Corner) -> Vector2 {
        match corner {
            Corner::TopLeft => self.edges[Self::TOP].start,
            Corner::TopRight => self.edges[Self::TOP].end,
            Corner::BottomRight => self.edges[Self::BOTTOM].start,
            Corner::BottomLeft => self.edges[Self::BOTTOM].end,
        }
    }

    /// Move a corner vertically, updating both edges that meet there
    pub fn set_corner_y(&mut self, corner: Corner, y: f64) {
        let p = Vector2::new(self.corner(corner).x, y);
        // (edge whose end is the corner, edge whose start is the corner)
        let (incoming, outgoing) = match corner {
            Corner::TopLeft => (Self::LEFT, Self::TOP),
            Corner::TopRight => (Self::TOP, Self::RIGHT),
            Corner::BottomRight => (Self::RIGHT, Self::BOTTOM),
            Corner::BottomLeft => (Self::BOTTOM, Self::LEFT),
        };
        self.edges[incoming].set_end(p);
        self.edges[outgoing].set_start(p);
    }

    /// Every edge ends exactly where the next one starts
    pub fn is_closed(&self) -> bool {
        (0..4).all(|i| self.edges[i].end == self.edges[(i + 1) % 4].start)
    }
}

/// The set of fixed edges a ball collides with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Boundary {
    /// One slope across the viewport, free space above
    Slope(Edge),
    /// Closed region, free space inside
    Quad(Quadrilateral),
}

impl Boundary {
    /// Slope from `(0, start_y)` to `(width, end_y)`
    pub fn slope(width: f64, start_y: f64, end_y: f64) -> Self {
        Boundary::Slope(Edge::new(
            Vector2::new(0.0, start_y),
            Vector2::new(width, end_y),
            Side::Left,
        ))
    }

    /// Initial boundary described by a config, endpoints clamped into the margins
    pub fn from_config(config: &SimConfig) -> Self {
        let h = config.height;
        match config.layout {
            BoundaryLayout::Slope => Boundary::slope(
                config.width,
                config.clamp_y(config.slope_start_fraction * h),
                config.clamp_y(config.slope_end_fraction * h),
            ),
            BoundaryLayout::Quad => {
                let top = config.clamp_y(config.quad_top_fraction * h);
                let bottom = config.clamp_y(config.quad_bottom_fraction * h);
                Boundary::Quad(Quadrilateral::new(config.width, top, top, bottom, bottom))
            }
        }
    }

    pub fn layout(&self) -> BoundaryLayout {
        match self {
            Boundary::Slope(_) => BoundaryLayout::Slope,
            Boundary::Quad(_) => BoundaryLayout::Quad,
        }
    }

    /// Edges in collision order
    pub fn edges(&self) -> &[Edge] {
        match self {
            Boundary::Slope(edge) => std::slice::from_ref(edge),
            Boundary::Quad(quad) => quad.edges(),
        }
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        match (self, id) {
            (Boundary::Slope(edge), EdgeId::Slope) => Some(edge),
            (Boundary::Quad(quad), EdgeId::Top) => Some(quad.top()),
            (Boundary::Quad(quad), EdgeId::Right) => Some(quad.right()),
            (Boundary::Quad(quad), EdgeId::Bottom) => Some(quad.bottom()),
            (Boundary::Quad(quad), EdgeId::Left) => Some(quad.left()),
            _ => None,
        }
    }

    /// Endpoints that can be dragged
    pub fn handles(&self) -> &'static [(EdgeId, Endpoint)] {
        match self {
            Boundary::Slope(_) => &[(EdgeId::Slope, Endpoint::Start), (EdgeId::Slope, Endpoint::End)],
            Boundary::Quad(_) => &[
                (EdgeId::Top, Endpoint::Start),
                (EdgeId::Top, Endpoint::End),
                (EdgeId::Bottom, Endpoint::Start),
                (EdgeId::Bottom, Endpoint::End),
            ],
        }
    }

    /// Current position of a draggable endpoint
    pub fn endpoint(&self, id: EdgeId, endpoint: Endpoint) -> Result<Vector2, SimError> {
        self.check_draggable(id)?;
        self.edge(id)
            .map(|edge| edge.endpoint(endpoint))
            .ok_or(SimError::UnknownEdge(id))
    }

    /// Move a draggable endpoint to height `y`, clamped into the config margins
    ///
    /// Returns the height actually applied. A quadrilateral stays closed and
    /// keeps its top at least `quad_min_opening` above its bottom on each side.
    pub fn set_endpoint_y(
        &mut self,
        id: EdgeId,
        endpoint: Endpoint,
        y: f64,
        config: &SimConfig,
    ) -> Result<f64, SimError> {
        self.check_draggable(id)?;
        match self {
            Boundary::Slope(edge) => {
                let y = config.clamp_y(y);
                let mut p = edge.endpoint(endpoint);
                p.y = y;
                match endpoint {
                    Endpoint::Start => edge.set_start(p),
                    Endpoint::End => edge.set_end(p),
                }
                Ok(y)
            }
            Boundary::Quad(quad) => {
                let corner = match (id, endpoint) {
                    (EdgeId::Top, Endpoint::Start) => Corner::TopLeft,
                    (EdgeId::Top, Endpoint::End) => Corner::TopRight,
                    (EdgeId::Bottom, Endpoint::Start) => Corner::BottomRight,
                    _ => Corner::BottomLeft,
                };
                let opposite_y = quad.corner(corner.opposite()).y;
                let y = if corner.is_top() {
                    y.min(opposite_y - config.quad_min_opening)
                } else {
                    y.max(opposite_y + config.quad_min_opening)
                };
                let y = config.clamp_y(y);
                quad.set_corner_y(corner, y);
                Ok(y)
            }
        }
    }

    fn check_draggable(&self, id: EdgeId) -> Result<(), SimError> {
        match (self, id) {
            (Boundary::Slope(_), EdgeId::Slope) => Ok(()),
            (Boundary::Quad(_), EdgeId::Top | EdgeId::Bottom) => Ok(()),
            (Boundary::Quad(_), EdgeId::Left | EdgeId::Right) => Err(SimError::FixedEdge(id)),
            _ => Err(SimError::UnknownEdge(id)),
        }
    }
}
