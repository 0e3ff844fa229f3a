//! Error types
//!
//! Geometry never errors: degenerate cases fall back to a zero vector or a
//! skipped response. These types cover the few operations a caller can get
//! wrong outright.

use thiserror::Error;

use crate::sim::EdgeId;

/// Failure to load or validate a [`SimConfig`](crate::SimConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

/// Failure of an edit request against the live boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// The edge is not part of the current boundary layout
    #[error("edge {0:?} is not part of the current boundary")]
    UnknownEdge(EdgeId),

    /// The edge exists but its endpoints cannot be dragged
    #[error("edge {0:?} is fixed")]
    FixedEdge(EdgeId),

    /// A quadrilateral whose edges do not meet end to start
    #[error("quadrilateral edges do not form a closed loop")]
    OpenQuadrilateral,
}
