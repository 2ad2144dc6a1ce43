//! Error types for the multilateration solver
//!
//! Structural input problems always propagate to the caller. Numerical
//! degeneracies inside a solve (a singular linear system, an
//! ill-conditioned covariance) are absorbed or degraded gracefully instead,
//! since a best-effort position estimate is more useful than a hard failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used throughout the crate
pub type MultilaterationResult<T> = Result<T, MultilaterationError>;

/// Error classification for problem construction and solving
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum MultilaterationError {
    /// Fewer anchor positions than the solver can work with
    #[error("need at least {required} anchor positions, got {provided}")]
    InsufficientAnchors { provided: usize, required: usize },

    /// Position count and distance count disagree
    #[error("{positions} anchor positions do not match {distances} distances")]
    CountMismatch { positions: usize, distances: usize },

    /// One anchor has a different coordinate dimension than the first
    #[error("anchor {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Anchors carry no coordinates at all
    #[error("anchor positions must have at least one coordinate")]
    EmptyDimension,

    /// A caller-supplied vector has the wrong length for this problem
    #[error("{what} has length {found}, expected {expected}")]
    LengthMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// A caller-supplied weight is not usable (non-finite or non-positive)
    #[error("weight {index} is {value}, weights must be finite and positive")]
    InvalidWeight { index: usize, value: f64 },

    /// The optimizer hit its iteration or evaluation cap before its
    /// convergence criterion was satisfied. Carries the best point found so
    /// the caller can still inspect it, clearly marked as unconverged.
    #[error("no convergence after {iterations} iterations and {evaluations} evaluations")]
    NonConvergence {
        iterations: usize,
        evaluations: usize,
        best_point: Vec<f64>,
    },
}
