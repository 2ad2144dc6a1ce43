//! Position solvers
//!
//! Two estimators over a [`RangeModel`](crate::core::RangeModel):
//! - [`LinearLeastSquares`]: closed-form approximation, useful as a cheap
//!   seed, never the final answer;
//! - [`NonLinearLeastSquares`]: iterative refinement driven by a pluggable
//!   [`LeastSquaresOptimizer`] strategy, with [`LevenbergMarquardt`] shipped
//!   as the default implementation.

pub mod levenberg_marquardt;
pub mod linear;
pub mod nonlinear;

pub use levenberg_marquardt::LevenbergMarquardt;
pub use linear::LinearLeastSquares;
pub use nonlinear::NonLinearLeastSquares;

use nalgebra::{DMatrix, DVector};

use crate::core::RangeModel;
use crate::error::MultilaterationResult;

/// A fully wired weighted nonlinear least-squares problem: the residual
/// model plus the data an iterative strategy needs to run.
#[derive(Debug, Clone)]
pub struct LeastSquaresProblem<'a> {
    /// Residual and Jacobian provider
    pub model: &'a RangeModel,
    /// Target residual values at the optimum, length N (conventionally zero)
    pub target: DVector<f64>,
    /// Per-anchor confidence weights, length N
    pub weights: DVector<f64>,
    /// Starting point for the iteration, length D
    pub initial_point: DVector<f64>,
    /// Iteration cap; exceeding it is reported as non-convergence
    pub max_iterations: usize,
    /// Residual/Jacobian evaluation cap
    pub max_evaluations: usize,
}

/// Converged estimate plus fit diagnostics.
///
/// `sigma` and `covariance` are best effort: they are `None` when the
/// normal-equations matrix at the converged point is singular. The point
/// estimate itself is still valid in that case.
#[derive(Debug, Clone)]
pub struct Optimum {
    /// Refined position estimate, length D
    pub point: DVector<f64>,
    /// Number of optimizer iterations performed
    pub iterations: usize,
    /// Number of residual/Jacobian evaluations performed
    pub evaluations: usize,
    /// Root mean square of the weighted residuals at the solution
    pub rms: f64,
    /// Per-parameter standard deviation, square roots of the covariance
    /// diagonal
    pub sigma: Option<DVector<f64>>,
    /// Covariance matrix of the fitted parameters (D x D)
    pub covariance: Option<DMatrix<f64>>,
}

/// An iterative weighted nonlinear least-squares strategy.
///
/// Any algorithm that consumes (residual, Jacobian, target, weights, initial
/// point, caps) and produces a converged point with diagnostics can be
/// plugged into [`NonLinearLeastSquares`]. Convergence criteria are entirely
/// the strategy's business; the caps in the problem are a hard upper bound
/// it must respect.
pub trait LeastSquaresOptimizer {
    /// Run the iteration to convergence or to the problem's caps.
    ///
    /// Returns `NonConvergence` (carrying the best point found) when a cap
    /// is reached first.
    fn optimize(&self, problem: &LeastSquaresProblem<'_>) -> MultilaterationResult<Optimum>;
}
