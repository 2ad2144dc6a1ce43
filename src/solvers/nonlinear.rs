//! Nonlinear refinement front end
//!
//! Wires a [`RangeModel`], the measurement data and a starting point into an
//! injected [`LeastSquaresOptimizer`] strategy and returns its result. The
//! component itself holds no estimation state; its only responsibilities are
//! assembling the problem, validating caller-supplied vectors and capping
//! runaway iteration.

use nalgebra::DVector;

use crate::core::constants::{DEFAULT_MAX_EVALUATIONS, DEFAULT_MAX_ITERATIONS};
use crate::core::RangeModel;
use crate::error::{MultilaterationError, MultilaterationResult};
use crate::solvers::{LeastSquaresOptimizer, LeastSquaresProblem, LevenbergMarquardt, Optimum};

/// Iterative least-squares position estimator over a [`RangeModel`]
#[derive(Debug, Clone)]
pub struct NonLinearLeastSquares<'a, O: LeastSquaresOptimizer = LevenbergMarquardt> {
    model: &'a RangeModel,
    optimizer: O,
    max_iterations: usize,
    max_evaluations: usize,
}

impl<'a> NonLinearLeastSquares<'a, LevenbergMarquardt> {
    /// Estimator with the default Levenberg-Marquardt strategy
    pub fn new(model: &'a RangeModel) -> Self {
        Self::with_optimizer(model, LevenbergMarquardt::new())
    }
}

impl<'a, O: LeastSquaresOptimizer> NonLinearLeastSquares<'a, O> {
    /// Estimator with a caller-supplied optimization strategy
    pub fn with_optimizer(model: &'a RangeModel, optimizer: O) -> Self {
        Self {
            model,
            optimizer,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
        }
    }

    /// Override the iteration and evaluation caps
    pub fn with_limits(mut self, max_iterations: usize, max_evaluations: usize) -> Self {
        self.max_iterations = max_iterations;
        self.max_evaluations = max_evaluations;
        self
    }

    /// Solve with the documented default policy: a zero target, inverse
    /// square-law weights `1 / distance[i]^2` (near anchors are trusted
    /// more, since relative noise typically grows with distance) and the
    /// anchor centroid as the starting point.
    pub fn solve(&self) -> MultilaterationResult<Optimum> {
        let target = DVector::zeros(self.model.anchor_count());
        let weights = self.model.distances().map(|d| 1.0 / (d * d));
        let initial_point = self.model.centroid();
        self.run(target, weights, initial_point)
    }

    /// Solve with explicit target values, per-anchor weights and starting
    /// point. Lengths must be N, N and D respectively and every weight must
    /// be finite and positive.
    pub fn solve_with(
        &self,
        target: &[f64],
        weights: &[f64],
        initial_point: &[f64],
    ) -> MultilaterationResult<Optimum> {
        let n = self.model.anchor_count();
        let d = self.model.dimension();

        if target.len() != n {
            return Err(MultilaterationError::LengthMismatch {
                what: "target".to_string(),
                expected: n,
                found: target.len(),
            });
        }
        if weights.len() != n {
            return Err(MultilaterationError::LengthMismatch {
                what: "weights".to_string(),
                expected: n,
                found: weights.len(),
            });
        }
        if initial_point.len() != d {
            return Err(MultilaterationError::LengthMismatch {
                what: "initial point".to_string(),
                expected: d,
                found: initial_point.len(),
            });
        }
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(MultilaterationError::InvalidWeight { index, value });
            }
        }

        self.run(
            DVector::from_column_slice(target),
            DVector::from_column_slice(weights),
            DVector::from_column_slice(initial_point),
        )
    }

    fn run(
        &self,
        target: DVector<f64>,
        weights: DVector<f64>,
        initial_point: DVector<f64>,
    ) -> MultilaterationResult<Optimum> {
        let problem = LeastSquaresProblem {
            model: self.model,
            target,
            weights,
            initial_point,
            max_iterations: self.max_iterations,
            max_evaluations: self.max_evaluations,
        };
        self.optimizer.optimize(&problem)
    }
}
