//! Closed-form linear position estimate
//!
//! Linearizes the distance equations around anchor 0: subtracting the circle
//! equation of anchor i from anchor 0's cancels the quadratic `|point|^2`
//! term and leaves a linear system in the displacement from anchor 0. One
//! QR-backed solve instead of an iteration, which makes this a cheap seed for
//! the nonlinear refinement. It is advisory only and never the final answer.

use nalgebra::{DMatrix, DVector};

use crate::core::RangeModel;

/// One-shot linear least-squares estimator over a [`RangeModel`]
#[derive(Debug, Clone)]
pub struct LinearLeastSquares<'a> {
    model: &'a RangeModel,
}

impl<'a> LinearLeastSquares<'a> {
    pub fn new(model: &'a RangeModel) -> Self {
        Self { model }
    }

    /// Estimate the unknown position.
    ///
    /// Forms the (N-1) x D system `A * x = b` with rows
    /// `A[i-1] = anchor[i] - anchor[0]` and
    /// `b[i-1] = 0.5 * (d0^2 - di^2 + |anchor[i] - anchor[0]|^2)`, solves it
    /// in the least-squares sense and returns `anchor[0] + x`. A singular
    /// system (under-determined or degenerate anchor geometry) is absorbed
    /// into a zero displacement, so the reference anchor's own position comes
    /// back instead of an error.
    pub fn solve(&self) -> DVector<f64> {
        let n = self.model.anchor_count();
        let d = self.model.dimension();
        let positions = self.model.positions();
        let distances = self.model.distances();

        // TODO: evaluate choosing the best-conditioned anchor as the
        // reference instead of always index 0
        let reference = positions.row(0).transpose();
        let reference_distance_sq = distances[0] * distances[0];

        let mut matrix = DMatrix::zeros(n - 1, d);
        let mut rhs = DVector::zeros(n - 1);
        for i in 1..n {
            let mut separation_sq = 0.0;
            for j in 0..d {
                let delta = positions[(i, j)] - positions[(0, j)];
                matrix[(i - 1, j)] = delta;
                separation_sq += delta * delta;
            }
            let distance_sq = distances[i] * distances[i];
            rhs[i - 1] = 0.5 * (reference_distance_sq - distance_sq + separation_sq);
        }

        // Least squares through the normal equations; the QR solve of the
        // D x D system reports singular geometry as None.
        let transposed = matrix.transpose();
        let normal_matrix = &transposed * &matrix;
        let normal_rhs = &transposed * &rhs;
        let displacement = match normal_matrix.qr().solve(&normal_rhs) {
            Some(solution) => solution,
            None => {
                tracing::debug!(
                    anchors = n,
                    dimension = d,
                    "singular linear system, falling back to the reference anchor"
                );
                DVector::zeros(d)
            }
        };

        reference + displacement
    }
}
