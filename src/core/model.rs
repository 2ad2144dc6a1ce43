//! Range residual model
//!
//! Translates the anchor geometry into the vector-valued residual function a
//! least-squares optimizer consumes, together with its analytic Jacobian.
//! The residual uses the squared-distance "circle equation" form
//! `sum_j (point[j] - anchor[i][j])^2 - distance[i]^2`, which is zero exactly
//! when the point lies at the measured distance from anchor i. Staying with
//! the squared form keeps both the residual and its derivative polynomial and
//! differentiable everywhere, including at the anchors themselves.

use nalgebra::{DMatrix, DVector};

use crate::core::constants::DISTANCE_FLOOR;
use crate::error::{MultilaterationError, MultilaterationResult};

/// Immutable multilateration problem: N anchor positions of dimension D plus
/// the N measured distances to the unknown point.
///
/// Both evaluation methods are pure reads of the stored data, so a single
/// model may be evaluated concurrently by a parallel optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeModel {
    /// Anchor positions, one row per anchor (N x D)
    positions: DMatrix<f64>,
    /// Measured distances, clamped to `DISTANCE_FLOOR`
    distances: DVector<f64>,
}

impl RangeModel {
    /// Build a model from anchor positions and measured distances.
    ///
    /// Fails without partially constructing anything when fewer than two
    /// anchors are given, when position and distance counts disagree, or
    /// when the anchors do not share a single dimension D >= 1. Distances
    /// are copied in and clamped to a strictly positive floor.
    pub fn new(positions: &[Vec<f64>], distances: &[f64]) -> MultilaterationResult<Self> {
        if positions.len() < 2 {
            return Err(MultilaterationError::InsufficientAnchors {
                provided: positions.len(),
                required: 2,
            });
        }
        if positions.len() != distances.len() {
            return Err(MultilaterationError::CountMismatch {
                positions: positions.len(),
                distances: distances.len(),
            });
        }

        let dimension = positions[0].len();
        if dimension == 0 {
            return Err(MultilaterationError::EmptyDimension);
        }
        for (index, position) in positions.iter().enumerate().skip(1) {
            if position.len() != dimension {
                return Err(MultilaterationError::DimensionMismatch {
                    index,
                    expected: dimension,
                    found: position.len(),
                });
            }
        }

        let positions = DMatrix::from_fn(positions.len(), dimension, |i, j| positions[i][j]);
        let distances = DVector::from_iterator(
            distances.len(),
            distances.iter().map(|&d| d.max(DISTANCE_FLOOR)),
        );

        Ok(Self {
            positions,
            distances,
        })
    }

    /// Number of anchors N
    pub fn anchor_count(&self) -> usize {
        self.positions.nrows()
    }

    /// Coordinate dimension D
    pub fn dimension(&self) -> usize {
        self.positions.ncols()
    }

    /// Anchor positions, one row per anchor
    pub fn positions(&self) -> &DMatrix<f64> {
        &self.positions
    }

    /// Clamped measured distances
    pub fn distances(&self) -> &DVector<f64> {
        &self.distances
    }

    /// Arithmetic mean of the anchor positions. Always defined and
    /// geometry-agnostic, which makes it the default starting guess for the
    /// nonlinear solver.
    pub fn centroid(&self) -> DVector<f64> {
        let mut centroid = DVector::zeros(self.dimension());
        for i in 0..self.anchor_count() {
            centroid += self.positions.row(i).transpose();
        }
        centroid / self.anchor_count() as f64
    }

    /// Residual vector at a candidate point (length N).
    ///
    /// Entry i is `|point - anchor[i]|^2 - distance[i]^2`.
    pub fn residual(&self, point: &DVector<f64>) -> DVector<f64> {
        DVector::from_fn(self.anchor_count(), |i, _| {
            let mut sum = 0.0;
            for j in 0..self.dimension() {
                let delta = point[j] - self.positions[(i, j)];
                sum += delta * delta;
            }
            sum - self.distances[i] * self.distances[i]
        })
    }

    /// Analytic Jacobian of [`residual`](Self::residual) at a candidate
    /// point (N x D). Entry `[i][j]` is `2*point[j] - 2*anchor[i][j]`.
    pub fn jacobian(&self, point: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(self.anchor_count(), self.dimension(), |i, j| {
            2.0 * point[j] - 2.0 * self.positions[(i, j)]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square_model() -> RangeModel {
        RangeModel::new(
            &[vec![0.0, 0.0], vec![2.0, 0.0], vec![0.0, 2.0]],
            &[1.0, 1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn rejects_single_anchor() {
        let err = RangeModel::new(&[vec![1.0, 1.0]], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            MultilaterationError::InsufficientAnchors {
                provided: 1,
                required: 2
            }
        );
    }

    #[test]
    fn rejects_count_mismatch() {
        let err = RangeModel::new(&[vec![1.0], vec![2.0], vec![3.0]], &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            MultilaterationError::CountMismatch {
                positions: 3,
                distances: 2
            }
        );
    }

    #[test]
    fn rejects_mixed_dimensions() {
        let err =
            RangeModel::new(&[vec![1.0, 1.0], vec![2.0]], &[1.0, 1.0]).unwrap_err();
        assert_eq!(
            err,
            MultilaterationError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_zero_dimensional_anchors() {
        let err = RangeModel::new(&[vec![], vec![]], &[1.0, 1.0]).unwrap_err();
        assert_eq!(err, MultilaterationError::EmptyDimension);
    }

    #[test]
    fn clamps_zero_distances_to_floor() {
        let model = RangeModel::new(&[vec![1.0, 1.0], vec![2.0, 1.0]], &[0.0, 1.0]).unwrap();
        assert_eq!(model.distances()[0], DISTANCE_FLOOR);
        assert_eq!(model.distances()[1], 1.0);
    }

    #[test]
    fn residual_is_zero_at_the_true_point() {
        let model = square_model();
        // (1, 0) is at distance 1 from (0,0) and (2,0), sqrt(5) from (0,2)
        let point = DVector::from_vec(vec![1.0, 0.0]);
        let residual = model.residual(&point);
        assert_abs_diff_eq!(residual[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(residual[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(residual[2], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn jacobian_matches_analytic_form() {
        let model = square_model();
        let point = DVector::from_vec(vec![1.0, 3.0]);
        let jacobian = model.jacobian(&point);
        assert_eq!(jacobian.nrows(), 3);
        assert_eq!(jacobian.ncols(), 2);
        assert_abs_diff_eq!(jacobian[(0, 0)], 2.0);
        assert_abs_diff_eq!(jacobian[(0, 1)], 6.0);
        assert_abs_diff_eq!(jacobian[(1, 0)], -2.0);
        assert_abs_diff_eq!(jacobian[(2, 1)], 2.0);
    }

    #[test]
    fn jacobian_agrees_with_finite_differences() {
        let model = square_model();
        let point = DVector::from_vec(vec![0.7, -0.3]);
        let jacobian = model.jacobian(&point);
        let h = 1e-6;
        for j in 0..model.dimension() {
            let mut bumped = point.clone();
            bumped[j] += h;
            let numeric = (model.residual(&bumped) - model.residual(&point)) / h;
            for i in 0..model.anchor_count() {
                assert_abs_diff_eq!(jacobian[(i, j)], numeric[i], epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn centroid_averages_anchors() {
        let model = square_model();
        let centroid = model.centroid();
        assert_abs_diff_eq!(centroid[0], 2.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(centroid[1], 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn model_is_safe_to_evaluate_from_multiple_threads() {
        let model = std::sync::Arc::new(square_model());
        let handles: Vec<_> = (0..4)
            .map(|k| {
                let model = model.clone();
                std::thread::spawn(move || {
                    let point = DVector::from_vec(vec![k as f64, 1.0]);
                    let r = model.residual(&point);
                    let j = model.jacobian(&point);
                    (r.len(), j.nrows())
                })
            })
            .collect();
        for handle in handles {
            let (r_len, j_rows) = handle.join().unwrap();
            assert_eq!(r_len, 3);
            assert_eq!(j_rows, 3);
        }
    }
}
