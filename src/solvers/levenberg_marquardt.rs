//! Levenberg-Marquardt optimization strategy
//!
//! Interpolates between Gauss-Newton and gradient descent by damping the
//! normal-equations diagonal. Trial steps are accepted or rejected on the
//! actual cost change, and the damping parameter follows the gain ratio
//! between actual and predicted reduction (the 0.25/0.75 rho rule).
//! Convergence criteria are relative (cost reduction, step size) plus a
//! cost-scaled gradient check, so the same tolerances work for coordinates
//! in meters or in kilometers.

use nalgebra::{DMatrix, DVector};

use crate::config::SolverConfig;
use crate::error::{MultilaterationError, MultilaterationResult};
use crate::solvers::{LeastSquaresOptimizer, LeastSquaresProblem, Optimum};

const DAMPING_MIN: f64 = 1e-12;
const DAMPING_MAX: f64 = 1e12;
const DAMPING_INCREASE: f64 = 10.0;
const DAMPING_DECREASE: f64 = 0.1;

/// Levenberg-Marquardt solver for weighted nonlinear least squares
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    config: SolverConfig,
}

impl LevenbergMarquardt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom tolerances, initial damping and caps. The config's
    /// iteration and evaluation caps bound the run together with the
    /// problem's caps; the tighter of the two wins.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Residuals and Jacobian at a point, shifted by the target and scaled
    /// row-wise by the square roots of the weights. One call counts as one
    /// model evaluation.
    fn weighted_evaluation(
        problem: &LeastSquaresProblem<'_>,
        point: &DVector<f64>,
        sqrt_weights: &DVector<f64>,
    ) -> (DVector<f64>, DMatrix<f64>) {
        let mut residuals = problem.model.residual(point) - &problem.target;
        let mut jacobian = problem.model.jacobian(point);
        for i in 0..residuals.len() {
            residuals[i] *= sqrt_weights[i];
            for j in 0..jacobian.ncols() {
                jacobian[(i, j)] *= sqrt_weights[i];
            }
        }
        (residuals, jacobian)
    }

    /// Best-effort fit diagnostics at the converged point. A singular
    /// normal-equations matrix leaves sigma and covariance unset instead of
    /// failing the solve.
    fn diagnostics(
        residuals: &DVector<f64>,
        jacobian: &DMatrix<f64>,
    ) -> (f64, Option<DVector<f64>>, Option<DMatrix<f64>>) {
        let rms = (residuals.norm_squared() / residuals.len() as f64).sqrt();
        let normal_matrix = jacobian.transpose() * jacobian;
        match normal_matrix.try_inverse() {
            Some(covariance) => {
                let sigma = DVector::from_fn(covariance.nrows(), |i, _| {
                    covariance[(i, i)].max(0.0).sqrt()
                });
                (rms, Some(sigma), Some(covariance))
            }
            None => {
                tracing::debug!("normal equations singular at the solution, covariance unavailable");
                (rms, None, None)
            }
        }
    }
}

impl LeastSquaresOptimizer for LevenbergMarquardt {
    fn optimize(&self, problem: &LeastSquaresProblem<'_>) -> MultilaterationResult<Optimum> {
        let dimension = problem.model.dimension();
        let sqrt_weights = problem.weights.map(f64::sqrt);
        let max_iterations = problem.max_iterations.min(self.config.max_iterations);
        let max_evaluations = problem.max_evaluations.min(self.config.max_evaluations);

        let mut point = problem.initial_point.clone();
        let mut iterations = 0usize;
        let mut evaluations = 0usize;

        let (mut residuals, mut jacobian) =
            Self::weighted_evaluation(problem, &point, &sqrt_weights);
        evaluations += 1;
        let mut cost = residuals.norm_squared();

        let mut damping = self.config.initial_damping;
        let mut converged = false;

        while iterations < max_iterations && evaluations < max_evaluations {
            iterations += 1;

            let normal_matrix = jacobian.transpose() * &jacobian;
            let gradient = jacobian.transpose() * &residuals;

            if gradient.amax() <= self.config.gradient_tolerance * (1.0 + cost) {
                converged = true;
                break;
            }

            // Marquardt diagonal scaling: damp larger-curvature directions
            // proportionally harder than flat ones
            let mut augmented = normal_matrix.clone();
            let trace_scale = normal_matrix.trace() / dimension as f64 + 1e-12;
            for i in 0..dimension {
                let scaling = 1.0 + normal_matrix[(i, i)].abs() / trace_scale;
                augmented[(i, i)] += damping * scaling;
            }

            let step = match augmented.qr().solve(&gradient) {
                Some(step) => step,
                None => {
                    damping = (damping * DAMPING_INCREASE).min(DAMPING_MAX);
                    continue;
                }
            };

            let candidate = &point - &step;
            let (candidate_residuals, candidate_jacobian) =
                Self::weighted_evaluation(problem, &candidate, &sqrt_weights);
            evaluations += 1;
            let candidate_cost = candidate_residuals.norm_squared();

            // gain ratio between actual and linearized cost reduction
            let predicted_reduction =
                2.0 * step.dot(&gradient) - step.dot(&(&normal_matrix * &step));
            let actual_reduction = cost - candidate_cost;
            let gain_ratio = if predicted_reduction.abs() > f64::MIN_POSITIVE {
                actual_reduction / predicted_reduction
            } else {
                0.0
            };

            let step_norm = step.norm();
            if candidate_cost < cost {
                point = candidate;
                residuals = candidate_residuals;
                jacobian = candidate_jacobian;
                let previous_cost = cost;
                cost = candidate_cost;

                if gain_ratio > 0.75 {
                    damping = (damping * DAMPING_DECREASE).max(DAMPING_MIN);
                } else if gain_ratio < 0.25 {
                    damping = (damping * DAMPING_INCREASE).min(DAMPING_MAX);
                }

                tracing::debug!(
                    iteration = iterations,
                    cost,
                    damping,
                    gain_ratio,
                    "accepted step"
                );

                if actual_reduction <= self.config.cost_tolerance * previous_cost
                    || step_norm
                        <= self.config.parameter_tolerance
                            * (point.norm() + self.config.parameter_tolerance)
                {
                    converged = true;
                    break;
                }
            } else {
                damping = (damping * DAMPING_INCREASE).min(DAMPING_MAX);
                tracing::debug!(
                    iteration = iterations,
                    candidate_cost,
                    damping,
                    "rejected step"
                );

                // the damped step has shrunk below resolution, nothing left
                // to gain from further trials
                if step_norm
                    <= self.config.parameter_tolerance
                        * (point.norm() + self.config.parameter_tolerance)
                {
                    converged = true;
                    break;
                }
            }
        }

        if !converged {
            return Err(MultilaterationError::NonConvergence {
                iterations,
                evaluations,
                best_point: point.iter().copied().collect(),
            });
        }

        let (rms, sigma, covariance) = Self::diagnostics(&residuals, &jacobian);
        Ok(Optimum {
            point,
            iterations,
            evaluations,
            rms,
            sigma,
            covariance,
        })
    }
}
