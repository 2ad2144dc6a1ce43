//! Multilateration solver
//!
//! Estimates an unknown point's coordinates from known anchor positions and
//! noisy distance measurements, in any dimension. A closed-form linear
//! approximation provides a fast initial estimate; an iterative nonlinear
//! least-squares refinement models the true distance-residual geometry with
//! its analytic Jacobian and returns fit diagnostics alongside the point.
//!
//! ```
//! use multilateration::{LinearLeastSquares, NonLinearLeastSquares, RangeModel};
//!
//! let model = RangeModel::new(
//!     &[vec![1.0, 1.0], vec![3.0, 1.0], vec![2.0, 2.0]],
//!     &[1.0, 1.0, 1.0],
//! )?;
//!
//! let seed = LinearLeastSquares::new(&model).solve();
//! let optimum = NonLinearLeastSquares::new(&model)
//!     .solve_with(&[0.0; 3], &[1.0; 3], seed.as_slice())?;
//!
//! assert!((optimum.point[0] - 2.0).abs() < 1e-4);
//! assert!((optimum.point[1] - 1.0).abs() < 1e-4);
//! # Ok::<(), multilateration::MultilaterationError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod solvers;

// Re-export commonly used types
pub use crate::config::SolverConfig;
pub use crate::core::constants::{DEFAULT_MAX_EVALUATIONS, DEFAULT_MAX_ITERATIONS, DISTANCE_FLOOR};
pub use crate::core::RangeModel;
pub use crate::error::{MultilaterationError, MultilaterationResult};
pub use crate::solvers::{
    LeastSquaresOptimizer, LeastSquaresProblem, LevenbergMarquardt, LinearLeastSquares,
    NonLinearLeastSquares, Optimum,
};
