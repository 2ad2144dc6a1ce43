//! Numeric floors and default solver limits

/// Lower bound applied to every measured distance at model construction.
/// Keeps the inverse-square-law weights and the residual derivatives away
/// from the degenerate zero-distance case.
pub const DISTANCE_FLOOR: f64 = 1e-7;

/// Default iteration cap for the nonlinear solver
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Default residual/Jacobian evaluation cap for the nonlinear solver
pub const DEFAULT_MAX_EVALUATIONS: usize = 1000;
