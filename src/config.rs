//! Solver configuration
//!
//! Tunables for the nonlinear solve: iteration/evaluation caps, convergence
//! tolerances and the initial damping of the Levenberg-Marquardt strategy.
//! The struct is serde-backed so deployments can ship it as a JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::constants::{DEFAULT_MAX_EVALUATIONS, DEFAULT_MAX_ITERATIONS};

/// Configuration parameters for the nonlinear least-squares solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum number of optimizer iterations
    pub max_iterations: usize,
    /// Maximum number of residual/Jacobian evaluations
    pub max_evaluations: usize,
    /// Relative cost-reduction tolerance: converged once an accepted step
    /// reduces the weighted cost by less than this fraction of it
    pub cost_tolerance: f64,
    /// Relative step-size tolerance on the parameter vector
    pub parameter_tolerance: f64,
    /// Gradient-norm tolerance, scaled by the current cost
    pub gradient_tolerance: f64,
    /// Initial Levenberg-Marquardt damping parameter
    pub initial_damping: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            cost_tolerance: 1e-10,
            parameter_tolerance: 1e-10,
            gradient_tolerance: 1e-10,
            initial_damping: 1e-3,
        }
    }
}

impl SolverConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    /// Check that every parameter is in its usable range
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".to_string());
        }
        if self.max_evaluations == 0 {
            return Err("max_evaluations must be at least 1".to_string());
        }
        for (name, value) in [
            ("cost_tolerance", self.cost_tolerance),
            ("parameter_tolerance", self.parameter_tolerance),
            ("gradient_tolerance", self.gradient_tolerance),
            ("initial_damping", self.initial_damping),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be finite and positive, got {}", name, value));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.max_evaluations, 1000);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SolverConfig {
            max_iterations: 250,
            initial_damping: 1e-2,
            ..SolverConfig::default()
        };
        let json = config.to_json().unwrap();
        let back = SolverConfig::from_json(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn rejects_unusable_parameters() {
        let json = r#"{
            "max_iterations": 0,
            "max_evaluations": 1000,
            "cost_tolerance": 1e-10,
            "parameter_tolerance": 1e-10,
            "gradient_tolerance": 1e-10,
            "initial_damping": 1e-3
        }"#;
        assert!(SolverConfig::from_json(json).is_err());

        let config = SolverConfig {
            cost_tolerance: -1.0,
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
