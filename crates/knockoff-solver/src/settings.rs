use serde::{Deserialize, Serialize};

use knockoff_types::{KnockoffError, Result};

use crate::sdp_builder::Formulation;

/// Parameters for a shrinkage solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// LMI used to express the PSD requirement
    pub formulation: Formulation,
    /// Interior-point iteration budget
    pub max_iter: u32,
    pub tol_gap_abs: f64,
    pub tol_gap_rel: f64,
    pub tol_feas: f64,
    /// Print the backend's iteration log
    pub verbose: bool,
    /// Relative tolerance for |g_ij - g_ji|, scaled by max(1, max|g|)
    pub symmetry_tolerance: f64,
    /// Allowed negative eigenvalue of M(s*) before a warning is logged
    pub psd_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            formulation: Formulation::Block,
            max_iter: 200,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
            tol_feas: 1e-8,
            verbose: false,
            symmetry_tolerance: 1e-9,
            psd_tolerance: 1e-6,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(KnockoffError::ConfigError(
                "max_iter must be at least 1".to_string(),
            ));
        }

        let positive = [
            ("tol_gap_abs", self.tol_gap_abs),
            ("tol_gap_rel", self.tol_gap_rel),
            ("tol_feas", self.tol_feas),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(KnockoffError::ConfigError(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("symmetry_tolerance", self.symmetry_tolerance),
            ("psd_tolerance", self.psd_tolerance),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(KnockoffError::ConfigError(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
