use knockoff_types::Result;
use serde::{Deserialize, Serialize};

use crate::conic_model::ConicModel;

/// Terminal status reported by a conic backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConicStatus {
    Optimal,
    PrimalInfeasible,
    DualInfeasible,
    /// Stopped close to, but not within, the requested tolerances
    Inaccurate,
    MaxIterations,
    NumericalError,
    Unsolved,
}

/// Solution from a conic backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConicSolution {
    pub x: Vec<f64>,
    pub status: ConicStatus,
    pub objective: f64,
    pub iterations: usize,
}

/// Trait for conic solver backends
pub trait SolverBackend: Send + Sync {
    /// Solve: minimize q^T x
    /// subject to A x + z = b, z in the product of the model's cones
    fn solve_conic(&self, model: &ConicModel) -> Result<ConicSolution>;
}
