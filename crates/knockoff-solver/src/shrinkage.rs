use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use knockoff_types::{GramMatrix, KnockoffError, Result};

use crate::backend::{ConicStatus, SolverBackend};
use crate::clarabel_backend::ClarabelSolver;
use crate::psd;
use crate::sdp_builder::{Formulation, SdpBuilder};
use crate::settings::SolverSettings;

/// Result of a shrinkage solve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShrinkageSolution {
    /// s*, one entry per row of G, each in [0, 1]
    pub s: Vec<f64>,
    /// sum of s*
    pub objective: f64,
    pub diagnostics: Diagnostics,
}

/// Diagnostic information from the solve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub iterations: usize,
    pub status: ConicStatus,
    pub formulation: Formulation,
    /// Smallest eigenvalue of [[G, G - D(s*)], [G - D(s*), G]]
    pub min_eigenvalue: f64,
}

/// Computes shrinkage coefficients by solving
///
/// maximize 1^T s  s.t.  0 <= s <= 1,  [[G, G - D(s)], [G - D(s), G]] >= 0
pub struct ShrinkageSolver {
    backend: Arc<dyn SolverBackend + Send + Sync>,
    settings: SolverSettings,
}

impl ShrinkageSolver {
    /// Clarabel backend, default settings
    pub fn new() -> Self {
        Self::with_settings(SolverSettings::default())
    }

    /// Clarabel backend configured from `settings`
    pub fn with_settings(settings: SolverSettings) -> Self {
        ShrinkageSolver {
            backend: Arc::new(ClarabelSolver::from_settings(&settings)),
            settings,
        }
    }

    /// Create with custom backend and settings
    pub fn with_backend(
        backend: Arc<dyn SolverBackend + Send + Sync>,
        settings: SolverSettings,
    ) -> Self {
        ShrinkageSolver { backend, settings }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// One-shot solve. Any status other than optimal is an error.
    pub fn solve(&self, gram: &GramMatrix) -> Result<ShrinkageSolution> {
        self.settings.validate()?;
        gram.ensure_symmetric(self.settings.symmetry_tolerance)?;

        let p = gram.dim();
        let formulation = self.settings.formulation;

        // Absorb the rounding the symmetry check tolerated
        let g = gram.as_matrix();
        let gram = GramMatrix::from_dmatrix((g + g.transpose()) * 0.5)?;

        let model = SdpBuilder::build(&gram, formulation)?;
        debug!(
            p,
            rows = model.num_constraints(),
            ?formulation,
            "built shrinkage SDP"
        );

        let raw = self.backend.solve_conic(&model)?;
        if raw.status != ConicStatus::Optimal {
            return Err(KnockoffError::SolverError(format!(
                "solver did not reach an optimum: status {:?} after {} iterations",
                raw.status, raw.iterations
            )));
        }

        if raw.x.len() != p {
            return Err(KnockoffError::SolverError(format!(
                "solver returned {} values for {} variables",
                raw.x.len(),
                p
            )));
        }

        // Interior-point iterates can overshoot the box by round-off
        let s: Vec<f64> = raw.x.iter().map(|v| v.clamp(0.0, 1.0)).collect();

        let min_eigenvalue = psd::min_eigenvalue(&psd::block_matrix(gram.as_matrix(), &s));
        if min_eigenvalue < -self.settings.psd_tolerance {
            warn!(
                min_eigenvalue,
                tolerance = self.settings.psd_tolerance,
                "constraint matrix at the returned point has a negative eigenvalue"
            );
        }

        let objective: f64 = s.iter().sum();
        info!(
            p,
            objective,
            iterations = raw.iterations,
            min_eigenvalue,
            "shrinkage SDP solved"
        );

        Ok(ShrinkageSolution {
            s,
            objective,
            diagnostics: Diagnostics {
                iterations: raw.iterations,
                status: raw.status,
                formulation,
                min_eigenvalue,
            },
        })
    }
}

impl Default for ShrinkageSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Solve for s* from the rows of G with default settings.
pub fn solve_sdp(rows: &[Vec<f64>]) -> Result<Vec<f64>> {
    let gram = GramMatrix::from_rows(rows)?;
    Ok(ShrinkageSolver::new().solve(&gram)?.s)
}
