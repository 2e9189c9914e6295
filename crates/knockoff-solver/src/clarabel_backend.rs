use clarabel::algebra::CscMatrix;
use clarabel::solver::{DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT};
use tracing::debug;

use crate::{
    ConeSpec, ConicModel, ConicSolution, ConicStatus, SolverBackend, SolverSettings, SparseMatrix,
};
use knockoff_types::Result;

/// Clarabel-based conic solver (interior point, pure Rust)
#[derive(Debug, Clone)]
pub struct ClarabelSolver {
    verbose: bool,
    max_iter: u32,
    tol_gap_abs: f64,
    tol_gap_rel: f64,
    tol_feas: f64,
}

impl ClarabelSolver {
    /// Create a new Clarabel solver with default settings
    pub fn new() -> Self {
        Self::from_settings(&SolverSettings::default())
    }

    /// Create solver from shared settings
    pub fn from_settings(settings: &SolverSettings) -> Self {
        ClarabelSolver {
            verbose: settings.verbose,
            max_iter: settings.max_iter,
            tol_gap_abs: settings.tol_gap_abs,
            tol_gap_rel: settings.tol_gap_rel,
            tol_feas: settings.tol_feas,
        }
    }

    fn settings(&self) -> DefaultSettings<f64> {
        let mut settings = DefaultSettings::default();
        settings.verbose = self.verbose;
        settings.max_iter = self.max_iter;
        settings.tol_gap_abs = self.tol_gap_abs;
        settings.tol_gap_rel = self.tol_gap_rel;
        settings.tol_feas = self.tol_feas;
        settings
    }
}

impl Default for ClarabelSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBackend for ClarabelSolver {
    fn solve_conic(&self, model: &ConicModel) -> Result<ConicSolution> {
        model.validate()?;

        let n = model.num_vars();

        // Linear objective: P is empty
        let p_csc = CscMatrix::zeros((n, n));
        let a_csc = to_clarabel_csc(&model.a);
        let cones: Vec<SupportedConeT<f64>> = model.cones.iter().map(to_clarabel_cone).collect();

        debug!(
            vars = n,
            rows = model.num_constraints(),
            nnz = a_csc.nzval.len(),
            "handing model to clarabel"
        );

        let mut solver = DefaultSolver::new(
            &p_csc,
            model.q.as_slice(),
            &a_csc,
            model.b.as_slice(),
            &cones,
            self.settings(),
        );

        solver.solve();

        Ok(ConicSolution {
            x: solver.solution.x.clone(),
            status: map_status(solver.solution.status),
            objective: solver.solution.obj_val,
            iterations: solver.info.iterations as usize,
        })
    }
}

fn map_status(status: SolverStatus) -> ConicStatus {
    match status {
        SolverStatus::Solved => ConicStatus::Optimal,
        SolverStatus::PrimalInfeasible => ConicStatus::PrimalInfeasible,
        SolverStatus::DualInfeasible => ConicStatus::DualInfeasible,
        SolverStatus::AlmostSolved
        | SolverStatus::AlmostPrimalInfeasible
        | SolverStatus::AlmostDualInfeasible => ConicStatus::Inaccurate,
        SolverStatus::MaxIterations | SolverStatus::MaxTime => ConicStatus::MaxIterations,
        SolverStatus::NumericalError | SolverStatus::InsufficientProgress => {
            ConicStatus::NumericalError
        }
        _ => ConicStatus::Unsolved,
    }
}

fn to_clarabel_cone(cone: &ConeSpec) -> SupportedConeT<f64> {
    match *cone {
        ConeSpec::Nonnegative(n) => SupportedConeT::NonnegativeConeT(n),
        ConeSpec::PsdTriangle(order) => SupportedConeT::PSDTriangleConeT(order),
    }
}

fn to_clarabel_csc(a: &SparseMatrix) -> CscMatrix<f64> {
    CscMatrix::new(
        a.m,
        a.n,
        a.colptr.clone(),
        a.rowval.clone(),
        a.nzval.clone(),
    )
}
