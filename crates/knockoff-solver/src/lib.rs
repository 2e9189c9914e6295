mod conic_model;
mod backend;
mod clarabel_backend;
mod sdp_builder;
mod settings;
mod shrinkage;
pub mod psd;

pub use conic_model::{ConeSpec, ConicModel, SparseMatrix, VarMeta};
pub use backend::{ConicSolution, ConicStatus, SolverBackend};
pub use clarabel_backend::ClarabelSolver;
pub use sdp_builder::{Formulation, SdpBuilder};
pub use settings::SolverSettings;
pub use shrinkage::{solve_sdp, Diagnostics, ShrinkageSolution, ShrinkageSolver};
