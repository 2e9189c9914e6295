//! Matrix generators shared by the cross-crate tests.

use knockoff_types::{GramMatrix, Result};
use nalgebra::DMatrix;

/// G = B B^T / p + ridge * I for a p x p factor B given row-major.
/// Symmetric PSD, positive definite when ridge > 0.
pub fn gram_from_factor(p: usize, factor: &[f64], ridge: f64) -> Result<GramMatrix> {
    let b = DMatrix::from_row_slice(p, p, &factor[..p * p]);
    let mut g = &b * b.transpose() / p as f64;
    for i in 0..p {
        g[(i, i)] += ridge;
    }
    // exact symmetry regardless of rounding in the product
    let g = (&g + g.transpose()) * 0.5;
    GramMatrix::from_dmatrix(g)
}

/// Correlation matrix with rho^|i-j| entries
pub fn ar1(p: usize, rho: f64) -> Result<GramMatrix> {
    let rows: Vec<Vec<f64>> = (0..p)
        .map(|i| (0..p).map(|j| rho.powi((i as i32 - j as i32).abs())).collect())
        .collect();
    GramMatrix::from_rows(&rows)
}

/// Equicorrelated matrix: ones on the diagonal, rho elsewhere
pub fn equicorrelated(p: usize, rho: f64) -> Result<GramMatrix> {
    let rows: Vec<Vec<f64>> = (0..p)
        .map(|i| (0..p).map(|j| if i == j { 1.0 } else { rho }).collect())
        .collect();
    GramMatrix::from_rows(&rows)
}
