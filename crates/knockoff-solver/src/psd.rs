//! Helpers for symmetric matrices: triangle packing in the layout the
//! PSD cone expects, the two constraint matrices of the shrinkage SDP,
//! and eigenvalue-based PSD checks.

use nalgebra::{DMatrix, DVector};
use std::f64::consts::SQRT_2;

/// Length of the packed upper triangle of an n x n matrix
pub fn svec_len(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Position of entry (row, col), `row <= col`, in the packed upper triangle
/// (column by column).
pub fn svec_index(row: usize, col: usize) -> usize {
    debug_assert!(row <= col, "svec_index expects an upper-triangle entry");
    col * (col + 1) / 2 + row
}

/// Pack the upper triangle column by column, off-diagonals scaled by sqrt(2)
/// so that <X, Y> = svec(X) . svec(Y).
pub fn svec(m: &DMatrix<f64>) -> DVector<f64> {
    let n = m.nrows();
    let mut out = DVector::zeros(svec_len(n));
    for col in 0..n {
        for row in 0..=col {
            let val = m[(row, col)];
            out[svec_index(row, col)] = if row == col { val } else { val * SQRT_2 };
        }
    }
    out
}

/// Inverse of [`svec`]
pub fn smat(v: &DVector<f64>, n: usize) -> DMatrix<f64> {
    let mut m = DMatrix::zeros(n, n);
    for col in 0..n {
        for row in 0..=col {
            let val = v[svec_index(row, col)];
            if row == col {
                m[(row, col)] = val;
            } else {
                m[(row, col)] = val / SQRT_2;
                m[(col, row)] = val / SQRT_2;
            }
        }
    }
    m
}

/// M(s) = [[G, G - D(s)], [G - D(s), G]]
pub fn block_matrix(g: &DMatrix<f64>, s: &[f64]) -> DMatrix<f64> {
    let p = g.nrows();
    let mut m = DMatrix::zeros(2 * p, 2 * p);
    for i in 0..p {
        for j in 0..p {
            let gij = g[(i, j)];
            let off = if i == j { gij - s[i] } else { gij };
            m[(i, j)] = gij;
            m[(p + i, p + j)] = gij;
            m[(i, p + j)] = off;
            m[(p + i, j)] = off;
        }
    }
    m
}

/// C(s) = 2G - D(s)
pub fn compact_matrix(g: &DMatrix<f64>, s: &[f64]) -> DMatrix<f64> {
    let mut m = g * 2.0;
    for (i, si) in s.iter().enumerate() {
        m[(i, i)] -= si;
    }
    m
}

/// Smallest eigenvalue of a symmetric matrix. Only the lower triangle is read.
pub fn min_eigenvalue(m: &DMatrix<f64>) -> f64 {
    if m.is_empty() {
        return 0.0;
    }
    m.clone().symmetric_eigen().eigenvalues.min()
}

/// Validate that a matrix is positive semi-definite (PSD)
/// Uses eigenvalue decomposition
pub fn is_psd(m: &DMatrix<f64>, tolerance: f64) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }

    let symmetric = (0..m.ncols())
        .all(|col| (0..col).all(|row| (m[(row, col)] - m[(col, row)]).abs() <= tolerance));
    if !symmetric {
        return false;
    }

    min_eigenvalue(m) >= -tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svec_layout() {
        let m = DMatrix::from_row_slice(3, 3, &[
            1.0, 2.0, 4.0,
            2.0, 3.0, 5.0,
            4.0, 5.0, 6.0,
        ]);
        let v = svec(&m);

        assert_eq!(v.len(), 6);
        assert_eq!(v[0], 1.0);
        assert!((v[1] - 2.0 * SQRT_2).abs() < 1e-12);
        assert_eq!(v[2], 3.0);
        assert!((v[3] - 4.0 * SQRT_2).abs() < 1e-12);
        assert!((v[4] - 5.0 * SQRT_2).abs() < 1e-12);
        assert_eq!(v[5], 6.0);

        let back = smat(&v, 3);
        assert!((back - m).abs().max() < 1e-12);
    }

    #[test]
    fn test_svec_preserves_inner_product() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 2.0]);
        let y = DMatrix::from_row_slice(2, 2, &[3.0, -1.0, -1.0, 1.0]);
        let frob = x.component_mul(&y).sum();
        assert!((svec(&x).dot(&svec(&y)) - frob).abs() < 1e-12);
    }

    #[test]
    fn test_block_matrix_identity() {
        let g = DMatrix::identity(2, 2);
        let m = block_matrix(&g, &[1.0, 1.0]);
        assert_eq!(m, DMatrix::identity(4, 4));
        assert!(is_psd(&m, 1e-10));
    }

    #[test]
    fn test_block_matrix_zero_scalar() {
        let g = DMatrix::zeros(1, 1);
        // eigenvalues of [[0, -s], [-s, 0]] are +-s
        let m = block_matrix(&g, &[0.5]);
        assert!((min_eigenvalue(&m) + 0.5).abs() < 1e-12);
        assert!(!is_psd(&m, 1e-9));
        assert!(is_psd(&block_matrix(&g, &[0.0]), 1e-12));
    }

    #[test]
    fn test_block_and_compact_agree_on_feasibility() {
        let g = DMatrix::from_row_slice(2, 2, &[1.0, 0.9, 0.9, 1.0]);
        for s in [[0.2, 0.2], [0.1, 0.3], [0.3, 0.3], [1.0, 0.0]] {
            let block_ok = is_psd(&block_matrix(&g, &s), 1e-9);
            let compact_ok = is_psd(&compact_matrix(&g, &s), 1e-9);
            assert_eq!(block_ok, compact_ok, "s = {:?}", s);
        }
    }

    #[test]
    fn test_asymmetric_is_not_psd() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.0, 1.0]);
        assert!(!is_psd(&m, 1e-9));
    }
}
