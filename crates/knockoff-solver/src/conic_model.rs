use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use knockoff_types::{KnockoffError, Result};

/// Variable metadata for tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarMeta {
    /// Shrinkage coefficient s_i for input row/column i
    Shrinkage(usize),
}

/// Cone a block of slack rows must lie in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConeSpec {
    /// n rows, each z_i >= 0
    Nonnegative(usize),
    /// Symmetric matrix of the given order, packed as its scaled upper triangle
    PsdTriangle(usize),
}

impl ConeSpec {
    /// Number of rows this cone occupies in A and b
    pub fn dim(&self) -> usize {
        match *self {
            ConeSpec::Nonnegative(n) => n,
            ConeSpec::PsdTriangle(order) => order * (order + 1) / 2,
        }
    }
}

/// Compressed sparse column matrix, rows sorted within each column
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    pub m: usize,
    pub n: usize,
    pub colptr: Vec<usize>,
    pub rowval: Vec<usize>,
    pub nzval: Vec<f64>,
}

impl SparseMatrix {
    /// Build an m x columns.len() matrix from per-column (row, value) entries.
    /// Zero values are dropped; duplicate rows in a column are summed.
    pub fn from_columns(m: usize, columns: Vec<Vec<(usize, f64)>>) -> Result<Self> {
        let n = columns.len();
        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();
        colptr.push(0);

        for (col, mut entries) in columns.into_iter().enumerate() {
            entries.sort_by_key(|&(row, _)| row);
            let start = rowval.len();
            for (row, value) in entries {
                if row >= m {
                    return Err(KnockoffError::SolverError(format!(
                        "entry ({}, {}) outside a {}x{} matrix",
                        row, col, m, n
                    )));
                }
                if rowval.len() > start && rowval[rowval.len() - 1] == row {
                    let last = nzval.len() - 1;
                    nzval[last] += value;
                } else {
                    rowval.push(row);
                    nzval.push(value);
                }
            }
            // drop entries that are (or summed to) zero
            let mut kept = start;
            for k in start..rowval.len() {
                if nzval[k] != 0.0 {
                    rowval[kept] = rowval[k];
                    nzval[kept] = nzval[k];
                    kept += 1;
                }
            }
            rowval.truncate(kept);
            nzval.truncate(kept);
            colptr.push(kept);
        }

        Ok(SparseMatrix { m, n, colptr, rowval, nzval })
    }

    pub fn nrows(&self) -> usize {
        self.m
    }

    pub fn ncols(&self) -> usize {
        self.n
    }

    /// Number of stored nonzeros
    pub fn nnz(&self) -> usize {
        self.nzval.len()
    }

    /// Entry (row, col) if stored
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        let range = self.colptr[col]..self.colptr[col + 1];
        self.rowval[range.clone()]
            .binary_search(&row)
            .ok()
            .map(|k| self.nzval[range.start + k])
    }

    /// A x
    pub fn mul_vec(&self, x: &[f64]) -> DVector<f64> {
        let mut out = DVector::zeros(self.m);
        for (col, &xc) in x.iter().enumerate().take(self.n) {
            for k in self.colptr[col]..self.colptr[col + 1] {
                out[self.rowval[k]] += self.nzval[k] * xc;
            }
        }
        out
    }

    fn is_well_formed(&self) -> bool {
        self.colptr.len() == self.n + 1
            && self.colptr[0] == 0
            && self.colptr.windows(2).all(|w| w[0] <= w[1])
            && self.colptr[self.n] == self.rowval.len()
            && self.rowval.len() == self.nzval.len()
            && self.rowval.iter().all(|&r| r < self.m)
    }
}

/// Conic model in standard form:
/// minimize q^T x
/// subject to A x + z = b, z in K = cones[0] x cones[1] x ...
#[derive(Debug, Clone)]
pub struct ConicModel {
    /// Linear cost q
    pub q: DVector<f64>,
    /// Constraint matrix A
    pub a: SparseMatrix,
    /// Right-hand side b
    pub b: DVector<f64>,
    /// Cones covering the rows of A in order
    pub cones: Vec<ConeSpec>,
    /// Variable metadata
    pub var_meta: Vec<VarMeta>,
}

impl ConicModel {
    pub fn new(
        q: DVector<f64>,
        a: SparseMatrix,
        b: DVector<f64>,
        cones: Vec<ConeSpec>,
        var_meta: Vec<VarMeta>,
    ) -> Self {
        ConicModel { q, a, b, cones, var_meta }
    }

    /// Get number of variables
    pub fn num_vars(&self) -> usize {
        self.q.len()
    }

    /// Get number of constraint rows
    pub fn num_constraints(&self) -> usize {
        self.b.len()
    }

    /// Validate model dimensions
    pub fn validate(&self) -> Result<()> {
        let n = self.num_vars();
        let m = self.num_constraints();

        if self.a.nrows() != m || self.a.ncols() != n {
            return Err(KnockoffError::SolverError(format!(
                "A must be {}x{}, got {}x{}",
                m,
                n,
                self.a.nrows(),
                self.a.ncols()
            )));
        }

        if !self.a.is_well_formed() {
            return Err(KnockoffError::SolverError(
                "A has inconsistent compressed column storage".to_string(),
            ));
        }

        let cone_rows: usize = self.cones.iter().map(ConeSpec::dim).sum();
        if cone_rows != m {
            return Err(KnockoffError::SolverError(format!(
                "cones cover {} rows, model has {}",
                cone_rows, m
            )));
        }

        if self.var_meta.len() != n {
            return Err(KnockoffError::SolverError(format!(
                "var_meta length {} != num_vars {}",
                self.var_meta.len(),
                n
            )));
        }

        Ok(())
    }

    /// Slack z = b - A x for a candidate point
    pub fn slack(&self, x: &[f64]) -> DVector<f64> {
        &self.b - self.a.mul_vec(x)
    }
}
