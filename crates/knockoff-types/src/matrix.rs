use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{KnockoffError, Result};

/// Square input matrix G (p x p), row-major as supplied by the caller.
///
/// Every constructor checks shape and finiteness. Symmetry is checked
/// separately through [`GramMatrix::ensure_symmetric`] so callers can pick
/// their own tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct GramMatrix {
    inner: DMatrix<f64>,
}

impl GramMatrix {
    /// Build from a sequence of rows. Fails unless the rows form a
    /// non-empty square array of finite numbers.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let p = rows.len();
        if p == 0 {
            return Err(KnockoffError::Shape(
                "expected a non-empty 2-D array, got an empty array".to_string(),
            ));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != p {
                return Err(KnockoffError::Shape(format!(
                    "row {} has {} entries, expected {} for a {}x{} matrix",
                    i,
                    row.len(),
                    p,
                    p,
                    p
                )));
            }
        }

        let mut inner = DMatrix::zeros(p, p);
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(KnockoffError::NonFinite { row: i, col: j });
                }
                inner[(i, j)] = value;
            }
        }

        Ok(GramMatrix { inner })
    }

    /// Build from a decoded JSON value, distinguishing shape problems
    /// (not an array of arrays, nested too deep, ragged, non-square) from
    /// entries that are not numbers.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let outer = value.as_array().ok_or_else(|| {
            KnockoffError::Shape(format!(
                "expected an array of arrays, got {}",
                json_kind(value)
            ))
        })?;

        let mut rows = Vec::with_capacity(outer.len());
        for (i, row) in outer.iter().enumerate() {
            let row = row.as_array().ok_or_else(|| {
                KnockoffError::Shape(format!(
                    "row {} is {}, expected an array (input must be 2-D)",
                    i,
                    json_kind(row)
                ))
            })?;

            let mut parsed = Vec::with_capacity(row.len());
            for (j, entry) in row.iter().enumerate() {
                if entry.is_array() {
                    return Err(KnockoffError::Shape(format!(
                        "entry ({}, {}) is an array, input must be 2-D",
                        i, j
                    )));
                }
                let number = entry.as_f64().ok_or_else(|| {
                    KnockoffError::SerializationError(format!(
                        "entry ({}, {}) is {}, expected a number",
                        i,
                        j,
                        json_kind(entry)
                    ))
                })?;
                parsed.push(number);
            }
            rows.push(parsed);
        }

        Self::from_rows(&rows)
    }

    /// Parse JSON text directly.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Wrap an existing nalgebra matrix.
    pub fn from_dmatrix(matrix: DMatrix<f64>) -> Result<Self> {
        if matrix.nrows() == 0 || matrix.nrows() != matrix.ncols() {
            return Err(KnockoffError::Shape(format!(
                "expected a non-empty square matrix, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            )));
        }

        if let Some(idx) = matrix.iter().position(|v| !v.is_finite()) {
            // nalgebra storage is column-major
            let n = matrix.nrows();
            return Err(KnockoffError::NonFinite {
                row: idx % n,
                col: idx / n,
            });
        }

        Ok(GramMatrix { inner: matrix })
    }

    /// Identity matrix of order p.
    pub fn identity(p: usize) -> Result<Self> {
        Self::from_dmatrix(DMatrix::identity(p, p))
    }

    /// Number of rows (= columns).
    pub fn dim(&self) -> usize {
        self.inner.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.inner[(row, col)]
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.inner
    }

    /// Largest absolute entry, used to scale tolerances.
    pub fn max_abs(&self) -> f64 {
        self.inner.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Worst off-diagonal mismatch as `(row, col, |g_rc - g_cr|)` with
    /// `row < col`. `None` for a 1x1 matrix.
    pub fn max_asymmetry(&self) -> Option<(usize, usize, f64)> {
        let p = self.dim();
        let mut worst: Option<(usize, usize, f64)> = None;
        for col in 1..p {
            for row in 0..col {
                let delta = (self.inner[(row, col)] - self.inner[(col, row)]).abs();
                match worst {
                    Some((_, _, d)) if d >= delta => {}
                    _ => worst = Some((row, col, delta)),
                }
            }
        }
        worst
    }

    /// Fail with [`KnockoffError::Asymmetric`] when some pair differs by more
    /// than `tolerance * max(1, max|g_ij|)`.
    pub fn ensure_symmetric(&self, tolerance: f64) -> Result<()> {
        let bound = tolerance * self.max_abs().max(1.0);
        match self.max_asymmetry() {
            Some((row, col, delta)) if delta > bound => {
                Err(KnockoffError::Asymmetric { row, col, delta })
            }
            _ => Ok(()),
        }
    }

    /// Rows as plain vectors, in input order.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.inner
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for GramMatrix {
    type Error = KnockoffError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        GramMatrix::from_rows(&rows)
    }
}

impl From<GramMatrix> for Vec<Vec<f64>> {
    fn from(matrix: GramMatrix) -> Self {
        matrix.to_rows()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
