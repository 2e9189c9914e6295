use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

use knockoff_types::{GramMatrix, Result};

use crate::conic_model::{ConeSpec, ConicModel, SparseMatrix, VarMeta};
use crate::psd::{block_matrix, compact_matrix, svec, svec_index, svec_len};

/// Which linear matrix inequality encodes the PSD requirement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formulation {
    /// [[G, G - D(s)], [G - D(s), G]] >= 0, order 2p
    #[default]
    Block,
    /// 2G - D(s) >= 0, order p. Same feasible set once s >= 0 holds.
    Compact,
}

impl Formulation {
    /// Order of the PSD cone for p variables
    pub fn lmi_order(self, p: usize) -> usize {
        match self {
            Formulation::Block => 2 * p,
            Formulation::Compact => p,
        }
    }

    /// The matrix that must be PSD, evaluated at s
    pub fn constraint_matrix(self, g: &DMatrix<f64>, s: &[f64]) -> DMatrix<f64> {
        match self {
            Formulation::Block => block_matrix(g, s),
            Formulation::Compact => compact_matrix(g, s),
        }
    }

    /// Upper-triangle entry where s_i appears, and its svec scale
    fn coefficient_entry(self, p: usize, i: usize) -> (usize, usize, f64) {
        match self {
            Formulation::Block => (i, p + i, SQRT_2),
            Formulation::Compact => (i, i, 1.0),
        }
    }
}

/// Builder for the shrinkage SDP
pub struct SdpBuilder;

impl SdpBuilder {
    /// Build: maximize 1^T s s.t. 0 <= s <= 1 and the chosen LMI, as
    /// minimize -1^T s over A s + z = b with
    ///
    /// rows [0, p):       -s_i + z = 0, z >= 0
    /// rows [p, 2p):       s_i + z = 1, z >= 0
    /// rows [2p, ..):  A_i s + z = svec(C(0)), z in PSD triangle
    ///
    /// where C(s) = C(0) - sum_i s_i E_i, so column i of the LMI block is svec(E_i).
    pub fn build(gram: &GramMatrix, formulation: Formulation) -> Result<ConicModel> {
        let p = gram.dim();
        let g = gram.as_matrix();
        let order = formulation.lmi_order(p);
        let tri = svec_len(order);
        let m = 2 * p + tri;

        let q = DVector::from_element(p, -1.0);
        let mut b = DVector::zeros(m);

        // Box 0 <= s <= 1, then the LMI coefficient: three entries per column
        let columns = (0..p)
            .map(|i| {
                let (row, col, scale) = formulation.coefficient_entry(p, i);
                vec![(i, -1.0), (p + i, 1.0), (2 * p + svec_index(row, col), scale)]
            })
            .collect();
        let a = SparseMatrix::from_columns(m, columns)?;
        b.rows_mut(p, p).fill(1.0);

        // LMI offset
        let offset = svec(&formulation.constraint_matrix(g, &vec![0.0; p]));
        b.rows_mut(2 * p, tri).copy_from(&offset);

        let cones = vec![ConeSpec::Nonnegative(2 * p), ConeSpec::PsdTriangle(order)];
        let var_meta = (0..p).map(VarMeta::Shrinkage).collect();

        let model = ConicModel::new(q, a, b, cones, var_meta);
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psd::smat;

    fn correlated() -> GramMatrix {
        GramMatrix::from_rows(&[
            vec![1.0, 0.4, 0.1],
            vec![0.4, 1.0, 0.3],
            vec![0.1, 0.3, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_block_dimensions() {
        let model = SdpBuilder::build(&correlated(), Formulation::Block).unwrap();

        // 2p box rows + (2p)(2p+1)/2 triangle rows
        assert_eq!(model.num_vars(), 3);
        assert_eq!(model.num_constraints(), 6 + 21);
        assert_eq!(model.cones, vec![ConeSpec::Nonnegative(6), ConeSpec::PsdTriangle(6)]);
        assert!(model.q.iter().all(|&c| c == -1.0));
    }

    #[test]
    fn test_compact_dimensions() {
        let model = SdpBuilder::build(&correlated(), Formulation::Compact).unwrap();
        assert_eq!(model.num_constraints(), 6 + 6);
        assert_eq!(model.cones, vec![ConeSpec::Nonnegative(6), ConeSpec::PsdTriangle(3)]);
    }

    #[test]
    fn test_slack_reproduces_constraint_matrix() {
        let gram = correlated();
        let s = [0.3, 0.7, 0.5];

        for formulation in [Formulation::Block, Formulation::Compact] {
            let model = SdpBuilder::build(&gram, formulation).unwrap();
            let z = model.slack(&s);
            let p = gram.dim();
            let order = formulation.lmi_order(p);

            // Box slacks are s and 1 - s
            for i in 0..p {
                assert!((z[i] - s[i]).abs() < 1e-12);
                assert!((z[p + i] - (1.0 - s[i])).abs() < 1e-12);
            }

            let lmi = smat(&z.rows(2 * p, svec_len(order)).into_owned(), order);
            let expected = formulation.constraint_matrix(gram.as_matrix(), &s);
            assert!((lmi - expected).abs().max() < 1e-12, "{:?}", formulation);
        }
    }

    #[test]
    fn test_constraint_matrix_is_sparse() {
        // Three nonzeros per variable regardless of size
        let p = 200;
        let model = SdpBuilder::build(&GramMatrix::identity(p).unwrap(), Formulation::Block).unwrap();

        assert_eq!(model.a.nrows(), 2 * p + svec_len(2 * p));
        assert_eq!(model.a.nnz(), 3 * p);
        assert_eq!(model.a.colptr.len(), p + 1);
        assert_eq!(model.a.get(0, 0), Some(-1.0));
        assert_eq!(model.a.get(p, 0), Some(1.0));
        assert_eq!(model.a.get(2 * p + svec_index(0, p), 0), Some(SQRT_2));
    }

    #[test]
    fn test_var_meta_tracks_indices() {
        let model = SdpBuilder::build(&correlated(), Formulation::Block).unwrap();
        assert_eq!(
            model.var_meta,
            vec![VarMeta::Shrinkage(0), VarMeta::Shrinkage(1), VarMeta::Shrinkage(2)]
        );
    }
}
