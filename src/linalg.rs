//! Bridges between `ndarray` storage and `nalgebra` decompositions.
//!
//! Public types hold `ndarray` arrays; solves and eigendecompositions run on
//! `nalgebra` copies. Matrices here are tiny, so the copies are irrelevant.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Copy an `ndarray` matrix into a `DMatrix`.
pub(crate) fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copy an `ndarray` vector into a `DVector`.
pub(crate) fn to_dvector(v: ArrayView1<'_, f64>) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().copied())
}

/// Copy a `DVector` back into an `ndarray` vector.
pub(crate) fn from_dvector(v: &DVector<f64>) -> Array1<f64> {
    v.iter().copied().collect()
}

/// Eigendecomposition of a symmetric matrix with a fixed presentation order.
///
/// Eigenvalues are sorted in descending order and the eigenvector columns
/// follow them. Each eigenvector is flipped so that its largest-magnitude
/// component is positive; ties go to the lowest index.
pub(crate) fn sorted_symmetric_eigen(a: ArrayView2<'_, f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let SymmetricEigen {
        eigenvalues,
        eigenvectors,
    } = to_dmatrix(a).symmetric_eigen();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| eigenvalues[j].total_cmp(&eigenvalues[i]));

    let values: Array1<f64> = order.iter().map(|&i| eigenvalues[i]).collect();
    let mut vectors = Array2::<f64>::zeros((n, n));
    for (col, &src) in order.iter().enumerate() {
        let column = eigenvectors.column(src);
        let mut pivot = 0;
        for row in 1..n {
            if column[row].abs() > column[pivot].abs() {
                pivot = row;
            }
        }
        let sign = if column[pivot] < 0.0 { -1.0 } else { 1.0 };
        for row in 0..n {
            vectors[[row, col]] = sign * column[row];
        }
    }
    (values, vectors)
}
