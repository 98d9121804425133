//! Ordinary least squares on a dense model matrix.
//!
//! The model matrix is factored once with an SVD. The same factorization
//! yields the coefficients, the numerical rank, and the unscaled covariance
//! `(XᵀX)⁻¹ = V Σ⁻² Vᵀ`, so no normal equations are ever formed.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{Error, Result};
use crate::linalg::{from_dvector, to_dmatrix, to_dvector};

/// Solution of a full-rank least-squares problem.
#[derive(Debug, Clone)]
pub(crate) struct LeastSquares {
    /// Coefficient estimates, one per column.
    pub coefficients: Array1<f64>,
    /// Fitted values `Xβ`.
    pub fitted: Array1<f64>,
    /// Residual sum of squares.
    pub rss: f64,
    /// Unscaled covariance `(XᵀX)⁻¹`.
    pub unscaled_covariance: Array2<f64>,
}

/// Solve `min ||y - Xβ||²`.
///
/// # Errors
///
/// Returns `RankDeficientDesign` when `X` has fewer rows than columns or its
/// numerical rank is below the column count.
pub(crate) fn least_squares(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> Result<LeastSquares> {
    let (n, p) = x.dim();
    if y.len() != n {
        return Err(Error::dimension_mismatch(
            format!("{n} responses"),
            format!("{} responses", y.len()),
        ));
    }
    if n < p {
        return Err(Error::RankDeficientDesign {
            columns: p,
            rank: n,
        });
    }

    let xm: DMatrix<f64> = to_dmatrix(x);
    let yv: DVector<f64> = to_dvector(y);

    let svd = xm.clone().svd(true, true);
    let max_sv = svd.singular_values.iter().copied().fold(0.0, f64::max);
    let tolerance = max_sv * n.max(p) as f64 * f64::EPSILON;
    let rank = svd.rank(tolerance);
    if rank < p || max_sv == 0.0 {
        return Err(Error::RankDeficientDesign { columns: p, rank });
    }

    let beta = svd
        .solve(&yv, tolerance)
        .map_err(|e| Error::invalid_params(format!("least-squares solve failed: {e}")))?;

    let fitted = &xm * &beta;
    let rss = (&yv - &fitted).norm_squared();

    let v_t = svd
        .v_t
        .as_ref()
        .ok_or_else(|| Error::invalid_params("SVD did not produce right singular vectors"))?;
    let mut unscaled_covariance = Array2::<f64>::zeros((p, p));
    for (k, &s) in svd.singular_values.iter().enumerate() {
        let w = 1.0 / (s * s);
        for i in 0..p {
            for j in 0..p {
                unscaled_covariance[[i, j]] += v_t[(k, i)] * v_t[(k, j)] * w;
            }
        }
    }

    Ok(LeastSquares {
        coefficients: from_dvector(&beta),
        fitted: from_dvector(&fitted),
        rss,
        unscaled_covariance,
    })
}
