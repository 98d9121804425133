//! Coefficient extraction: fitted terms to the quadratic form `β0 + bᵀx + xᵀBx`.

use ndarray::{Array1, Array2, ArrayView1};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{FittedSurfaceModel, ModelOrder, TermKind};

/// A fitted surface written as `intercept + bᵀx + xᵀBx`.
///
/// `quadratic` holds `B[i][i] = βii` and `B[i][j] = B[j][i] = βij / 2`, so
/// that `xᵀBx = Σ βii xi² + Σ_{i<j} βij xi xj`. It is all zeros for models
/// without second-order terms.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadraticForm {
    /// Constant term β0.
    pub intercept: f64,
    /// Linear coefficients `b`, one per factor.
    pub linear: Array1<f64>,
    /// Symmetric matrix `B`.
    pub quadratic: Array2<f64>,
}

impl QuadraticForm {
    /// Number of factors.
    #[must_use]
    pub fn k(&self) -> usize {
        self.linear.len()
    }

    /// `intercept + bᵀx + xᵀBx`.
    #[must_use]
    pub fn evaluate(&self, x: ArrayView1<'_, f64>) -> f64 {
        self.intercept + self.linear.dot(&x) + x.dot(&self.quadratic.dot(&x))
    }

    /// `b + 2Bx`.
    #[must_use]
    pub fn gradient(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        &self.linear + &(self.quadratic.dot(&x) * 2.0)
    }

    /// Hessian `2B`.
    #[must_use]
    pub fn hessian(&self) -> Array2<f64> {
        &self.quadratic * 2.0
    }
}

/// Extract the quadratic form of any model order.
///
/// The intercept and every linear term must be present. For orders with
/// squared terms every squared term must be present as well. Interaction
/// pairs absent from the fit contribute zero and are logged as a warning.
///
/// # Errors
///
/// Returns `MissingTerm` naming the first required term that is absent.
pub fn extract_coefficients(model: &FittedSurfaceModel) -> Result<QuadraticForm> {
    let k = model.k();
    let order = model.order();
    let require = |kind: TermKind| -> Result<f64> {
        model
            .term(kind)
            .map(|t| t.estimate)
            .ok_or_else(|| Error::MissingTerm {
                term: model.label(kind),
                order,
            })
    };

    let intercept = require(TermKind::Intercept)?;
    let linear = (0..k)
        .map(|i| require(TermKind::Linear(i)))
        .collect::<Result<Array1<f64>>>()?;

    let mut quadratic = Array2::<f64>::zeros((k, k));
    if order.has_squares() {
        for i in 0..k {
            quadratic[[i, i]] = require(TermKind::Squared(i))?;
        }
    }
    if order.has_interactions() {
        for i in 0..k {
            for j in (i + 1)..k {
                let kind = TermKind::Interaction(i, j);
                let half = match model.term(kind) {
                    Some(term) => term.estimate / 2.0,
                    None => {
                        log::warn!(
                            "interaction `{}` is absent from the fit; treating it as zero",
                            model.label(kind)
                        );
                        0.0
                    }
                };
                quadratic[[i, j]] = half;
                quadratic[[j, i]] = half;
            }
        }
    }

    Ok(QuadraticForm {
        intercept,
        linear,
        quadratic,
    })
}

/// Extract the quadratic form of a second-order model.
///
/// # Errors
///
/// Returns `NotQuadratic` for linear and linear-with-interaction models,
/// plus every error of [`extract_coefficients`].
pub fn extract_quadratic(model: &FittedSurfaceModel) -> Result<QuadraticForm> {
    if model.order() != ModelOrder::Quadratic {
        return Err(Error::NotQuadratic {
            order: model.order(),
        });
    }
    extract_coefficients(model)
}
