//! Error types for the rsm library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! variants for surface analysis preconditions, model and design validation,
//! and least-squares fitting.

use thiserror::Error;

use crate::model::ModelOrder;

/// The main error type for the rsm library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============ Surface Analysis Errors ============
    /// Canonical analysis was requested on a model without second-order terms.
    #[error("canonical analysis requires a second-order model, got a {order} model")]
    NotQuadratic {
        /// Order of the offending model.
        order: ModelOrder,
    },

    /// A term required by the analysis is absent from the fitted model.
    #[error("term `{term}` is required but missing from the {order} model")]
    MissingTerm {
        /// Label of the missing term.
        term: String,
        /// Order of the model the term was looked up in.
        order: ModelOrder,
    },

    /// The quadratic coefficient matrix has no inverse.
    #[error("quadratic coefficient matrix is singular, no unique stationary point: {reason}")]
    SingularHessian {
        /// What made the matrix singular.
        reason: String,
    },

    /// The gradient vanishes at the requested start point.
    #[error("gradient is exactly zero at {point:?}, no ascent or descent direction exists")]
    ZeroGradient {
        /// Coded coordinates of the start point.
        point: Vec<f64>,
    },

    /// An optimization objective could not be recognised.
    #[error("unrecognized optimization objective `{0}` (expected `maximize` or `minimize`)")]
    InvalidObjective(String),

    // ============ Parameter Validation Errors ============
    /// Invalid parameters.
    #[error("invalid parameters: {message}")]
    InvalidParams {
        /// Description of what is invalid.
        message: String,
    },

    /// Vector or matrix dimensions are inconsistent.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension description.
        expected: String,
        /// Actual dimension description.
        actual: String,
    },

    /// A factor name is not known to the model, dataset or encoding.
    #[error("unknown factor `{0}`")]
    UnknownFactor(String),

    /// Natural-scale levels are needed but were never attached.
    #[error("no natural-scale levels are available for factor `{0}`")]
    MissingEncoding(String),

    // ============ Fitting Errors ============
    /// The model matrix does not have full column rank.
    #[error("model matrix is rank deficient: {columns} terms but rank {rank}")]
    RankDeficientDesign {
        /// Number of model terms (columns).
        columns: usize,
        /// Numerical rank of the model matrix.
        rank: usize,
    },
}

/// A specialized `Result` type for rsm operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `InvalidParams` error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Create a new `SingularHessian` error.
    #[must_use]
    pub fn singular_hessian(reason: impl Into<String>) -> Self {
        Self::SingularHessian {
            reason: reason.into(),
        }
    }

    /// Create a new `DimensionMismatch` error.
    #[must_use]
    pub fn dimension_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
