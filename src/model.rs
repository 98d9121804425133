//! Fitted response-surface models.
//!
//! A [`FittedSurfaceModel`] is the immutable result of regression fitting:
//! the response name, the ordered coded factors, the model order, and the
//! estimated terms. Terms are structured ([`TermKind`]) rather than labelled
//! by strings, so downstream analysis never parses term names.
//!
//! The model is
//!
//! ```text
//! y = β0 + Σ βi xi + Σ βii xi² + Σ_{i<j} βij xi xj
//! ```

use std::collections::HashSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coding::Encoding;
use crate::error::{Error, Result};

/// Order of a polynomial response-surface model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModelOrder {
    /// First-order terms only.
    Linear,
    /// First-order terms plus two-way interactions.
    LinearWithInteraction,
    /// Full second-order model.
    Quadratic,
}

impl ModelOrder {
    /// Whether two-way interaction terms belong to this order.
    #[must_use]
    pub fn has_interactions(self) -> bool {
        !matches!(self, Self::Linear)
    }

    /// Whether squared terms belong to this order.
    #[must_use]
    pub fn has_squares(self) -> bool {
        matches!(self, Self::Quadratic)
    }

    /// Terms of this order for `k` factors, in model-matrix order.
    ///
    /// The intercept comes first, then linear terms in factor order, then
    /// interactions `(i, j)` with `i < j` in lexicographic order, then
    /// squared terms.
    #[must_use]
    pub fn terms(self, k: usize) -> Vec<TermKind> {
        let mut terms = Vec::with_capacity(1 + 2 * k + k * k.saturating_sub(1) / 2);
        terms.push(TermKind::Intercept);
        terms.extend((0..k).map(TermKind::Linear));
        if self.has_interactions() {
            for i in 0..k {
                for j in (i + 1)..k {
                    terms.push(TermKind::Interaction(i, j));
                }
            }
        }
        if self.has_squares() {
            terms.extend((0..k).map(TermKind::Squared));
        }
        terms
    }
}

impl fmt::Display for ModelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::LinearWithInteraction => "linear-with-interaction",
            Self::Quadratic => "quadratic",
        };
        f.write_str(name)
    }
}

/// Structural identity of a model term. Factor positions index the model's
/// factor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TermKind {
    /// Constant term.
    Intercept,
    /// First-order term `xi`.
    Linear(usize),
    /// Pure quadratic term `xi²`.
    Squared(usize),
    /// Two-way interaction `xi xj`, stored with `i < j`.
    Interaction(usize, usize),
}

impl TermKind {
    /// Interaction of two distinct factors, normalised so the smaller
    /// position comes first.
    ///
    /// # Errors
    ///
    /// Returns an error if `i == j`; use [`TermKind::Squared`] instead.
    pub fn interaction(i: usize, j: usize) -> Result<Self> {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Ok(Self::Interaction(i, j)),
            std::cmp::Ordering::Greater => Ok(Self::Interaction(j, i)),
            std::cmp::Ordering::Equal => Err(Error::invalid_params(format!(
                "interaction of factor {i} with itself is a squared term"
            ))),
        }
    }

    /// Largest factor position referenced by this term.
    fn max_factor(self) -> Option<usize> {
        match self {
            Self::Intercept => None,
            Self::Linear(i) | Self::Squared(i) => Some(i),
            Self::Interaction(i, j) => Some(i.max(j)),
        }
    }

    /// Value of the term's regressor at a coded point.
    #[must_use]
    pub fn evaluate(self, x: &[f64]) -> f64 {
        match self {
            Self::Intercept => 1.0,
            Self::Linear(i) => x[i],
            Self::Squared(i) => x[i] * x[i],
            Self::Interaction(i, j) => x[i] * x[j],
        }
    }

    /// Human-readable label using the given factor names.
    #[must_use]
    pub fn label(self, factors: &[String]) -> String {
        let name = |i: usize| factors.get(i).map_or_else(|| format!("x{}", i + 1), Clone::clone);
        match self {
            Self::Intercept => "(Intercept)".to_string(),
            Self::Linear(i) => name(i),
            Self::Squared(i) => format!("{}^2", name(i)),
            Self::Interaction(i, j) => format!("{}:{}", name(i), name(j)),
        }
    }
}

/// A single estimated model term.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Term {
    /// Which regressor this term multiplies.
    pub kind: TermKind,
    /// Estimated coefficient.
    pub estimate: f64,
    /// Standard error of the estimate, when residual degrees of freedom exist.
    pub std_error: Option<f64>,
    /// t statistic `estimate / std_error`.
    pub t_value: Option<f64>,
    /// Two-sided p-value of the t statistic.
    pub p_value: Option<f64>,
}

impl Term {
    /// Create a term with an estimate and no inferential statistics.
    #[must_use]
    pub fn new(kind: TermKind, estimate: f64) -> Self {
        Self {
            kind,
            estimate,
            std_error: None,
            t_value: None,
            p_value: None,
        }
    }
}

/// Immutable result of fitting a polynomial surface on coded factors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FittedSurfaceModel {
    response: String,
    factors: Vec<String>,
    order: ModelOrder,
    terms: Vec<Term>,
    encoding: Option<Encoding>,
}

impl FittedSurfaceModel {
    /// Assemble a model from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two factors are given, factor names
    /// repeat, a term references an unknown factor position, a term appears
    /// twice, a term does not belong to `order`, or an estimate is not finite.
    pub fn new(
        response: impl Into<String>,
        factors: Vec<String>,
        order: ModelOrder,
        terms: Vec<Term>,
    ) -> Result<Self> {
        let k = factors.len();
        if k < 2 {
            return Err(Error::invalid_params(format!(
                "a response surface needs at least 2 factors, got {k}"
            )));
        }

        let mut names = HashSet::with_capacity(k);
        for name in &factors {
            if !names.insert(name.as_str()) {
                return Err(Error::invalid_params(format!(
                    "factor `{name}` is listed more than once"
                )));
            }
        }

        let mut seen = HashSet::with_capacity(terms.len());
        for term in &terms {
            if let Some(i) = term.kind.max_factor() {
                if i >= k {
                    return Err(Error::invalid_params(format!(
                        "term references factor position {i} but the model has {k} factors"
                    )));
                }
            }
            match term.kind {
                TermKind::Interaction(i, j) if i >= j => {
                    return Err(Error::invalid_params(format!(
                        "interaction ({i}, {j}) must list the smaller position first"
                    )));
                }
                TermKind::Interaction(..) if !order.has_interactions() => {
                    return Err(Error::invalid_params(format!(
                        "interaction term `{}` does not belong to a {order} model",
                        term.kind.label(&factors)
                    )));
                }
                TermKind::Squared(_) if !order.has_squares() => {
                    return Err(Error::invalid_params(format!(
                        "squared term `{}` does not belong to a {order} model",
                        term.kind.label(&factors)
                    )));
                }
                _ => {}
            }
            if !seen.insert(term.kind) {
                return Err(Error::invalid_params(format!(
                    "term `{}` is listed more than once",
                    term.kind.label(&factors)
                )));
            }
            if !term.estimate.is_finite() {
                return Err(Error::invalid_params(format!(
                    "estimate of `{}` is not finite",
                    term.kind.label(&factors)
                )));
            }
        }

        Ok(Self {
            response: response.into(),
            factors,
            order,
            terms,
            encoding: None,
        })
    }

    /// Attach natural-scale levels.
    ///
    /// # Errors
    ///
    /// Returns `MissingEncoding` for the first model factor without levels.
    pub fn with_encoding(mut self, encoding: Encoding) -> Result<Self> {
        if let Some(missing) = self.factors.iter().find(|f| encoding.get(f).is_none()) {
            return Err(Error::MissingEncoding(missing.clone()));
        }
        self.encoding = Some(encoding);
        Ok(self)
    }

    /// Name of the response variable.
    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Ordered coded factor names.
    #[must_use]
    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    /// Number of factors.
    #[must_use]
    pub fn k(&self) -> usize {
        self.factors.len()
    }

    /// Model order.
    #[must_use]
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    /// Estimated terms in fit order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Natural-scale levels, when known.
    #[must_use]
    pub fn encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref()
    }

    /// Look up a term by kind.
    #[must_use]
    pub fn term(&self, kind: TermKind) -> Option<&Term> {
        self.terms.iter().find(|t| t.kind == kind)
    }

    /// Label of a term kind using this model's factor names.
    #[must_use]
    pub fn label(&self, kind: TermKind) -> String {
        kind.label(&self.factors)
    }

    /// Position of a factor by name.
    pub fn factor_index(&self, name: &str) -> Result<usize> {
        self.factors
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| Error::UnknownFactor(name.to_string()))
    }

    /// Predict the response at a coded point by summing every term.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `coded` does not have one value per
    /// factor.
    pub fn predict(&self, coded: &[f64]) -> Result<f64> {
        if coded.len() != self.k() {
            return Err(Error::dimension_mismatch(
                format!("{} coordinates", self.k()),
                format!("{} coordinates", coded.len()),
            ));
        }
        Ok(self
            .terms
            .iter()
            .map(|t| t.estimate * t.kind.evaluate(coded))
            .sum())
    }

    /// Predict the response at a natural-scale point.
    ///
    /// # Errors
    ///
    /// Returns `MissingEncoding` if no levels are attached.
    pub fn predict_natural(&self, natural: &[f64]) -> Result<f64> {
        let encoding = self
            .encoding
            .as_ref()
            .ok_or_else(|| Error::MissingEncoding(self.factors[0].clone()))?;
        let coded = encoding.encode_point(&self.factors, natural)?;
        self.predict(&coded)
    }

    /// Convert a coded point to natural units if every factor is encoded.
    #[must_use]
    pub fn to_natural(&self, coded: &[f64]) -> Option<Vec<f64>> {
        self.encoding
            .as_ref()
            .and_then(|e| e.decode_point(&self.factors, coded).ok())
    }
}
