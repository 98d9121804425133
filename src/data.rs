//! Experimental data on the coded scale.
//!
//! An [`Experiment`] pairs a coded run matrix (runs × factors) with the
//! observed response. Natural-scale levels travel with it as an explicit
//! optional [`Encoding`] and are handed on to the fitted model.

use std::collections::HashSet;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coding::Encoding;
use crate::error::{Error, Result};

/// Observed responses at coded factor settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Experiment {
    factors: Vec<String>,
    coded: Array2<f64>,
    response_name: String,
    response: Array1<f64>,
    encoding: Option<Encoding>,
}

impl Experiment {
    /// Build an experiment from coded settings.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two factors are named, names repeat,
    /// the matrix width differs from the factor count, the response length
    /// differs from the run count, or any value is not finite.
    pub fn from_coded(
        factors: Vec<String>,
        coded: Array2<f64>,
        response_name: impl Into<String>,
        response: Vec<f64>,
    ) -> Result<Self> {
        validate_factors(&factors)?;

        if coded.ncols() != factors.len() {
            return Err(Error::dimension_mismatch(
                format!("{} columns (one per factor)", factors.len()),
                format!("{} columns", coded.ncols()),
            ));
        }
        if response.len() != coded.nrows() {
            return Err(Error::dimension_mismatch(
                format!("{} responses (one per run)", coded.nrows()),
                format!("{} responses", response.len()),
            ));
        }
        if coded.nrows() == 0 {
            return Err(Error::invalid_params("experiment has no runs"));
        }
        if coded.iter().chain(response.iter()).any(|v| !v.is_finite()) {
            return Err(Error::invalid_params(
                "factor settings and responses must be finite",
            ));
        }

        Ok(Self {
            factors,
            coded,
            response_name: response_name.into(),
            response: Array1::from(response),
            encoding: None,
        })
    }

    /// Build an experiment from natural-scale settings, coding them with
    /// `encoding`. The encoding is kept for natural-scale reporting.
    ///
    /// # Errors
    ///
    /// Returns `MissingEncoding` if a factor has no levels, plus every error
    /// of [`Experiment::from_coded`].
    pub fn from_natural(
        factors: Vec<String>,
        natural: ArrayView2<'_, f64>,
        response_name: impl Into<String>,
        response: Vec<f64>,
        encoding: Encoding,
    ) -> Result<Self> {
        validate_factors(&factors)?;
        if natural.ncols() != factors.len() {
            return Err(Error::dimension_mismatch(
                format!("{} columns (one per factor)", factors.len()),
                format!("{} columns", natural.ncols()),
            ));
        }

        let mut coded = Array2::<f64>::zeros(natural.raw_dim());
        for (j, name) in factors.iter().enumerate() {
            let levels = encoding
                .get(name)
                .ok_or_else(|| Error::MissingEncoding(name.clone()))?;
            for i in 0..natural.nrows() {
                coded[[i, j]] = levels.encode(natural[[i, j]]);
            }
        }

        let mut experiment = Self::from_coded(factors, coded, response_name, response)?;
        experiment.encoding = Some(encoding);
        Ok(experiment)
    }

    /// Attach natural-scale levels to an experiment built from coded data.
    pub fn with_encoding(mut self, encoding: Encoding) -> Result<Self> {
        if let Some(missing) = self.factors.iter().find(|f| encoding.get(f).is_none()) {
            return Err(Error::MissingEncoding(missing.clone()));
        }
        self.encoding = Some(encoding);
        Ok(self)
    }

    /// Factor names in column order.
    #[must_use]
    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    /// Coded run matrix (runs × factors).
    #[must_use]
    pub fn coded(&self) -> ArrayView2<'_, f64> {
        self.coded.view()
    }

    /// Name of the response variable.
    #[must_use]
    pub fn response_name(&self) -> &str {
        &self.response_name
    }

    /// Observed responses, one per run.
    #[must_use]
    pub fn response(&self) -> ArrayView1<'_, f64> {
        self.response.view()
    }

    /// Natural-scale levels, when known.
    #[must_use]
    pub fn encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref()
    }

    /// Number of runs.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.coded.nrows()
    }

    /// Groups of runs sharing identical settings, in order of first
    /// appearance. Runs that are never repeated form singleton groups.
    #[must_use]
    pub fn replicate_groups(&self) -> Vec<Vec<usize>> {
        const TOLERANCE: f64 = 1e-9;
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..self.runs() {
            let row = self.coded.row(i);
            let existing = groups.iter_mut().find(|g| {
                self.coded
                    .row(g[0])
                    .iter()
                    .zip(row.iter())
                    .all(|(a, b)| (a - b).abs() <= TOLERANCE)
            });
            match existing {
                Some(group) => group.push(i),
                None => groups.push(vec![i]),
            }
        }
        groups
    }
}

fn validate_factors(factors: &[String]) -> Result<()> {
    if factors.len() < 2 {
        return Err(Error::invalid_params(format!(
            "a response surface needs at least 2 factors, got {}",
            factors.len()
        )));
    }
    let mut seen = HashSet::with_capacity(factors.len());
    for name in factors {
        if !seen.insert(name.as_str()) {
            return Err(Error::invalid_params(format!(
                "factor `{name}` is listed more than once"
            )));
        }
    }
    Ok(())
}
