//! Surface fitting result types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::FittedSurfaceModel;

/// Configuration for surface fitting.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitConfig {
    /// Confidence level for coefficient intervals (default: 0.95).
    pub confidence_level: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

/// Confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Confidence level (e.g., 0.95 for 95%).
    pub level: f64,
}

/// Goodness-of-fit statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitStatistics {
    /// Number of observations.
    pub n_obs: usize,
    /// Number of estimated terms, intercept included.
    pub n_terms: usize,
    /// Residual degrees of freedom.
    pub residual_df: usize,
    /// Residual standard error, None for a saturated fit.
    pub residual_std_error: Option<f64>,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// R² adjusted for the number of terms, None for a saturated fit.
    pub adj_r_squared: Option<f64>,
    /// Overall F statistic against the intercept-only model.
    pub f_statistic: Option<f64>,
    /// p-value of the overall F statistic.
    pub f_p_value: Option<f64>,
}

/// Source of variation in the sequential ANOVA table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnovaSource {
    /// Linear terms, entered after the intercept.
    FirstOrder,
    /// Two-way interactions, entered after the linear terms.
    TwoWayInteraction,
    /// Squared terms, entered last.
    PureQuadratic,
    /// Residual variation.
    Residuals,
    /// Residual variation explained by departures from the model form.
    LackOfFit,
    /// Replicate-to-replicate variation.
    PureError,
}

impl fmt::Display for AnovaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FirstOrder => "FO",
            Self::TwoWayInteraction => "TWI",
            Self::PureQuadratic => "PQ",
            Self::Residuals => "Residuals",
            Self::LackOfFit => "Lack of fit",
            Self::PureError => "Pure error",
        };
        f.write_str(name)
    }
}

/// One row of the ANOVA table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnovaRow {
    /// What this row measures.
    pub source: AnovaSource,
    /// Degrees of freedom.
    pub df: usize,
    /// Sum of squares.
    pub sum_of_squares: f64,
    /// Mean square (SS / df).
    pub mean_square: f64,
    /// F-ratio against the residual (or pure error for lack of fit).
    pub f_ratio: Option<f64>,
    /// p-value of the F-ratio.
    pub p_value: Option<f64>,
}

/// Sequential ANOVA table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnovaTable {
    /// Rows in presentation order.
    pub rows: Vec<AnovaRow>,
    /// Total (corrected) sum of squares.
    pub total_ss: f64,
    /// Total degrees of freedom.
    pub total_df: usize,
}

impl AnovaTable {
    /// Look up a row by source.
    #[must_use]
    pub fn row(&self, source: AnovaSource) -> Option<&AnovaRow> {
        self.rows.iter().find(|r| r.source == source)
    }
}

/// Complete result of fitting a surface to an experiment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceFit {
    /// The fitted model, consumed by canonical analysis and path search.
    pub model: FittedSurfaceModel,
    /// Interval for each term, aligned with `model.terms()`.
    pub confidence_intervals: Vec<Option<ConfidenceInterval>>,
    /// Goodness-of-fit statistics.
    pub statistics: FitStatistics,
    /// Sequential ANOVA.
    pub anova: AnovaTable,
    /// Residuals `y - ŷ`, one per run.
    pub residuals: Vec<f64>,
}
