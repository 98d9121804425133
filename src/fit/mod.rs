//! Least-squares fitting of polynomial response surfaces.
//!
//! This module turns an [`Experiment`] into a [`FittedSurfaceModel`] plus
//! the usual regression summary:
//! - Coefficient estimates with standard errors, t statistics and p-values
//! - Confidence intervals for every term
//! - R², adjusted R² and the overall F-test
//! - Sequential ANOVA with lack-of-fit when runs are replicated
//!
//! ## Quick Start
//!
//! ```rust
//! use rsm::design::three_level_factorial;
//! use rsm::fit::{fit_surface, FitConfig};
//! use rsm::model::ModelOrder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let design = three_level_factorial(["A", "B"])?;
//! let response = vec![5.0, 8.0, 6.0, 7.0, 10.0, 8.5, 5.5, 8.0, 6.0];
//! let experiment = design.into_experiment("y", response)?;
//!
//! let fit = fit_surface(&experiment, ModelOrder::Quadratic, &FitConfig::default())?;
//! assert_eq!(fit.model.terms().len(), 6);
//! assert_eq!(fit.statistics.residual_df, 3);
//! # Ok(())
//! # }
//! ```

mod anova;
mod ols;
mod stats;
mod types;

pub use stats::{
    f_distribution_p_value, ln_gamma, regularized_incomplete_beta, t_critical_value,
    t_distribution_p_value,
};
pub use types::{
    AnovaRow, AnovaSource, AnovaTable, ConfidenceInterval, FitConfig, FitStatistics, SurfaceFit,
};

use ndarray::Array2;

use crate::data::Experiment;
use crate::error::{Error, Result};
use crate::model::{FittedSurfaceModel, ModelOrder, Term};

/// Fit a polynomial surface of the given order to an experiment.
///
/// # Arguments
/// * `experiment` - Coded settings and observed responses
/// * `order` - Which term groups to include
/// * `config` - Fitting configuration
///
/// # Returns
/// * The fitted model with inferential statistics and ANOVA
///
/// # Errors
/// * `InvalidParams` if the confidence level is outside (0, 1)
/// * `RankDeficientDesign` if the design cannot support the model, such as
///   a quadratic on a two-level factorial
pub fn fit_surface(
    experiment: &Experiment,
    order: ModelOrder,
    config: &FitConfig,
) -> Result<SurfaceFit> {
    if !(config.confidence_level > 0.0 && config.confidence_level < 1.0) {
        return Err(Error::invalid_params(format!(
            "confidence level must lie in (0, 1), got {}",
            config.confidence_level
        )));
    }

    let factors = experiment.factors().to_vec();
    let kinds = order.terms(factors.len());
    let coded = experiment.coded();
    let y = experiment.response();
    let n = experiment.runs();
    let p = kinds.len();

    let runs: Vec<Vec<f64>> = coded.rows().into_iter().map(|r| r.to_vec()).collect();
    let x = Array2::from_shape_fn((n, p), |(i, j)| kinds[j].evaluate(&runs[i]));

    let solution = ols::least_squares(x.view(), y)?;
    let residual_df = n - p;
    let sigma2 = (residual_df > 0).then(|| solution.rss / residual_df as f64);
    let t_crit = (residual_df > 0)
        .then(|| stats::t_critical_value(config.confidence_level, residual_df));

    let mut terms = Vec::with_capacity(p);
    let mut confidence_intervals = Vec::with_capacity(p);
    for (j, &kind) in kinds.iter().enumerate() {
        let estimate = solution.coefficients[j];
        let std_error = sigma2.map(|s2| (s2 * solution.unscaled_covariance[[j, j]]).sqrt());
        let t_value = std_error.filter(|&se| se > 0.0).map(|se| estimate / se);
        let p_value = t_value.map(|t| stats::t_distribution_p_value(t, residual_df));

        confidence_intervals.push(std_error.zip(t_crit).map(|(se, t)| ConfidenceInterval {
            lower: estimate - t * se,
            upper: estimate + t * se,
            level: config.confidence_level,
        }));
        terms.push(Term {
            kind,
            estimate,
            std_error,
            t_value,
            p_value,
        });
    }

    let mean = y.sum() / n as f64;
    let total_ss: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let r_squared = if total_ss > 0.0 {
        1.0 - solution.rss / total_ss
    } else {
        1.0
    };
    let adj_r_squared = (residual_df > 0)
        .then(|| 1.0 - (1.0 - r_squared) * (n - 1) as f64 / residual_df as f64);
    let model_df = p - 1;
    let f_statistic = sigma2
        .filter(|&s2| s2 > 0.0 && model_df > 0)
        .map(|s2| ((total_ss - solution.rss) / model_df as f64) / s2);
    let f_p_value = f_statistic.map(|f| stats::f_distribution_p_value(f, model_df, residual_df));

    let statistics = FitStatistics {
        n_obs: n,
        n_terms: p,
        residual_df,
        residual_std_error: sigma2.map(f64::sqrt),
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value,
    };

    let groups = experiment.replicate_groups();
    let anova = anova::sequential_anova(&x, &kinds, y, solution.rss, &groups)?;

    let residuals: Vec<f64> = y
        .iter()
        .zip(solution.fitted.iter())
        .map(|(obs, fit)| obs - fit)
        .collect();

    let mut model = FittedSurfaceModel::new(experiment.response_name(), factors, order, terms)?;
    if let Some(encoding) = experiment.encoding() {
        model = model.with_encoding(encoding.clone())?;
    }

    log::debug!(
        "fitted {order} surface for `{}`: n={n}, terms={p}, R²={r_squared:.4}",
        model.response()
    );

    Ok(SurfaceFit {
        model,
        confidence_intervals,
        statistics,
        anova,
        residuals,
    })
}
