//! Plain-text presentation of analysis results.
//!
//! Every result kind is a variant of [`Report`]; presentation lives in free
//! functions that match on the variant. The numeric results stay available
//! as structured data, and [`get_stationary_point`] projects a canonical
//! report into table rows.

use std::fmt::{self, Write as _};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fit::SurfaceFit;
use crate::optimize::OptimizationResult;
use crate::surface::{CanonicalReport, SteepestPathReport, SurfaceType};

/// Any result the crate can present.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Report {
    /// Regression fit with term statistics and ANOVA.
    Fit(SurfaceFit),
    /// Stationary point and curvature.
    Canonical(CanonicalReport),
    /// Steepest ascent or descent path.
    SteepestPath(SteepestPathReport),
    /// Grid-search optimum.
    Optimization(OptimizationResult),
}

impl From<SurfaceFit> for Report {
    fn from(fit: SurfaceFit) -> Self {
        Self::Fit(fit)
    }
}

impl From<CanonicalReport> for Report {
    fn from(report: CanonicalReport) -> Self {
        Self::Canonical(report)
    }
}

impl From<SteepestPathReport> for Report {
    fn from(report: SteepestPathReport) -> Self {
        Self::SteepestPath(report)
    }
}

impl From<OptimizationResult> for Report {
    fn from(result: OptimizationResult) -> Self {
        Self::Optimization(result)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&summarize(self))
    }
}

/// Render any report as text.
#[must_use]
pub fn summarize(report: &Report) -> String {
    match report {
        Report::Fit(fit) => summarize_fit(fit),
        Report::Canonical(canonical) => summarize_canonical(canonical),
        Report::SteepestPath(path) => summarize_path(path),
        Report::Optimization(result) => summarize_optimization(result),
    }
}

/// Coefficient table, fit statistics and ANOVA.
#[must_use]
pub fn summarize_fit(fit: &SurfaceFit) -> String {
    let model = &fit.model;
    let stats = &fit.statistics;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Response surface fit for {} ({} model, {} runs)",
        model.response(),
        model.order(),
        stats.n_obs
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<14} {:>12} {:>12} {:>10} {:>10}",
        "Term", "Estimate", "Std. Error", "t value", "Pr(>|t|)"
    );
    for term in model.terms() {
        let _ = writeln!(
            out,
            "{:<14} {:>12.5} {:>12} {:>10} {:>10}",
            model.label(term.kind),
            term.estimate,
            optional(term.std_error, 5),
            optional(term.t_value, 3),
            p_value(term.p_value)
        );
    }
    let _ = writeln!(out);

    match stats.residual_std_error {
        Some(se) => {
            let _ = writeln!(
                out,
                "Residual standard error: {se:.4} on {} degrees of freedom",
                stats.residual_df
            );
        }
        None => {
            let _ = writeln!(out, "Saturated fit: no residual degrees of freedom");
        }
    }
    let _ = writeln!(
        out,
        "Multiple R-squared: {:.4}, Adjusted R-squared: {}",
        stats.r_squared,
        optional(stats.adj_r_squared, 4)
    );
    if let (Some(f), Some(p)) = (stats.f_statistic, stats.f_p_value) {
        let _ = writeln!(
            out,
            "F-statistic: {f:.3} on {} and {} DF, p-value: {}",
            stats.n_terms - 1,
            stats.residual_df,
            p_value(Some(p))
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Analysis of Variance Table");
    let _ = writeln!(
        out,
        "{:<12} {:>4} {:>12} {:>12} {:>9} {:>10}",
        "Source", "Df", "Sum Sq", "Mean Sq", "F value", "Pr(>F)"
    );
    for row in &fit.anova.rows {
        let _ = writeln!(
            out,
            "{:<12} {:>4} {:>12.4} {:>12.4} {:>9} {:>10}",
            row.source.to_string(),
            row.df,
            row.sum_of_squares,
            row.mean_square,
            optional(row.f_ratio, 3),
            p_value(row.p_value)
        );
    }
    out
}

/// Stationary point, eigen-analysis and classification.
#[must_use]
pub fn summarize_canonical(report: &CanonicalReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Canonical analysis of {}", report.response);
    let _ = writeln!(out);
    let _ = writeln!(out, "Stationary point:");
    for row in get_stationary_point(report, true) {
        match row.natural_value {
            Some(natural) => {
                let _ = writeln!(
                    out,
                    "  {:<10} coded {:>10.4}   natural {:>12.4}",
                    row.factor, row.coded_value, natural
                );
            }
            None => {
                let _ = writeln!(out, "  {:<10} coded {:>10.4}", row.factor, row.coded_value);
            }
        }
    }
    let _ = writeln!(
        out,
        "Predicted {} at stationary point: {:.4}",
        report.response, report.predicted_response
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Eigenanalysis of the Hessian:");
    for (i, value) in report.eigenvalues.iter().enumerate() {
        let vector: Vec<String> = report
            .eigenvectors
            .column(i)
            .iter()
            .map(|v| format!("{v:.4}"))
            .collect();
        let _ = writeln!(out, "  λ{} = {value:>10.4}   [{}]", i + 1, vector.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Surface type: {}", report.surface_type);
    out
}

/// Table of path points.
#[must_use]
pub fn summarize_path(report: &SteepestPathReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Steepest {} path for {} ({} points)",
        report.direction,
        report.response,
        report.path.len()
    );
    let _ = writeln!(out, "Gradient at start: {:.4}", report.gradient_at_start);
    let _ = writeln!(out, "Unit direction:    {:.4}", report.unit_direction);
    let _ = writeln!(out);

    let mut header = format!("{:>4} {:>8}", "Step", "Dist");
    for factor in &report.factors {
        let _ = write!(header, " {factor:>10}");
    }
    let _ = write!(header, " {:>12}", report.response);
    let _ = writeln!(out, "{header}");
    for step in &report.path {
        let _ = write!(out, "{:>4} {:>8.3}", step.step, step.distance);
        for x in &step.coordinates {
            let _ = write!(out, " {x:>10.4}");
        }
        let _ = writeln!(out, " {:>12.4}", step.predicted_response);
    }
    out
}

/// Best grid settings.
#[must_use]
pub fn summarize_optimization(result: &OptimizationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Grid search ({}) for {} over {} points",
        result.objective, result.response, result.evaluated
    );
    for (i, factor) in result.factors.iter().enumerate() {
        let coded = result.coded[i];
        match &result.natural {
            Some(natural) => {
                let _ = writeln!(
                    out,
                    "  {factor:<10} coded {coded:>10.4}   natural {:>12.4}",
                    natural[i]
                );
            }
            None => {
                let _ = writeln!(out, "  {factor:<10} coded {coded:>10.4}");
            }
        }
    }
    let _ = writeln!(
        out,
        "Predicted {}: {:.4}",
        result.response, result.predicted_response
    );
    out
}

/// One factor of a stationary point, flattened for tabular output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationaryPointRow {
    /// Factor name.
    pub factor: String,
    /// Coded coordinate.
    pub coded_value: f64,
    /// Natural coordinate, when requested and available.
    pub natural_value: Option<f64>,
    /// Predicted response at the stationary point (same on every row).
    pub predicted_response: f64,
    /// Surface classification (same on every row).
    pub surface_type: SurfaceType,
}

/// Project a canonical report into one row per factor.
///
/// Natural values are filled only when `include_natural` is set and the
/// report carries natural coordinates.
#[must_use]
pub fn get_stationary_point(
    report: &CanonicalReport,
    include_natural: bool,
) -> Vec<StationaryPointRow> {
    let natural = report
        .stationary_point_natural
        .as_ref()
        .filter(|_| include_natural);
    report
        .factors
        .iter()
        .enumerate()
        .map(|(i, factor)| StationaryPointRow {
            factor: factor.clone(),
            coded_value: report.stationary_point[i],
            natural_value: natural.map(|n| n[i]),
            predicted_response: report.predicted_response,
            surface_type: report.surface_type,
        })
        .collect()
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{v:.precision$}"))
}

fn p_value(value: Option<f64>) -> String {
    match value {
        Some(p) if p < 1e-4 => "<1e-04".to_string(),
        Some(p) => format!("{p:.4}"),
        None => "NA".to_string(),
    }
}
