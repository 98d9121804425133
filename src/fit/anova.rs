//! Sequential ANOVA for response-surface fits.
//!
//! Term groups enter in the order first-order, two-way interaction, pure
//! quadratic. Each group's sum of squares is the drop in residual SS when the
//! group is added to the terms before it. When design points are replicated
//! the residual is split into lack of fit and pure error.

use ndarray::{s, Array2, ArrayView1};

use super::ols::least_squares;
use super::stats::f_distribution_p_value;
use super::types::{AnovaRow, AnovaSource, AnovaTable};
use crate::error::Result;
use crate::model::TermKind;

/// Build the ANOVA table.
///
/// # Arguments
/// * `x` - Full model matrix, columns ordered like `terms`
/// * `terms` - Term of each column (intercept first, then grouped by kind)
/// * `y` - Observed responses
/// * `rss` - Residual SS of the full fit
/// * `replicate_groups` - Runs sharing identical settings
///
/// # Algorithm
/// 1. Total SS = Σ(yᵢ - ȳ)²
/// 2. For each present group, refit on the leading columns through that
///    group; SS = previous RSS - current RSS
/// 3. Residual row from the full fit
/// 4. Pure error = Σ within-group SS over replicate groups, lack of fit =
///    residual - pure error, when both have positive df
pub(crate) fn sequential_anova(
    x: &Array2<f64>,
    terms: &[TermKind],
    y: ArrayView1<'_, f64>,
    rss: f64,
    replicate_groups: &[Vec<usize>],
) -> Result<AnovaTable> {
    let n = y.len();
    let p = terms.len();
    let mean = y.sum() / n as f64;
    let total_ss: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let total_df = n - 1;
    let residual_df = n - p;
    let residual_ms = (residual_df > 0).then(|| rss / residual_df as f64);

    let mut rows = Vec::with_capacity(6);
    let mut previous_rss = total_ss;
    let mut end = 1;
    for source in [
        AnovaSource::FirstOrder,
        AnovaSource::TwoWayInteraction,
        AnovaSource::PureQuadratic,
    ] {
        let count = terms[end..]
            .iter()
            .take_while(|t| group_of(**t) == Some(source))
            .count();
        if count == 0 {
            continue;
        }
        end += count;
        let stage_rss = if end == p {
            rss
        } else {
            least_squares(x.slice(s![.., ..end]), y)?.rss
        };
        let ss = (previous_rss - stage_rss).max(0.0);
        previous_rss = stage_rss;
        rows.push(test_row(source, count, ss, residual_ms, residual_df));
    }

    rows.push(AnovaRow {
        source: AnovaSource::Residuals,
        df: residual_df,
        sum_of_squares: rss,
        mean_square: residual_ms.unwrap_or(0.0),
        f_ratio: None,
        p_value: None,
    });

    let pure_df: usize = replicate_groups.iter().map(|g| g.len() - 1).sum();
    if pure_df > 0 && residual_df > pure_df {
        let pure_ss: f64 = replicate_groups
            .iter()
            .filter(|g| g.len() > 1)
            .map(|g| {
                let m = g.iter().map(|&i| y[i]).sum::<f64>() / g.len() as f64;
                g.iter().map(|&i| (y[i] - m).powi(2)).sum::<f64>()
            })
            .sum();
        let lof_df = residual_df - pure_df;
        let lof_ss = (rss - pure_ss).max(0.0);
        let pure_ms = pure_ss / pure_df as f64;
        rows.push(test_row(
            AnovaSource::LackOfFit,
            lof_df,
            lof_ss,
            Some(pure_ms),
            pure_df,
        ));
        rows.push(AnovaRow {
            source: AnovaSource::PureError,
            df: pure_df,
            sum_of_squares: pure_ss,
            mean_square: pure_ms,
            f_ratio: None,
            p_value: None,
        });
    }

    Ok(AnovaTable {
        rows,
        total_ss,
        total_df,
    })
}

fn group_of(term: TermKind) -> Option<AnovaSource> {
    match term {
        TermKind::Intercept => None,
        TermKind::Linear(_) => Some(AnovaSource::FirstOrder),
        TermKind::Interaction(..) => Some(AnovaSource::TwoWayInteraction),
        TermKind::Squared(_) => Some(AnovaSource::PureQuadratic),
    }
}

fn test_row(
    source: AnovaSource,
    df: usize,
    ss: f64,
    error_ms: Option<f64>,
    error_df: usize,
) -> AnovaRow {
    let ms = ss / df as f64;
    let f_ratio = error_ms.filter(|&e| e > 0.0).map(|e| ms / e);
    AnovaRow {
        source,
        df,
        sum_of_squares: ss,
        mean_square: ms,
        f_ratio,
        p_value: f_ratio.map(|f| f_distribution_p_value(f, df, error_df)),
    }
}
