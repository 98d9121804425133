//! Parallel grid search using Rayon.
//!
//! Enable with the `parallel` feature flag.
//!
//! # Usage
//!
//! ```ignore
//! use rsm::optimize::GridSearchConfig;
//! use rsm::parallel::par_get_optimal_factors;
//!
//! let best = par_get_optimal_factors(&model, &GridSearchConfig::default())?;
//! ```
//!
//! # Performance
//!
//! The grid grows as `resolution^k`, so the parallel search pays off for
//! three or more factors or fine resolutions. For the default two-factor
//! 50 × 50 grid the sequential version is just as fast.

use rayon::prelude::*;

use crate::error::Result;
use crate::model::FittedSurfaceModel;
use crate::optimize::{finish, GridSearchConfig, Grid, Objective, OptimizationResult};

/// Parallel version of [`get_optimal_factors`](crate::optimize::get_optimal_factors).
///
/// Returns exactly the same point: ties are broken by grid order, so the
/// result does not depend on how the work is split.
///
/// # Errors
///
/// Same as [`get_optimal_factors`](crate::optimize::get_optimal_factors).
pub fn par_get_optimal_factors(
    model: &FittedSurfaceModel,
    config: &GridSearchConfig,
) -> Result<OptimizationResult> {
    let grid = Grid::new(model, config)?;
    let objective = config.objective;

    let best = (0..grid.len())
        .into_par_iter()
        .map(|index| model.predict(&grid.point(index)).map(|value| (index, value)))
        .try_reduce_with(|a, b| Ok(pick(objective, a, b)));

    // A grid always has at least one point.
    let (index, value) = match best {
        Some(best) => best?,
        None => (0, model.predict(&grid.point(0))?),
    };
    Ok(finish(model, objective, &grid, index, value))
}

fn pick(objective: Objective, a: (usize, f64), b: (usize, f64)) -> (usize, f64) {
    let (first, second) = if a.0 <= b.0 { (a, b) } else { (b, a) };
    if objective.improves(second.1, first.1) {
        second
    } else {
        first
    }
}
