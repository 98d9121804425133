//! Grid search for the best predicted response.
//!
//! The fitted model is evaluated on a regular grid inside per-factor coded
//! bounds. The first factor varies fastest; when two grid points predict the
//! same value the one visited first wins.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::FittedSurfaceModel;

/// What to look for on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Objective {
    /// Largest predicted response.
    #[default]
    Maximize,
    /// Smallest predicted response.
    Minimize,
}

impl Objective {
    /// Whether `candidate` strictly improves on `incumbent`.
    #[must_use]
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Maximize => candidate > incumbent,
            Self::Minimize => candidate < incumbent,
        }
    }
}

impl FromStr for Objective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "maximize" | "maximise" => Ok(Self::Maximize),
            "min" | "minimize" | "minimise" => Ok(Self::Minimize),
            _ => Err(Error::InvalidObjective(s.to_string())),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Maximize => f.write_str("maximize"),
            Self::Minimize => f.write_str("minimize"),
        }
    }
}

/// Configuration for [`get_optimal_factors`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSearchConfig {
    /// Maximize or minimize (default: maximize).
    pub objective: Objective,
    /// Coded `(low, high)` per factor; `None` uses
    /// `±DEFAULT_BOUND` for every factor.
    pub bounds: Option<Vec<(f64, f64)>>,
    /// Grid points per axis, both bounds included (default: 50).
    pub resolution: usize,
}

impl GridSearchConfig {
    /// Default coded half-width, the rotatable α of a three-factor CCD.
    pub const DEFAULT_BOUND: f64 = 1.68;
    /// Default grid points per axis.
    pub const DEFAULT_RESOLUTION: usize = 50;

    /// Default configuration with the given objective.
    #[must_use]
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            ..Self::default()
        }
    }
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            objective: Objective::Maximize,
            bounds: None,
            resolution: Self::DEFAULT_RESOLUTION,
        }
    }
}

/// Best grid point found by [`get_optimal_factors`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationResult {
    /// Response name.
    pub response: String,
    /// Factor names.
    pub factors: Vec<String>,
    /// Objective that was applied.
    pub objective: Objective,
    /// Best coded settings.
    pub coded: Array1<f64>,
    /// Best natural settings, when every factor is encoded.
    pub natural: Option<Array1<f64>>,
    /// Predicted response at `coded`.
    pub predicted_response: f64,
    /// Number of grid points evaluated.
    pub evaluated: usize,
}

/// A validated search grid.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    bounds: Vec<(f64, f64)>,
    resolution: usize,
    len: usize,
}

impl Grid {
    pub(crate) fn new(model: &FittedSurfaceModel, config: &GridSearchConfig) -> Result<Self> {
        let k = model.k();
        let bounds = match &config.bounds {
            Some(bounds) => {
                if bounds.len() != k {
                    return Err(Error::dimension_mismatch(
                        format!("{k} bounds"),
                        format!("{} bounds", bounds.len()),
                    ));
                }
                if let Some((lo, hi)) = bounds
                    .iter()
                    .find(|(lo, hi)| !(lo.is_finite() && hi.is_finite() && lo <= hi))
                {
                    return Err(Error::invalid_params(format!(
                        "grid bounds must be finite with low <= high, got ({lo}, {hi})"
                    )));
                }
                bounds.clone()
            }
            None => vec![
                (-GridSearchConfig::DEFAULT_BOUND, GridSearchConfig::DEFAULT_BOUND);
                k
            ],
        };
        if config.resolution < 2 {
            return Err(Error::invalid_params(format!(
                "grid resolution must be at least 2, got {}",
                config.resolution
            )));
        }
        let len = u32::try_from(k)
            .ok()
            .and_then(|k| config.resolution.checked_pow(k))
            .ok_or_else(|| {
                Error::invalid_params(format!(
                    "a {}-point grid over {k} factors is too large",
                    config.resolution
                ))
            })?;
        Ok(Self {
            bounds,
            resolution: config.resolution,
            len,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Coordinates of the grid point with linear index `index`.
    pub(crate) fn point(&self, mut index: usize) -> Vec<f64> {
        let last = (self.resolution - 1) as f64;
        self.bounds
            .iter()
            .map(|&(lo, hi)| {
                let digit = index % self.resolution;
                index /= self.resolution;
                lo + (hi - lo) * digit as f64 / last
            })
            .collect()
    }
}

/// Evaluate the model over a grid and return the best point.
///
/// # Errors
///
/// Returns `DimensionMismatch` if explicit bounds do not match the factor
/// count, or `InvalidParams` for bad bounds, a resolution below 2, or a grid
/// too large to index.
///
/// # Example
///
/// ```
/// use rsm::model::{FittedSurfaceModel, ModelOrder, Term, TermKind};
/// use rsm::optimize::{get_optimal_factors, GridSearchConfig, Objective};
///
/// // y = 5 - A² - B², best at the origin
/// let model = FittedSurfaceModel::new(
///     "y",
///     vec!["A".into(), "B".into()],
///     ModelOrder::Quadratic,
///     vec![
///         Term::new(TermKind::Intercept, 5.0),
///         Term::new(TermKind::Squared(0), -1.0),
///         Term::new(TermKind::Squared(1), -1.0),
///     ],
/// )
/// .unwrap();
///
/// let config = GridSearchConfig {
///     resolution: 21,
///     ..GridSearchConfig::new(Objective::Maximize)
/// };
/// let best = get_optimal_factors(&model, &config).unwrap();
/// assert!(best.coded.iter().all(|x| x.abs() < 1e-12));
/// assert!((best.predicted_response - 5.0).abs() < 1e-12);
/// ```
pub fn get_optimal_factors(
    model: &FittedSurfaceModel,
    config: &GridSearchConfig,
) -> Result<OptimizationResult> {
    let grid = Grid::new(model, config)?;

    let mut best_index = 0;
    let mut best_value = model.predict(&grid.point(0))?;
    for index in 1..grid.len() {
        let value = model.predict(&grid.point(index))?;
        if config.objective.improves(value, best_value) {
            best_index = index;
            best_value = value;
        }
    }

    Ok(finish(model, config.objective, &grid, best_index, best_value))
}

pub(crate) fn finish(
    model: &FittedSurfaceModel,
    objective: Objective,
    grid: &Grid,
    index: usize,
    value: f64,
) -> OptimizationResult {
    let coded = grid.point(index);
    let natural = model.to_natural(&coded).map(Array1::from);
    log::debug!(
        "grid search ({objective}) over {} points for `{}`: best {value:.4} at {coded:?}",
        grid.len(),
        model.response()
    );
    OptimizationResult {
        response: model.response().to_string(),
        factors: model.factors().to_vec(),
        objective,
        coded: Array1::from(coded),
        natural,
        predicted_response: value,
        evaluated: grid.len(),
    }
}
