//! Experimental designs for fitting response surfaces.
//!
//! The builder produces central composite designs (CCD): a two-level full
//! factorial, a star of axial runs at distance α on each axis, and replicated
//! center runs. [`three_level_factorial`] produces the 3^k grid used by
//! small fertility trials.
//!
//! # Example
//!
//! ```
//! use rsm::design::{Alpha, CcdBuilder};
//!
//! let design = CcdBuilder::new()
//!     .factors(2)
//!     .alpha(Alpha::Rotatable)
//!     .center_points(5)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(design.runs(), 13); // 4 factorial + 4 axial + 5 center
//! assert!((design.alpha() - 2f64.sqrt()).abs() < 1e-12);
//! ```

use ndarray::{Array2, ArrayView2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coding::Encoding;
use crate::data::Experiment;
use crate::error::{Error, Result};

/// Distance of the axial runs from the center, in coded units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Alpha {
    /// α = (2^k)^(1/4), giving constant prediction variance at equal radius.
    #[default]
    Rotatable,
    /// α = 1, axial runs on the faces of the factorial cube.
    FaceCentered,
    /// An explicit positive distance.
    Custom(f64),
}

impl Alpha {
    /// Numeric α for `k` factors.
    #[must_use]
    pub fn value(self, k: usize) -> f64 {
        match self {
            Self::Rotatable => 2f64.powf(k as f64 / 4.0),
            Self::FaceCentered => 1.0,
            Self::Custom(a) => a,
        }
    }
}

/// Role of a run within a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointKind {
    /// Corner or grid run of a factorial portion.
    Factorial,
    /// Star run on one axis.
    Axial,
    /// Run at the design center.
    Center,
}

/// A coded experimental design.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Design {
    factors: Vec<String>,
    points: Array2<f64>,
    kinds: Vec<PointKind>,
    alpha: f64,
}

impl Design {
    /// Factor names.
    #[must_use]
    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    /// Coded run matrix (runs × factors).
    #[must_use]
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Role of each run.
    #[must_use]
    pub fn kinds(&self) -> &[PointKind] {
        &self.kinds
    }

    /// Axial distance, or 1 for designs without axial runs.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of runs.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.points.nrows()
    }

    /// Number of factors.
    #[must_use]
    pub fn k(&self) -> usize {
        self.factors.len()
    }

    /// Run matrix converted to natural units.
    ///
    /// # Errors
    ///
    /// Returns `MissingEncoding` if a factor has no levels.
    pub fn to_natural(&self, encoding: &Encoding) -> Result<Array2<f64>> {
        let mut natural = self.points.clone();
        for (j, name) in self.factors.iter().enumerate() {
            let levels = encoding
                .get(name)
                .ok_or_else(|| Error::MissingEncoding(name.clone()))?;
            natural.column_mut(j).mapv_inplace(|c| levels.decode(c));
        }
        Ok(natural)
    }

    /// Pair the design with observed responses.
    pub fn into_experiment(
        self,
        response_name: impl Into<String>,
        response: Vec<f64>,
    ) -> Result<Experiment> {
        Experiment::from_coded(self.factors, self.points, response_name, response)
    }
}

/// Builder for central composite designs.
#[derive(Debug, Clone, Default)]
pub struct CcdBuilder {
    factors: Option<usize>,
    names: Option<Vec<String>>,
    alpha: Alpha,
    center_points: Option<usize>,
}

impl CcdBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of factors; names default to `x1..xk`.
    #[must_use]
    pub fn factors(mut self, factors: usize) -> Self {
        self.factors = Some(factors);
        self
    }

    /// Set factor names; also sets the number of factors.
    #[must_use]
    pub fn names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.factors = Some(names.len());
        self.names = Some(names);
        self
    }

    /// Set the axial distance. Defaults to [`Alpha::Rotatable`].
    #[must_use]
    pub fn alpha(mut self, alpha: Alpha) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the number of center runs. Defaults to 1.
    #[must_use]
    pub fn center_points(mut self, n: usize) -> Self {
        self.center_points = Some(n);
        self
    }

    /// Build the design.
    ///
    /// Runs are ordered factorial (standard order, first factor varying
    /// fastest), then axial (`-α`, `+α` for each factor in turn), then center.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two factors are requested, α is not a
    /// positive finite number, or the factorial portion would not fit in
    /// memory.
    pub fn build(self) -> Result<Design> {
        let k = self
            .factors
            .ok_or_else(|| Error::invalid_params("number of factors must be specified"))?;
        let factors = resolve_names(self.names, k)?;
        let alpha = self.alpha.value(k);
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(Error::invalid_params(format!(
                "axial distance must be positive, got {alpha}"
            )));
        }
        let center_points = self.center_points.unwrap_or(1);

        let corners = u32::try_from(k)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .ok_or_else(|| Error::invalid_params(format!("2^{k} factorial runs overflow")))?;
        let runs = corners + 2 * k + center_points;

        let mut points = Array2::<f64>::zeros((runs, k));
        let mut kinds = Vec::with_capacity(runs);

        for r in 0..corners {
            for j in 0..k {
                points[[r, j]] = if (r >> j) & 1 == 1 { 1.0 } else { -1.0 };
            }
            kinds.push(PointKind::Factorial);
        }
        for j in 0..k {
            let r = corners + 2 * j;
            points[[r, j]] = -alpha;
            points[[r + 1, j]] = alpha;
            kinds.push(PointKind::Axial);
            kinds.push(PointKind::Axial);
        }
        kinds.extend(std::iter::repeat(PointKind::Center).take(center_points));

        log::debug!(
            "built central composite design: k={k}, alpha={alpha:.4}, runs={runs}"
        );

        Ok(Design {
            factors,
            points,
            kinds,
            alpha,
        })
    }
}

/// Full three-level factorial on the coded levels {-1, 0, +1}.
///
/// Runs are in standard order with the first factor varying fastest.
///
/// # Example
///
/// ```
/// use rsm::design::three_level_factorial;
///
/// let design = three_level_factorial(["P", "S"]).unwrap();
/// assert_eq!(design.runs(), 9);
/// assert_eq!(design.points().row(1).to_vec(), vec![0.0, -1.0]);
/// ```
pub fn three_level_factorial<S: Into<String>>(
    names: impl IntoIterator<Item = S>,
) -> Result<Design> {
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    let k = names.len();
    let factors = resolve_names(Some(names), k)?;
    let runs = 3usize
        .checked_pow(k as u32)
        .ok_or_else(|| Error::invalid_params(format!("3^{k} factorial runs overflow")))?;

    let mut points = Array2::<f64>::zeros((runs, k));
    for r in 0..runs {
        let mut rest = r;
        for j in 0..k {
            points[[r, j]] = (rest % 3) as f64 - 1.0;
            rest /= 3;
        }
    }
    let kinds = (0..runs)
        .map(|r| {
            if points.row(r).iter().all(|&v| v == 0.0) {
                PointKind::Center
            } else {
                PointKind::Factorial
            }
        })
        .collect();

    Ok(Design {
        factors,
        points,
        kinds,
        alpha: 1.0,
    })
}

fn resolve_names(names: Option<Vec<String>>, k: usize) -> Result<Vec<String>> {
    if k < 2 {
        return Err(Error::invalid_params(format!(
            "a response surface design needs at least 2 factors, got {k}"
        )));
    }
    let names = names.unwrap_or_else(|| (1..=k).map(|i| format!("x{i}")).collect());
    if names.len() != k {
        return Err(Error::dimension_mismatch(
            format!("{k} factor names"),
            format!("{} factor names", names.len()),
        ));
    }
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(Error::invalid_params(format!(
                "factor `{name}` is listed more than once"
            )));
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::Levels;

    #[test]
    fn test_rotatable_alpha() {
        assert!((Alpha::Rotatable.value(2) - 1.414_213_562_373_095).abs() < 1e-12);
        assert!((Alpha::Rotatable.value(3) - 1.681_792_830_507_429).abs() < 1e-12);
        assert_eq!(Alpha::FaceCentered.value(5), 1.0);
        assert_eq!(Alpha::Custom(1.5).value(2), 1.5);
    }

    #[test]
    fn test_ccd_layout() {
        let design = CcdBuilder::new()
            .factors(3)
            .center_points(6)
            .build()
            .unwrap();

        assert_eq!(design.runs(), 8 + 6 + 6);
        assert_eq!(design.k(), 3);
        assert_eq!(design.factors(), &["x1", "x2", "x3"]);

        // Standard order: first factor varies fastest.
        assert_eq!(design.points().row(0).to_vec(), vec![-1.0, -1.0, -1.0]);
        assert_eq!(design.points().row(1).to_vec(), vec![1.0, -1.0, -1.0]);
        assert_eq!(design.points().row(7).to_vec(), vec![1.0, 1.0, 1.0]);

        let a = design.alpha();
        assert_eq!(design.points().row(8).to_vec(), vec![-a, 0.0, 0.0]);
        assert_eq!(design.points().row(13).to_vec(), vec![0.0, 0.0, a]);

        let centers = design
            .kinds()
            .iter()
            .filter(|&&k| k == PointKind::Center)
            .count();
        assert_eq!(centers, 6);
        assert_eq!(design.kinds()[8], PointKind::Axial);
    }

    #[test]
    fn test_ccd_validation() {
        assert!(CcdBuilder::new().build().is_err());
        assert!(CcdBuilder::new().factors(1).build().is_err());
        assert!(CcdBuilder::new()
            .factors(2)
            .alpha(Alpha::Custom(0.0))
            .build()
            .is_err());
        assert!(CcdBuilder::new().names(["A", "A"]).build().is_err());
    }

    #[test]
    fn test_three_level_factorial() {
        let design = three_level_factorial(["P", "S"]).unwrap();
        assert_eq!(design.runs(), 9);
        assert_eq!(design.points().row(0).to_vec(), vec![-1.0, -1.0]);
        assert_eq!(design.points().row(4).to_vec(), vec![0.0, 0.0]);
        assert_eq!(design.points().row(8).to_vec(), vec![1.0, 1.0]);
        assert_eq!(design.kinds()[4], PointKind::Center);
    }

    #[test]
    fn test_to_natural() {
        let design = three_level_factorial(["P", "S"]).unwrap();
        let encoding = Encoding::new()
            .with("P", Levels::new(18.0, 180.0, 342.0).unwrap())
            .with("S", Levels::new(6.0, 60.0, 114.0).unwrap());
        let natural = design.to_natural(&encoding).unwrap();
        assert_eq!(natural.row(0).to_vec(), vec![18.0, 6.0]);
        assert_eq!(natural.row(8).to_vec(), vec![342.0, 114.0]);

        let partial = Encoding::new().with("P", Levels::symmetric(0.0, 1.0).unwrap());
        assert!(design.to_natural(&partial).is_err());
    }

    #[test]
    fn test_into_experiment() {
        let design = CcdBuilder::new().names(["A", "B"]).build().unwrap();
        let runs = design.runs();
        let experiment = design.into_experiment("y", vec![0.0; runs]).unwrap();
        assert_eq!(experiment.runs(), 9);
    }
}
