//! Conversion between natural and coded factor scales.
//!
//! Each factor carries a [`Levels`] triple `(low, center, high)` in natural
//! units. The coded value of a natural setting `v` is
//!
//! ```text
//! coded = (v - center) / ((high - low) / 2)
//! ```
//!
//! so `low` and `high` map to -1 and +1 when `center` is the midpoint.
//!
//! # Example
//!
//! ```
//! use rsm::coding::{Encoding, Levels};
//!
//! let encoding = Encoding::new()
//!     .with("P", Levels::new(18.0, 180.0, 342.0).unwrap())
//!     .with("S", Levels::new(6.0, 60.0, 114.0).unwrap());
//!
//! let factors = ["P".to_string(), "S".to_string()];
//! let coded = encoding.encode_point(&factors, &[342.0, 6.0]).unwrap();
//! assert_eq!(coded, vec![1.0, -1.0]);
//! ```

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Natural-scale levels of a single factor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Levels {
    low: f64,
    center: f64,
    high: f64,
}

impl Levels {
    /// Create levels from an explicit `(low, center, high)` triple.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is not finite, if `low >= high`, or if
    /// `center` lies outside `[low, high]`.
    pub fn new(low: f64, center: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && center.is_finite() && high.is_finite()) {
            return Err(Error::invalid_params("factor levels must be finite"));
        }
        if low >= high {
            return Err(Error::invalid_params(format!(
                "low level {low} must be below high level {high}"
            )));
        }
        if center < low || center > high {
            return Err(Error::invalid_params(format!(
                "center level {center} must lie within [{low}, {high}]"
            )));
        }
        Ok(Self { low, center, high })
    }

    /// Create levels whose center is the midpoint of `low` and `high`.
    pub fn symmetric(low: f64, high: f64) -> Result<Self> {
        Self::new(low, (low + high) / 2.0, high)
    }

    /// Low level in natural units.
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Center level in natural units.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.center
    }

    /// High level in natural units.
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Half of the `high - low` span; one coded unit in natural units.
    #[must_use]
    pub fn half_range(&self) -> f64 {
        (self.high - self.low) / 2.0
    }

    /// Natural to coded.
    #[must_use]
    pub fn encode(&self, natural: f64) -> f64 {
        (natural - self.center) / self.half_range()
    }

    /// Coded to natural.
    #[must_use]
    pub fn decode(&self, coded: f64) -> f64 {
        self.center + coded * self.half_range()
    }
}

/// Per-factor natural-scale levels, keyed by factor name.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Encoding {
    levels: BTreeMap<String, Levels>,
}

impl Encoding {
    /// Create an empty encoding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the levels of a factor.
    #[must_use]
    pub fn with(mut self, factor: impl Into<String>, levels: Levels) -> Self {
        self.insert(factor, levels);
        self
    }

    /// Add or replace the levels of a factor in place.
    pub fn insert(&mut self, factor: impl Into<String>, levels: Levels) {
        self.levels.insert(factor.into(), levels);
    }

    /// Levels of a factor, if known.
    #[must_use]
    pub fn get(&self, factor: &str) -> Option<&Levels> {
        self.levels.get(factor)
    }

    /// Number of encoded factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no factor has levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Whether every listed factor has levels.
    #[must_use]
    pub fn covers(&self, factors: &[String]) -> bool {
        factors.iter().all(|f| self.levels.contains_key(f))
    }

    /// Iterate over `(factor, levels)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Levels)> {
        self.levels.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, factor: &str) -> Result<&Levels> {
        self.levels
            .get(factor)
            .ok_or_else(|| Error::MissingEncoding(factor.to_string()))
    }

    /// Encode a natural-scale value of one factor.
    pub fn encode(&self, factor: &str, natural: f64) -> Result<f64> {
        Ok(self.require(factor)?.encode(natural))
    }

    /// Decode a coded value of one factor.
    pub fn decode(&self, factor: &str, coded: f64) -> Result<f64> {
        Ok(self.require(factor)?.decode(coded))
    }

    /// Encode a point whose coordinates are ordered like `factors`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the lengths differ and
    /// `MissingEncoding` if a factor has no levels.
    pub fn encode_point(&self, factors: &[String], natural: &[f64]) -> Result<Vec<f64>> {
        check_len(factors, natural)?;
        factors
            .iter()
            .zip(natural)
            .map(|(f, &v)| self.encode(f, v))
            .collect()
    }

    /// Decode a point whose coordinates are ordered like `factors`.
    pub fn decode_point(&self, factors: &[String], coded: &[f64]) -> Result<Vec<f64>> {
        check_len(factors, coded)?;
        factors
            .iter()
            .zip(coded)
            .map(|(f, &v)| self.decode(f, v))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Levels)> for Encoding {
    fn from_iter<I: IntoIterator<Item = (S, Levels)>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn check_len(factors: &[String], values: &[f64]) -> Result<()> {
    if factors.len() == values.len() {
        Ok(())
    } else {
        Err(Error::dimension_mismatch(
            format!("{} coordinates", factors.len()),
            format!("{} coordinates", values.len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soy_encoding() -> Encoding {
        Encoding::new()
            .with("P", Levels::new(18.0, 180.0, 342.0).unwrap())
            .with("S", Levels::new(6.0, 60.0, 114.0).unwrap())
    }

    #[test]
    fn test_levels_validation() {
        assert!(Levels::new(1.0, 2.0, 3.0).is_ok());
        assert!(Levels::new(3.0, 2.0, 1.0).is_err());
        assert!(Levels::new(1.0, 1.0, 1.0).is_err());
        assert!(Levels::new(1.0, 5.0, 3.0).is_err());
        assert!(Levels::new(f64::NAN, 2.0, 3.0).is_err());

        let sym = Levels::symmetric(10.0, 30.0).unwrap();
        assert_eq!(sym.center(), 20.0);
        assert_eq!(sym.half_range(), 10.0);
    }

    #[test]
    fn test_encode_design_levels() {
        let p = Levels::new(18.0, 180.0, 342.0).unwrap();
        assert_eq!(p.encode(18.0), -1.0);
        assert_eq!(p.encode(180.0), 0.0);
        assert_eq!(p.encode(342.0), 1.0);
        assert_eq!(p.decode(0.5), 261.0);
    }

    #[test]
    fn test_round_trip() {
        let encoding = soy_encoding();
        for &v in &[-3.7, 0.0, 18.0, 99.125, 250.0, 1000.0] {
            let back = encoding
                .decode("P", encoding.encode("P", v).unwrap())
                .unwrap();
            assert!((back - v).abs() < 1e-10);
        }
        for &c in &[-1.68, -1.0, 0.0, 0.3, 1.68, 4.0] {
            let back = encoding
                .encode("S", encoding.decode("S", c).unwrap())
                .unwrap();
            assert!((back - c).abs() < 1e-10);
        }
    }

    #[test]
    fn test_point_conversion() {
        let encoding = soy_encoding();
        let factors = vec!["P".to_string(), "S".to_string()];

        let natural = encoding.decode_point(&factors, &[0.0, 1.0]).unwrap();
        assert_eq!(natural, vec![180.0, 114.0]);

        let err = encoding.encode_point(&factors, &[1.0]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));

        let factors = vec!["P".to_string(), "K".to_string()];
        let err = encoding.decode_point(&factors, &[0.0, 0.0]).unwrap_err();
        assert_eq!(err, Error::MissingEncoding("K".to_string()));
        assert!(!encoding.covers(&factors));
    }

    #[test]
    fn test_from_iterator() {
        let encoding: Encoding = vec![("A", Levels::symmetric(0.0, 2.0).unwrap())]
            .into_iter()
            .collect();
        assert_eq!(encoding.len(), 1);
        assert_eq!(encoding.encode("A", 2.0).unwrap(), 1.0);
    }
}
