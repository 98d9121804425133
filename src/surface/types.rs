//! Report and configuration types for surface analysis.

use std::fmt;

use ndarray::{Array1, Array2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Curvature classification of a second-order surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SurfaceType {
    /// Every Hessian eigenvalue is negative.
    Maximum,
    /// Every Hessian eigenvalue is positive.
    Minimum,
    /// Mixed signs, or at least one eigenvalue exactly zero.
    SaddlePoint,
}

impl SurfaceType {
    /// Classify from eigenvalue signs alone.
    ///
    /// A zero eigenvalue is neither negative nor positive, so ridge surfaces
    /// are reported as [`SurfaceType::SaddlePoint`].
    #[must_use]
    pub fn classify(eigenvalues: &[f64]) -> Self {
        if eigenvalues.iter().all(|&l| l < 0.0) {
            Self::Maximum
        } else if eigenvalues.iter().all(|&l| l > 0.0) {
            Self::Minimum
        } else {
            Self::SaddlePoint
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Maximum => "Maximum",
            Self::Minimum => "Minimum",
            Self::SaddlePoint => "Saddle point",
        };
        f.write_str(name)
    }
}

/// Result of canonical analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CanonicalReport {
    /// Response name.
    pub response: String,
    /// Factor names; index `i` of every vector below refers to `factors[i]`.
    pub factors: Vec<String>,
    /// Stationary point in coded units.
    pub stationary_point: Array1<f64>,
    /// Stationary point in natural units, when every factor is encoded.
    pub stationary_point_natural: Option<Array1<f64>>,
    /// Fitted response at the stationary point.
    pub predicted_response: f64,
    /// Hessian `2B`.
    pub hessian: Array2<f64>,
    /// Hessian eigenvalues in descending order.
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors as columns, aligned with `eigenvalues`.
    pub eigenvectors: Array2<f64>,
    /// Classification from the eigenvalue signs.
    pub surface_type: SurfaceType,
}

impl CanonicalReport {
    /// Largest distance of the stationary point from the design center
    /// along any single factor, in coded units.
    #[must_use]
    pub fn max_coded_extent(&self) -> f64 {
        self.stationary_point
            .iter()
            .fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }
}

/// Direction of travel along the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Move along the gradient (increasing response).
    #[default]
    Ascent,
    /// Move against the gradient (decreasing response).
    Descent,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascent => f.write_str("ascent"),
            Self::Descent => f.write_str("descent"),
        }
    }
}

/// Configuration for [`steepest_path`](super::steepest_path).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathConfig {
    /// Coded start point; `None` starts at the design center.
    pub start_point: Option<Vec<f64>>,
    /// Ascent or descent (default: ascent).
    pub direction: Direction,
    /// Number of recorded points, the start included (default: 10).
    pub n_steps: usize,
    /// Coded distance between consecutive points (default: 0.1).
    pub step_size: f64,
}

impl PathConfig {
    /// Default number of recorded points.
    pub const DEFAULT_STEPS: usize = 10;
    /// Default coded step length.
    pub const DEFAULT_STEP_SIZE: f64 = 0.1;
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            start_point: None,
            direction: Direction::Ascent,
            n_steps: Self::DEFAULT_STEPS,
            step_size: Self::DEFAULT_STEP_SIZE,
        }
    }
}

/// One point on a steepest path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathStep {
    /// Zero-based index along the path.
    pub step: usize,
    /// Coded distance from the start point.
    pub distance: f64,
    /// Coded coordinates.
    pub coordinates: Array1<f64>,
    /// Natural coordinates, when every factor is encoded.
    pub natural: Option<Array1<f64>>,
    /// Fitted response at `coordinates`.
    pub predicted_response: f64,
}

/// Result of a steepest ascent or descent search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SteepestPathReport {
    /// Response name.
    pub response: String,
    /// Factor names.
    pub factors: Vec<String>,
    /// Coded start point.
    pub start_point: Array1<f64>,
    /// Direction of travel.
    pub direction: Direction,
    /// Gradient evaluated at the start point.
    pub gradient_at_start: Array1<f64>,
    /// Unit vector followed by the whole path.
    pub unit_direction: Array1<f64>,
    /// Recorded points, starting with `start_point`.
    pub path: Vec<PathStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(SurfaceType::classify(&[-1.0, -0.5]), SurfaceType::Maximum);
        assert_eq!(SurfaceType::classify(&[2.0, 0.1]), SurfaceType::Minimum);
        assert_eq!(SurfaceType::classify(&[2.0, -0.1]), SurfaceType::SaddlePoint);
        assert_eq!(SurfaceType::classify(&[0.0, -1.0]), SurfaceType::SaddlePoint);
        assert_eq!(SurfaceType::classify(&[0.0, 1.0]), SurfaceType::SaddlePoint);
    }

    #[test]
    fn test_path_config_default() {
        let config = PathConfig::default();
        assert_eq!(config.start_point, None);
        assert_eq!(config.direction, Direction::Ascent);
        assert_eq!(config.n_steps, 10);
        assert!((config.step_size - 0.1).abs() < f64::EPSILON);
    }
}
