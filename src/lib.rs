//! # rsm
//!
//! Response Surface Methodology: fit low-order polynomial models to designed
//! experiments, then locate, classify and navigate the fitted surface.
//!
//! ## Overview
//!
//! A small factorial or central composite experiment is run, a second-order
//! model is fitted on coded factors, and the surface is analysed:
//! - **Canonical analysis**: stationary point, Hessian eigendecomposition and
//!   classification as maximum, minimum or saddle point
//! - **Steepest ascent/descent**: a straight path along the local gradient
//! - **Grid search**: best predicted settings inside coded bounds
//!
//! This library provides:
//! - Central composite and three-level factorial designs
//! - Natural/coded scale conversion with per-factor levels
//! - Least-squares fitting with term statistics and sequential ANOVA
//! - Structured terms, so analysis never parses coefficient names
//! - Plain-text reports over a single tagged [`Report`](report::Report) type
//!
//! ## Quick Start
//!
//! ```rust
//! use rsm::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let encoding = Encoding::new()
//!     .with("P", Levels::new(18.0, 180.0, 342.0)?)
//!     .with("S", Levels::new(6.0, 60.0, 114.0)?);
//!
//! let yields = vec![37.3, 44.8, 43.1, 40.9, 50.2, 48.7, 39.2, 49.0, 48.8];
//! let experiment = three_level_factorial(["P", "S"])?
//!     .into_experiment("yield", yields)?
//!     .with_encoding(encoding)?;
//!
//! let fit = fit_surface(&experiment, ModelOrder::Quadratic, &FitConfig::default())?;
//! let canonical = canonical_analysis(&fit.model)?;
//!
//! assert_eq!(canonical.surface_type, SurfaceType::Maximum);
//! let natural = canonical.stationary_point_natural.as_ref().unwrap();
//! assert!((natural[0] - 248.9).abs() < 0.1);
//!
//! let path = steepest_path(&fit.model, &PathConfig::default())?;
//! assert_eq!(path.path.len(), 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Coded Scale
//!
//! Every analysis works on coded factors, `(natural - center) / half_range`,
//! so the factorial runs sit at ±1. Natural-scale values are reported
//! alongside whenever the model carries levels for every factor.
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of designs, models and reports
//! - `parallel`: Enable parallel grid search using rayon

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod coding;
pub mod data;
pub mod design;
pub mod error;
pub mod fit;
mod linalg;
pub mod model;
pub mod optimize;
pub mod report;
pub mod surface;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::coding::{Encoding, Levels};
    pub use crate::data::Experiment;
    pub use crate::design::{three_level_factorial, Alpha, CcdBuilder, Design, PointKind};
    pub use crate::error::{Error, Result};
    pub use crate::fit::{fit_surface, AnovaSource, AnovaTable, FitConfig, SurfaceFit};
    pub use crate::model::{FittedSurfaceModel, ModelOrder, Term, TermKind};
    pub use crate::optimize::{
        get_optimal_factors, GridSearchConfig, Objective, OptimizationResult,
    };
    pub use crate::report::{get_stationary_point, summarize, Report, StationaryPointRow};
    pub use crate::surface::{
        canonical_analysis, steepest_path, CanonicalReport, Direction, PathConfig,
        SteepestPathReport, SurfaceType,
    };

    #[cfg(feature = "parallel")]
    pub use crate::parallel::par_get_optimal_factors;
}

// Re-export commonly used items at crate root
pub use error::{Error, Result};
pub use fit::fit_surface;
pub use optimize::get_optimal_factors;
pub use report::get_stationary_point;
pub use surface::{canonical_analysis, steepest_path};

#[cfg(feature = "parallel")]
pub use parallel::par_get_optimal_factors;
