//! Analysis of fitted response surfaces.
//!
//! This module turns a [`FittedSurfaceModel`](crate::model::FittedSurfaceModel)
//! into actionable answers:
//! - Coefficient extraction into the quadratic form `β0 + bᵀx + xᵀBx`
//! - Canonical analysis: stationary point, Hessian eigendecomposition and
//!   surface classification
//! - Steepest ascent/descent paths from any coded start point
//!
//! Every function is a pure computation over its arguments. Coordinates are
//! coded; natural-scale values are added whenever the model carries an
//! [`Encoding`](crate::coding::Encoding) for every factor.
//!
//! ## Quick Start
//!
//! ```rust
//! use rsm::model::{FittedSurfaceModel, ModelOrder, Term, TermKind};
//! use rsm::surface::{canonical_analysis, steepest_path, PathConfig, SurfaceType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = FittedSurfaceModel::new(
//!     "yield",
//!     vec!["P".into(), "S".into()],
//!     ModelOrder::Quadratic,
//!     vec![
//!         Term::new(TermKind::Intercept, 50.0),
//!         Term::new(TermKind::Linear(0), 4.0),
//!         Term::new(TermKind::Linear(1), 2.0),
//!         Term::new(TermKind::Interaction(0, 1), 1.0),
//!         Term::new(TermKind::Squared(0), -5.0),
//!         Term::new(TermKind::Squared(1), -3.0),
//!     ],
//! )?;
//!
//! let canonical = canonical_analysis(&model)?;
//! assert_eq!(canonical.surface_type, SurfaceType::Maximum);
//!
//! let path = steepest_path(&model, &PathConfig::default())?;
//! assert_eq!(path.path[0].distance, 0.0);
//! # Ok(())
//! # }
//! ```

mod canonical;
mod coefficients;
mod steepest;
mod types;

pub use canonical::canonical_analysis;
pub use coefficients::{extract_coefficients, extract_quadratic, QuadraticForm};
pub use steepest::{gradient_at, steepest_path};
pub use types::{
    CanonicalReport, Direction, PathConfig, PathStep, SteepestPathReport, SurfaceType,
};
