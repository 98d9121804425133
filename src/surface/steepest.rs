//! Steepest ascent and descent paths.
//!
//! The gradient is evaluated once, at the start point, and the path follows
//! that fixed direction in equal coded steps. This is the classical
//! Box-Wilson straight-line search, not a curved gradient trajectory.

use ndarray::Array1;

use super::coefficients::extract_coefficients;
use super::types::{Direction, PathConfig, PathStep, SteepestPathReport};
use crate::error::{Error, Result};
use crate::model::FittedSurfaceModel;

/// Gradient `b + 2Bx` of the fitted surface at a coded point.
///
/// Works for every model order; linear models have a constant gradient.
///
/// # Errors
///
/// Returns `DimensionMismatch` if `point` does not have one value per
/// factor, plus every error of
/// [`extract_coefficients`](super::extract_coefficients).
pub fn gradient_at(model: &FittedSurfaceModel, point: &[f64]) -> Result<Array1<f64>> {
    check_point(model, point)?;
    let form = extract_coefficients(model)?;
    Ok(form.gradient(Array1::from(point.to_vec()).view()))
}

/// Generate a straight path along the gradient at the start point.
///
/// # Arguments
/// * `model` - Fitted surface of any order
/// * `config` - Start point, direction, step count and step size
///
/// # Returns
/// * `config.n_steps` points; point `i` lies at coded distance
///   `i * step_size` from the start, so point 0 is the start itself
///
/// # Errors
/// * `InvalidParams` if `n_steps` is zero or `step_size` is not a positive
///   finite number
/// * `DimensionMismatch` if the start point has the wrong length
/// * `ZeroGradient` if the gradient vanishes at the start point
/// * `MissingTerm` if a linear term is absent from the model
///
/// # Example
///
/// ```
/// use rsm::model::{FittedSurfaceModel, ModelOrder, Term, TermKind};
/// use rsm::surface::{steepest_path, PathConfig};
///
/// let model = FittedSurfaceModel::new(
///     "y",
///     vec!["A".into(), "B".into()],
///     ModelOrder::Linear,
///     vec![
///         Term::new(TermKind::Intercept, 10.0),
///         Term::new(TermKind::Linear(0), 3.0),
///         Term::new(TermKind::Linear(1), 4.0),
///     ],
/// )
/// .unwrap();
///
/// let report = steepest_path(&model, &PathConfig::default()).unwrap();
/// assert_eq!(report.path.len(), 10);
/// assert!((report.unit_direction[0] - 0.6).abs() < 1e-12);
/// assert!((report.unit_direction[1] - 0.8).abs() < 1e-12);
/// // Each 0.1 step gains 0.1 * |b| = 0.5 on a linear surface.
/// assert!((report.path[2].predicted_response - 11.0).abs() < 1e-12);
/// ```
pub fn steepest_path(model: &FittedSurfaceModel, config: &PathConfig) -> Result<SteepestPathReport> {
    if config.n_steps == 0 {
        return Err(Error::invalid_params("steepest path needs at least one step"));
    }
    if !(config.step_size.is_finite() && config.step_size > 0.0) {
        return Err(Error::invalid_params(format!(
            "step size must be a positive finite number, got {}",
            config.step_size
        )));
    }

    let k = model.k();
    let start_point = match &config.start_point {
        Some(point) => {
            check_point(model, point)?;
            Array1::from(point.clone())
        }
        None => Array1::zeros(k),
    };

    let form = extract_coefficients(model)?;
    let gradient_at_start = form.gradient(start_point.view());
    let norm = gradient_at_start.dot(&gradient_at_start).sqrt();
    if norm == 0.0 {
        return Err(Error::ZeroGradient {
            point: start_point.to_vec(),
        });
    }

    let mut unit_direction = &gradient_at_start / norm;
    if config.direction == Direction::Descent {
        unit_direction.mapv_inplace(|v| -v);
    }

    let path = (0..config.n_steps)
        .map(|step| {
            let distance = step as f64 * config.step_size;
            let coordinates = if step == 0 {
                start_point.clone()
            } else {
                &start_point + &(&unit_direction * distance)
            };
            let natural = model.to_natural(&coordinates.to_vec()).map(Array1::from);
            PathStep {
                step,
                distance,
                predicted_response: form.evaluate(coordinates.view()),
                coordinates,
                natural,
            }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "steepest {} path for `{}`: {} steps of {} along {unit_direction}",
        config.direction,
        model.response(),
        config.n_steps,
        config.step_size
    );

    Ok(SteepestPathReport {
        response: model.response().to_string(),
        factors: model.factors().to_vec(),
        start_point,
        direction: config.direction,
        gradient_at_start,
        unit_direction,
        path,
    })
}

fn check_point(model: &FittedSurfaceModel, point: &[f64]) -> Result<()> {
    if point.len() != model.k() {
        return Err(Error::dimension_mismatch(
            format!("{} coordinates", model.k()),
            format!("{} coordinates", point.len()),
        ));
    }
    if point.iter().any(|v| !v.is_finite()) {
        return Err(Error::invalid_params("start point must be finite"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::{Encoding, Levels};
    use crate::model::{ModelOrder, Term, TermKind};

    fn quadratic() -> FittedSurfaceModel {
        FittedSurfaceModel::new(
            "yield",
            vec!["P".to_string(), "S".to_string()],
            ModelOrder::Quadratic,
            vec![
                Term::new(TermKind::Intercept, 50.0),
                Term::new(TermKind::Linear(0), 4.0),
                Term::new(TermKind::Linear(1), 2.0),
                Term::new(TermKind::Interaction(0, 1), 1.0),
                Term::new(TermKind::Squared(0), -5.0),
                Term::new(TermKind::Squared(1), -3.0),
            ],
        )
        .unwrap()
    }

    fn flat_linear() -> FittedSurfaceModel {
        FittedSurfaceModel::new(
            "y",
            vec!["A".to_string(), "B".to_string()],
            ModelOrder::Linear,
            vec![
                Term::new(TermKind::Intercept, 3.0),
                Term::new(TermKind::Linear(0), 0.0),
                Term::new(TermKind::Linear(1), 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ascent_from_center() {
        let model = quadratic();
        let report = steepest_path(&model, &PathConfig::default()).unwrap();

        assert_eq!(report.gradient_at_start.to_vec(), vec![4.0, 2.0]);
        let norm = report.unit_direction.dot(&report.unit_direction).sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert!((report.unit_direction[0] - 4.0 / 20f64.sqrt()).abs() < 1e-12);

        assert_eq!(report.path.len(), 10);
        let first = &report.path[0];
        assert_eq!(first.step, 0);
        assert_eq!(first.distance, 0.0);
        assert_eq!(first.coordinates, report.start_point);
        assert_eq!(first.predicted_response, 50.0);

        for step in &report.path {
            let direct = model.predict(&step.coordinates.to_vec()).unwrap();
            assert!((step.predicted_response - direct).abs() < 1e-9);
            let radius = step.coordinates.dot(&step.coordinates).sqrt();
            assert!((radius - step.distance).abs() < 1e-12);
        }
        // Near the center the response rises along the ascent direction.
        assert!(report.path[1].predicted_response > report.path[0].predicted_response);
    }

    #[test]
    fn test_descent_from_offset_start() {
        let model = quadratic();
        let config = PathConfig {
            start_point: Some(vec![1.0, -1.0]),
            direction: Direction::Descent,
            n_steps: 4,
            step_size: 0.25,
        };
        let report = steepest_path(&model, &config).unwrap();

        // b + 2Bx at (1, -1): [4 - 10 - 1, 2 + 1 + 6] = [-7, 9]
        let g = gradient_at(&model, &[1.0, -1.0]).unwrap();
        assert_eq!(g.to_vec(), vec![-7.0, 9.0]);
        assert_eq!(report.gradient_at_start, g);

        let norm = 130f64.sqrt();
        assert!((report.unit_direction[0] - 7.0 / norm).abs() < 1e-12);
        assert!((report.unit_direction[1] + 9.0 / norm).abs() < 1e-12);
        assert_eq!(report.path[0].coordinates.to_vec(), vec![1.0, -1.0]);
        assert!((report.path[3].distance - 0.75).abs() < 1e-12);
        assert!(report.path[1].predicted_response < report.path[0].predicted_response);
    }

    #[test]
    fn test_zero_gradient() {
        let err = steepest_path(&flat_linear(), &PathConfig::default()).unwrap_err();
        assert_eq!(
            err,
            Error::ZeroGradient {
                point: vec![0.0, 0.0]
            }
        );

        // The stationary point of a quadratic has zero gradient too.
        let stationary = FittedSurfaceModel::new(
            "y",
            vec!["A".to_string(), "B".to_string()],
            ModelOrder::Quadratic,
            vec![
                Term::new(TermKind::Intercept, 1.0),
                Term::new(TermKind::Linear(0), 2.0),
                Term::new(TermKind::Linear(1), 0.0),
                Term::new(TermKind::Interaction(0, 1), 0.0),
                Term::new(TermKind::Squared(0), -1.0),
                Term::new(TermKind::Squared(1), -1.0),
            ],
        )
        .unwrap();
        let config = PathConfig {
            start_point: Some(vec![1.0, 0.0]),
            ..PathConfig::default()
        };
        assert!(matches!(
            steepest_path(&stationary, &config),
            Err(Error::ZeroGradient { .. })
        ));
    }

    #[test]
    fn test_invalid_config() {
        let model = quadratic();
        let zero_steps = PathConfig {
            n_steps: 0,
            ..PathConfig::default()
        };
        assert!(matches!(
            steepest_path(&model, &zero_steps),
            Err(Error::InvalidParams { .. })
        ));

        let bad_step = PathConfig {
            step_size: -0.1,
            ..PathConfig::default()
        };
        assert!(steepest_path(&model, &bad_step).is_err());

        let wrong_dim = PathConfig {
            start_point: Some(vec![0.0]),
            ..PathConfig::default()
        };
        assert!(matches!(
            steepest_path(&model, &wrong_dim),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_natural_coordinates_on_path() {
        let encoding = Encoding::new()
            .with("P", Levels::new(18.0, 180.0, 342.0).unwrap())
            .with("S", Levels::new(6.0, 60.0, 114.0).unwrap());
        let model = quadratic().with_encoding(encoding).unwrap();
        let report = steepest_path(&model, &PathConfig::default()).unwrap();
        let start = report.path[0].natural.as_ref().unwrap();
        assert_eq!(start.to_vec(), vec![180.0, 60.0]);
        let step = &report.path[5];
        let natural = step.natural.as_ref().unwrap();
        assert!((natural[0] - (180.0 + step.coordinates[0] * 162.0)).abs() < 1e-9);
    }
}
