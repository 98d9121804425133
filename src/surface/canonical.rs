//! Canonical analysis of a fitted second-order surface.
//!
//! With the surface written as `β0 + bᵀx + xᵀBx`, the gradient `b + 2Bx`
//! vanishes at `x_s = -½ B⁻¹ b`. The eigenvalues of the Hessian `2B` then
//! decide whether `x_s` is a maximum, a minimum or a saddle.

use ndarray::Array1;

use super::coefficients::extract_quadratic;
use super::types::{CanonicalReport, SurfaceType};
use crate::error::{Error, Result};
use crate::linalg::{from_dvector, sorted_symmetric_eigen, to_dmatrix, to_dvector};
use crate::model::FittedSurfaceModel;

/// Half-width of the coded cube spanned by the factorial runs.
const CODED_REGION: f64 = 1.0;

/// Locate and classify the stationary point of a quadratic model.
///
/// # Algorithm
/// 1. Extract `(β0, b, B)` from the fitted terms
/// 2. Eigendecompose the Hessian `2B`; eigenvalues in descending order
/// 3. Reject a (numerically) singular `B`
/// 4. Solve `B x_s = -½ b` by LU decomposition
/// 5. Classify by eigenvalue signs and evaluate the surface at `x_s`
///
/// # Errors
/// * `NotQuadratic` if the model has no second-order terms
/// * `MissingTerm` if a linear or squared term is absent
/// * `SingularHessian` if `B` has no inverse
///
/// # Example
///
/// ```
/// use rsm::model::{FittedSurfaceModel, ModelOrder, Term, TermKind};
/// use rsm::surface::{canonical_analysis, SurfaceType};
///
/// // y = 10 + 2A - B - A² - 2B²
/// let model = FittedSurfaceModel::new(
///     "y",
///     vec!["A".into(), "B".into()],
///     ModelOrder::Quadratic,
///     vec![
///         Term::new(TermKind::Intercept, 10.0),
///         Term::new(TermKind::Linear(0), 2.0),
///         Term::new(TermKind::Linear(1), -1.0),
///         Term::new(TermKind::Interaction(0, 1), 0.0),
///         Term::new(TermKind::Squared(0), -1.0),
///         Term::new(TermKind::Squared(1), -2.0),
///     ],
/// )
/// .unwrap();
///
/// let report = canonical_analysis(&model).unwrap();
/// assert_eq!(report.surface_type, SurfaceType::Maximum);
/// assert!((report.stationary_point[0] - 1.0).abs() < 1e-12);
/// assert!((report.stationary_point[1] + 0.25).abs() < 1e-12);
/// ```
pub fn canonical_analysis(model: &FittedSurfaceModel) -> Result<CanonicalReport> {
    let form = extract_quadratic(model)?;
    let k = form.k();

    let hessian = form.hessian();
    let (eigenvalues, eigenvectors) = sorted_symmetric_eigen(hessian.view());

    let max_abs = eigenvalues.iter().fold(0.0, |acc: f64, l| acc.max(l.abs()));
    let min_abs = eigenvalues
        .iter()
        .fold(f64::INFINITY, |acc: f64, l| acc.min(l.abs()));
    if max_abs == 0.0 {
        return Err(Error::singular_hessian("every second-order coefficient is zero"));
    }
    if min_abs <= k as f64 * f64::EPSILON * max_abs {
        return Err(Error::singular_hessian(format!(
            "smallest eigenvalue magnitude {min_abs:.3e} is negligible against {max_abs:.3e}"
        )));
    }

    let rhs = to_dvector((&form.linear * -0.5).view());
    let solution = to_dmatrix(form.quadratic.view())
        .lu()
        .solve(&rhs)
        .ok_or_else(|| Error::singular_hessian("LU factorization has a zero pivot"))?;
    let stationary_point: Array1<f64> = from_dvector(&solution);

    let surface_type = SurfaceType::classify(&eigenvalues.to_vec());
    let predicted_response = form.evaluate(stationary_point.view());
    let stationary_point_natural = model
        .to_natural(&stationary_point.to_vec())
        .map(Array1::from);

    log::debug!(
        "stationary point of `{}` at {stationary_point} ({surface_type}, eigenvalues {eigenvalues})",
        model.response()
    );
    if eigenvalues.iter().any(|&l| l == 0.0) {
        log::warn!("Hessian has a zero eigenvalue; the ridge is reported as a saddle point");
    }

    let report = CanonicalReport {
        response: model.response().to_string(),
        factors: model.factors().to_vec(),
        stationary_point,
        stationary_point_natural,
        predicted_response,
        hessian,
        eigenvalues,
        eigenvectors,
        surface_type,
    };
    if report.max_coded_extent() > CODED_REGION {
        log::warn!(
            "stationary point lies outside the coded region [-{CODED_REGION}, {CODED_REGION}]; \
             treat it as an extrapolation"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::{Encoding, Levels};
    use crate::model::{ModelOrder, Term, TermKind};

    fn two_factor(b: [f64; 2], interaction: f64, squares: [f64; 2]) -> FittedSurfaceModel {
        FittedSurfaceModel::new(
            "yield",
            vec!["P".to_string(), "S".to_string()],
            ModelOrder::Quadratic,
            vec![
                Term::new(TermKind::Intercept, 50.0),
                Term::new(TermKind::Linear(0), b[0]),
                Term::new(TermKind::Linear(1), b[1]),
                Term::new(TermKind::Interaction(0, 1), interaction),
                Term::new(TermKind::Squared(0), squares[0]),
                Term::new(TermKind::Squared(1), squares[1]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_maximum() {
        // B = [[-5, 0.5], [0.5, -3]], b = [4, 2]
        let model = two_factor([4.0, 2.0], 1.0, [-5.0, -3.0]);
        let report = canonical_analysis(&model).unwrap();
        assert_eq!(report.surface_type, SurfaceType::Maximum);

        // Solve [[-5, 0.5], [0.5, -3]] x = [-2, -1]; det = 14.75
        let x1 = (-2.0 * -3.0 - 0.5 * -1.0) / 14.75;
        let x2 = (-5.0 * -1.0 - 0.5 * -2.0) / 14.75;
        assert!((report.stationary_point[0] - x1).abs() < 1e-12);
        assert!((report.stationary_point[1] - x2).abs() < 1e-12);

        let direct = model.predict(&report.stationary_point.to_vec()).unwrap();
        assert!((report.predicted_response - direct).abs() < 1e-9);
        // At a stationary point y = β0 + ½ bᵀx_s.
        let half = 50.0 + 0.5 * (4.0 * x1 + 2.0 * x2);
        assert!((report.predicted_response - half).abs() < 1e-9);

        assert!(report.eigenvalues[0] >= report.eigenvalues[1]);
        assert!(report.eigenvalues.iter().all(|&l| l < 0.0));
        assert_eq!(report.hessian[[0, 1]], 1.0);
        assert_eq!(report.hessian[[0, 0]], -10.0);
        assert!(report.stationary_point_natural.is_none());
    }

    #[test]
    fn test_minimum_and_saddle() {
        let report = canonical_analysis(&two_factor([1.0, 1.0], 0.0, [2.0, 1.0])).unwrap();
        assert_eq!(report.surface_type, SurfaceType::Minimum);

        let report = canonical_analysis(&two_factor([1.0, 1.0], 0.0, [2.0, -1.0])).unwrap();
        assert_eq!(report.surface_type, SurfaceType::SaddlePoint);
        assert!((report.eigenvalues[0] - 4.0).abs() < 1e-12);
        assert!((report.eigenvalues[1] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_eigenvectors_diagonalize_hessian() {
        let report = canonical_analysis(&two_factor([1.0, -1.0], 1.2, [-2.0, 0.7])).unwrap();
        let h = &report.hessian;
        for c in 0..2 {
            let v = report.eigenvectors.column(c);
            let hv = h.dot(&v);
            for r in 0..2 {
                assert!((hv[r] - report.eigenvalues[c] * v[r]).abs() < 1e-10);
            }
            let (pivot, _) = v
                .iter()
                .enumerate()
                .fold((0, 0.0), |best, (i, x)| if x.abs() > best.1 { (i, x.abs()) } else { best });
            assert!(v[pivot] > 0.0);
        }
    }

    #[test]
    fn test_singular_hessian() {
        // B = [[2, 2], [2, 2]] has rank one.
        let model = two_factor([1.0, 1.0], 4.0, [2.0, 2.0]);
        assert!(matches!(
            canonical_analysis(&model),
            Err(Error::SingularHessian { .. })
        ));

        let flat = two_factor([1.0, 1.0], 0.0, [0.0, 0.0]);
        assert!(matches!(
            canonical_analysis(&flat),
            Err(Error::SingularHessian { .. })
        ));
    }

    #[test]
    fn test_not_quadratic() {
        let model = FittedSurfaceModel::new(
            "y",
            vec!["P".to_string(), "S".to_string()],
            ModelOrder::Linear,
            vec![
                Term::new(TermKind::Intercept, 1.0),
                Term::new(TermKind::Linear(0), 1.0),
                Term::new(TermKind::Linear(1), 1.0),
            ],
        )
        .unwrap();
        let err = canonical_analysis(&model).unwrap_err();
        assert_eq!(
            err,
            Error::NotQuadratic {
                order: ModelOrder::Linear
            }
        );
        assert!(err.to_string().contains("second-order model"));
    }

    #[test]
    fn test_natural_scale_stationary_point() {
        let encoding = Encoding::new()
            .with("P", Levels::new(18.0, 180.0, 342.0).unwrap())
            .with("S", Levels::new(6.0, 60.0, 114.0).unwrap());
        let model = two_factor([4.0, 2.0], 1.0, [-5.0, -3.0])
            .with_encoding(encoding)
            .unwrap();
        let report = canonical_analysis(&model).unwrap();
        let natural = report.stationary_point_natural.as_ref().unwrap();
        let xs = &report.stationary_point;
        assert!((natural[0] - (180.0 + xs[0] * 162.0)).abs() < 1e-9);
        assert!((natural[1] - (60.0 + xs[1] * 54.0)).abs() < 1e-9);
    }
}
