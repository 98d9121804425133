//! End-to-end analysis of a 3² soybean fertility trial: phosphorus (P) and
//! sulfur (S) doses against grain yield.

use ndarray::Array2;
use rsm::prelude::*;

const YIELDS: [f64; 9] = [37.3, 44.8, 43.1, 40.9, 50.2, 48.7, 39.2, 49.0, 48.8];

fn encoding() -> Encoding {
    Encoding::new()
        .with("P", Levels::new(18.0, 180.0, 342.0).unwrap())
        .with("S", Levels::new(6.0, 60.0, 114.0).unwrap())
}

fn experiment() -> Experiment {
    let p = [18.0, 180.0, 342.0];
    let s = [6.0, 60.0, 114.0];
    let natural = Array2::from_shape_fn((9, 2), |(r, c)| if c == 0 { p[r % 3] } else { s[r / 3] });
    Experiment::from_natural(
        vec!["P".to_string(), "S".to_string()],
        natural.view(),
        "yield",
        YIELDS.to_vec(),
        encoding(),
    )
    .unwrap()
}

fn fitted() -> SurfaceFit {
    fit_surface(&experiment(), ModelOrder::Quadratic, &FitConfig::default()).unwrap()
}

#[test]
fn test_natural_data_is_coded() {
    let experiment = experiment();
    let design = three_level_factorial(["P", "S"]).unwrap();
    for (a, b) in experiment.coded().iter().zip(design.points().iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_quadratic_fit() {
    let fit = fitted();
    let model = &fit.model;
    let estimate = |kind| model.term(kind).unwrap().estimate;

    assert!((estimate(TermKind::Intercept) - 49.933_333).abs() < 1e-5);
    assert!((estimate(TermKind::Linear(0)) - 3.866_667).abs() < 1e-5);
    assert!((estimate(TermKind::Linear(1)) - 1.966_667).abs() < 1e-5);
    assert!((estimate(TermKind::Interaction(0, 1)) - 0.95).abs() < 1e-9);
    assert!((estimate(TermKind::Squared(0)) + 5.0).abs() < 1e-9);
    assert!((estimate(TermKind::Squared(1)) + 2.9).abs() < 1e-9);

    assert!((fit.statistics.r_squared - 0.998_82).abs() < 1e-4);
    assert_eq!(fit.statistics.residual_df, 3);
    assert!(model.encoding().is_some());
}

#[test]
fn test_canonical_form_reproduces_predictions() {
    let model = fitted().model;
    let form = rsm::surface::extract_quadratic(&model).unwrap();
    for x in [-1.68, -1.0, -0.3, 0.0, 0.7, 1.2] {
        for y in [-1.5, -0.2, 0.0, 0.9, 1.68] {
            let point = ndarray::array![x, y];
            let direct = model.predict(&[x, y]).unwrap();
            let canonical = form.evaluate(point.view());
            assert!((direct - canonical).abs() <= 1e-9 * direct.abs());
        }
    }
    for i in 0..2 {
        for j in 0..2 {
            assert_eq!(form.quadratic[[i, j]], form.quadratic[[j, i]]);
        }
    }
}

#[test]
fn test_stationary_point_is_interior_maximum() {
    let model = fitted().model;
    let report = canonical_analysis(&model).unwrap();

    assert_eq!(report.surface_type, SurfaceType::Maximum);
    assert!(report.eigenvalues.iter().all(|&l| l < 0.0));
    assert!((report.eigenvalues[0] + 5.595_114).abs() < 1e-5);
    assert!((report.eigenvalues[1] + 10.204_886).abs() < 1e-5);

    assert!((report.stationary_point[0] - 0.425_500).abs() < 1e-5);
    assert!((report.stationary_point[1] - 0.408_774).abs() < 1e-5);
    assert!((report.predicted_response - 51.157_929).abs() < 1e-5);

    let natural = report.stationary_point_natural.as_ref().unwrap();
    assert!((natural[0] - 248.931).abs() < 1e-3);
    assert!((natural[1] - 82.074).abs() < 1e-3);

    let rows = get_stationary_point(&report, true);
    assert_eq!(rows[0].factor, "P");
    assert_eq!(rows[1].natural_value, Some(natural[1]));
}

#[test]
fn test_grid_search_agrees_with_stationary_point() {
    let model = fitted().model;
    let report = canonical_analysis(&model).unwrap();
    let best = get_optimal_factors(&model, &GridSearchConfig::default()).unwrap();

    assert_eq!(best.evaluated, 2500);
    for i in 0..2 {
        assert_eq!(
            best.coded[i].signum(),
            report.stationary_point[i].signum(),
            "factor {i}"
        );
        // Grid spacing is 3.36 / 49.
        assert!((best.coded[i] - report.stationary_point[i]).abs() < 0.07);
    }
    assert!(best.predicted_response <= report.predicted_response);
    assert!(report.predicted_response - best.predicted_response < 0.01);
}

#[test]
fn test_steepest_ascent_heads_toward_optimum() {
    let model = fitted().model;
    let report = steepest_path(&model, &PathConfig::default()).unwrap();

    let norm = report.unit_direction.dot(&report.unit_direction).sqrt();
    assert!((norm - 1.0).abs() < 1e-9);
    assert!((report.unit_direction[0] - 0.891_333).abs() < 1e-5);
    assert!((report.unit_direction[1] - 0.453_350).abs() < 1e-5);

    assert_eq!(report.path[0].coordinates.to_vec(), vec![0.0, 0.0]);
    assert_eq!(report.path[0].distance, 0.0);
    let natural = report.path[0].natural.as_ref().unwrap();
    assert_eq!(natural.to_vec(), vec![180.0, 60.0]);

    // Rising over the first few steps before curvature takes over.
    assert!(report.path[3].predicted_response > report.path[0].predicted_response);
}

#[test]
fn test_reports_render() {
    let fit = fitted();
    let model = fit.model.clone();
    let text = Report::Fit(fit).to_string();
    assert!(text.contains("P:S"));
    assert!(text.contains("S^2"));
    assert!(text.contains("PQ"));

    let canonical = Report::Canonical(canonical_analysis(&model).unwrap());
    assert!(summarize(&canonical).contains("Maximum"));
}
