//! Soybean fertility trial: fit a quadratic surface to a 3² factorial of
//! phosphorus (P, mg/dm³) and sulfur (S, mg/dm³) doses, then locate the
//! yield optimum.
//!
//! Run with `RUST_LOG=debug cargo run --example soy_fertility` to see the
//! analysis trace.

use ndarray::array;
use rsm::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let encoding = Encoding::new()
        .with("P", Levels::new(18.0, 180.0, 342.0)?)
        .with("S", Levels::new(6.0, 60.0, 114.0)?);

    let natural = array![
        [18.0, 6.0],
        [180.0, 6.0],
        [342.0, 6.0],
        [18.0, 60.0],
        [180.0, 60.0],
        [342.0, 60.0],
        [18.0, 114.0],
        [180.0, 114.0],
        [342.0, 114.0],
    ];
    let yields = vec![37.3, 44.8, 43.1, 40.9, 50.2, 48.7, 39.2, 49.0, 48.8];

    let experiment = Experiment::from_natural(
        vec!["P".to_string(), "S".to_string()],
        natural.view(),
        "yield",
        yields,
        encoding,
    )?;

    let fit = fit_surface(&experiment, ModelOrder::Quadratic, &FitConfig::default())?;
    let model = fit.model.clone();
    println!("{}", Report::Fit(fit));

    match canonical_analysis(&model) {
        Ok(canonical) => println!("{}", Report::Canonical(canonical)),
        Err(e) => println!("Canonical analysis unavailable: {e}\n"),
    }

    let path = steepest_path(&model, &PathConfig::default())?;
    println!("{}", Report::SteepestPath(path));

    let objective: Objective = "maximize".parse()?;
    let best = get_optimal_factors(&model, &GridSearchConfig::new(objective))?;
    println!("{}", Report::Optimization(best));

    Ok(())
}
