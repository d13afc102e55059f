use std::time::Instant;

use anyhow::Result;

use mcquad::estimators::{AreaEstimator, AverageEstimator, HitOrMissEstimator};
use mcquad::integrand::Integrand;
use mcquad::progress::TrajectoryFormat;

fn main() -> Result<()> {
    let f = |x: f64| x.sqrt();
    let integrand = Integrand::Function(&f);

    println!("Integrating f(x) = sqrt(x) over [0, 1] (exact area 2/3)");

    println!("\naverage method");
    println!("error target\tarea\t\titerations\telapsed [s]");
    for acceptable_error in [0.1, 0.01, 0.001, 0.0001] {
        let mut estimator = AverageEstimator::new();
        let started = Instant::now();
        match estimator.estimate(&integrand, 0.0, 1.0, acceptable_error) {
            Ok(area) => {
                let last = estimator.trajectory().latest().unwrap();
                println!(
                    "{:.4}\t\t{:.6}\t{}\t\t{:.6}",
                    acceptable_error,
                    area,
                    last.iterations,
                    started.elapsed().as_secs_f64()
                );
            }
            Err(err) => println!("{acceptable_error:.4}\t\tfailed: {err}"),
        }
    }

    println!("\nhit-or-miss method");
    println!("error target\tarea\t\titerations\telapsed [s]");
    for acceptable_error in [0.1, 0.01, 0.001, 0.0001] {
        let mut estimator = HitOrMissEstimator::new();
        let started = Instant::now();
        match estimator.estimate(&integrand, 0.0, 1.0, acceptable_error) {
            Ok(area) => {
                let last = estimator.trajectory().latest().unwrap();
                println!(
                    "{:.4}\t\t{:.6}\t{}\t\t{:.6}",
                    acceptable_error,
                    area,
                    last.iterations,
                    started.elapsed().as_secs_f64()
                );
            }
            Err(err) => println!("{acceptable_error:.4}\t\tfailed: {err}"),
        }
    }

    // Convergence trace of one more run, for plotting.
    let mut estimator = AverageEstimator::new().with_sample_frequency(100);
    estimator.estimate(&integrand, 0.0, 1.0, 0.001)?;
    estimator
        .trajectory()
        .export("trajectory.csv", TrajectoryFormat::Csv)?;
    println!("\nwrote trajectory.csv");

    Ok(())
}
