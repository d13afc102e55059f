use std::sync::mpsc::Sender;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EstimateError;
use crate::estimators::{AreaEstimator, DEFAULT_MAX_ITERATIONS, RunningMoments};
use crate::integrand::Integrand;
use crate::progress::{Snapshot, Trajectory};

/// Sample-mean ("average") Monte Carlo integration.
///
/// Draws uniform abscissae over the bounds, accumulates the running mean and
/// mean-of-squares of the evaluations, and stops once its standard-error
/// estimate `epsilon = width * sqrt(variance / n)` drops below the caller's
/// acceptable error. An [`Integrand::Samples`] input skips the loop entirely:
/// area and error fall out of the sequence in closed form, and accuracy is
/// whatever the sequence length implies.
pub struct AverageEstimator<R: Rng = StdRng> {
    rng: R,
    max_iterations: u64,
    sample_frequency: u64,
    trajectory: Trajectory,
    progress_tx: Option<Sender<Snapshot>>,
}

impl AverageEstimator<StdRng> {
    /// Estimator drawing from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Estimator with a reproducible sample stream.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for AverageEstimator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> AverageEstimator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sample_frequency: 1,
            trajectory: Trajectory::default(),
            progress_tx: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Emits a snapshot every `frequency` iterations instead of every one.
    /// Zero would divide; it is clamped to 1.
    pub fn with_sample_frequency(mut self, frequency: u64) -> Self {
        self.sample_frequency = frequency.max(1);
        self
    }

    pub fn with_progress(mut self, tx: Sender<Snapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Snapshots recorded by the most recent `estimate` call.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    fn estimate_from_samples(
        &mut self,
        values: &[f64],
        lower_limit: f64,
        upper_limit: f64,
    ) -> Result<f64, EstimateError> {
        if values.is_empty() {
            return Err(EstimateError::MalformedSamples("empty sample sequence"));
        }

        let width = upper_limit - lower_limit;
        let mut moments = RunningMoments::default();
        for &y in values {
            moments.add(y);
        }

        let epsilon = width * (moments.variance() / moments.count()).sqrt();
        let area = width * moments.mean();
        self.push_snapshot(Snapshot {
            area,
            epsilon,
            iterations: 0,
            samples: values.len() as u64,
        });
        Ok(area)
    }

    fn estimate_from_function(
        &mut self,
        f: &dyn Fn(f64) -> f64,
        lower_limit: f64,
        upper_limit: f64,
        acceptable_error: f64,
    ) -> Result<f64, EstimateError> {
        let width = upper_limit - lower_limit;
        let mut moments = RunningMoments::default();
        let mut iterations: u64 = 0;

        loop {
            if iterations == self.max_iterations {
                return Err(EstimateError::IterationLimit(self.max_iterations));
            }
            iterations += 1;

            let x = self.rng.random_range(lower_limit..=upper_limit);
            moments.add(f(x));

            let epsilon = width * (moments.variance() / moments.count()).sqrt();
            let area = width * moments.mean();

            if iterations % self.sample_frequency == 0 {
                self.push_snapshot(Snapshot {
                    area,
                    epsilon,
                    iterations,
                    samples: iterations,
                });
            }

            // A single sample has zero variance, so the error estimate is
            // only meaningful from the second iteration on.
            if epsilon < acceptable_error && iterations >= 2 {
                if iterations % self.sample_frequency != 0 {
                    self.push_snapshot(Snapshot {
                        area,
                        epsilon,
                        iterations,
                        samples: iterations,
                    });
                }
                return Ok(area);
            }
        }
    }

    fn push_snapshot(&mut self, snapshot: Snapshot) {
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot);
        }
        self.trajectory.push(snapshot);
    }
}

impl<R: Rng> AreaEstimator for AverageEstimator<R> {
    fn estimate(
        &mut self,
        integrand: &Integrand<'_>,
        lower_limit: f64,
        upper_limit: f64,
        acceptable_error: f64,
    ) -> Result<f64, EstimateError> {
        self.trajectory.clear();

        if !(lower_limit < upper_limit) {
            return Err(EstimateError::InvalidBounds {
                lower: lower_limit,
                upper: upper_limit,
            });
        }

        match integrand {
            Integrand::Function(f) => {
                self.estimate_from_function(*f, lower_limit, upper_limit, acceptable_error)
            }
            Integrand::Samples(values) => {
                self.estimate_from_samples(values, lower_limit, upper_limit)
            }
            Integrand::Table { .. } => Err(EstimateError::UnsupportedIntegrand(format!(
                "the average method takes a function or a flat sample sequence, got a {}",
                integrand.describe()
            ))),
        }
    }
}
