use std::sync::mpsc::Sender;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::EstimateError;
use crate::estimators::{AreaEstimator, DEFAULT_MAX_ITERATIONS, HitTally};
use crate::integrand::Integrand;
use crate::progress::{Snapshot, Trajectory};

/// Default warm-up draw count.
pub const DEFAULT_INITIAL_SAMPLES: u64 = 1_000;

/// Hit-or-miss Monte Carlo integration.
///
/// Samples points inside the bounding box `[lower, upper] x [0, max_y]` and
/// scales the box area by the fraction that lands under the curve. In
/// function mode the ceiling `max_y` is discovered while sampling: a warm-up
/// pass of `initial_samples` x-draws seeds it, and each refinement iteration
/// may still raise it. Earlier tallies are not re-weighed when the ceiling
/// grows, so the running ratio is only approximately binomial under the final
/// ceiling and the area estimate inherits that small bias.
///
/// The standard-error estimate uses the binomial proportion,
/// `epsilon = (2/3) * width * max_y * sqrt(ratio(1 - ratio) / n)`.
///
/// In table mode the bounds arguments are ignored; the x row carries its own
/// range.
pub struct HitOrMissEstimator<R: Rng = StdRng> {
    rng: R,
    max_iterations: u64,
    initial_samples: u64,
    sample_frequency: u64,
    trajectory: Trajectory,
    progress_tx: Option<Sender<Snapshot>>,
}

impl HitOrMissEstimator<StdRng> {
    /// Estimator drawing from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Estimator with a reproducible sample stream.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for HitOrMissEstimator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> HitOrMissEstimator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_samples: DEFAULT_INITIAL_SAMPLES,
            sample_frequency: 1,
            trajectory: Trajectory::default(),
            progress_tx: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Warm-up draw count in function mode, per-point draw count in table
    /// mode.
    pub fn with_initial_samples(mut self, initial_samples: u64) -> Self {
        self.initial_samples = initial_samples;
        self
    }

    /// Emits a snapshot every `frequency` draws instead of every one.
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

    fn estimate_from_table(&mut self, x: &[f64], y: &[f64]) -> Result<f64, EstimateError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(EstimateError::MalformedSamples(
                "table rows must be non-empty and of equal length",
            ));
        }
        let max_y = y.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        if !(max_y.is_finite() && max_y >= 0.0) {
            // A negative ceiling would make the [0, max_y] draw range empty.
            return Err(EstimateError::MalformedSamples(
                "table y-values must reach a finite, non-negative maximum",
            ));
        }

        let min_x = x.iter().fold(f64::INFINITY, |acc, &v| acc.min(v));
        let max_x = x.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        let width = max_x - min_x;

        let mut tally = HitTally::default();
        for &yi in y {
            for _ in 0..self.initial_samples {
                let draw = self.rng.random_range(0.0..=max_y);
                tally.record(draw <= yi);

                let area = tally.ratio() * width * max_y;
                if tally.samples() % self.sample_frequency == 0 {
                    // The epsilon is only derived once the sweep finishes.
                    self.push_snapshot(Snapshot {
                        area,
                        epsilon: f64::NAN,
                        iterations: 0,
                        samples: tally.samples(),
                    });
                }
            }
        }

        let ratio = tally.ratio();
        let epsilon =
            (2.0 / 3.0) * width * max_y * (ratio * (1.0 - ratio) / tally.samples() as f64).sqrt();
        let area = ratio * width * max_y;
        self.push_snapshot(Snapshot {
            area,
            epsilon,
            iterations: 0,
            samples: tally.samples(),
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

        // Warm-up x pass; the ceiling is fixed only once the pass completes.
        let mut max_y = 0.0_f64;
        let mut evaluations = Vec::with_capacity(self.initial_samples as usize);
        for _ in 0..self.initial_samples {
            let x = self.rng.random_range(lower_limit..=upper_limit);
            let fx = f(x);
            if fx > max_y {
                max_y = fx;
            }
            evaluations.push(fx);
        }

        // Paired y pass under the warmed-up ceiling.
        let mut tally = HitTally::default();
        for &fx in &evaluations {
            let y = self.rng.random_range(0.0..=max_y);
            tally.record(y <= fx);
        }

        let mut iterations: u64 = 0;
        loop {
            if iterations == self.max_iterations {
                return Err(EstimateError::IterationLimit(self.max_iterations));
            }
            iterations += 1;

            let x = self.rng.random_range(lower_limit..=upper_limit);
            let fx = f(x);
            if fx > max_y {
                max_y = fx;
            }
            let y = self.rng.random_range(0.0..=max_y);
            tally.record(y <= fx);

            let ratio = tally.ratio();
            let epsilon = (2.0 / 3.0)
                * width
                * max_y
                * (ratio * (1.0 - ratio) / tally.samples() as f64).sqrt();
            let area = ratio * width * max_y;

            if iterations % self.sample_frequency == 0 {
                self.push_snapshot(Snapshot {
                    area,
                    epsilon,
                    iterations,
                    samples: tally.samples(),
                });
            }

            if epsilon < acceptable_error {
                if iterations % self.sample_frequency != 0 {
                    self.push_snapshot(Snapshot {
                        area,
                        epsilon,
                        iterations,
                        samples: tally.samples(),
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

impl<R: Rng> AreaEstimator for HitOrMissEstimator<R> {
    fn estimate(
        &mut self,
        integrand: &Integrand<'_>,
        lower_limit: f64,
        upper_limit: f64,
        acceptable_error: f64,
    ) -> Result<f64, EstimateError> {
        self.trajectory.clear();

        match integrand {
            Integrand::Function(f) => {
                if !(lower_limit < upper_limit) {
                    return Err(EstimateError::InvalidBounds {
                        lower: lower_limit,
                        upper: upper_limit,
                    });
                }
                self.estimate_from_function(*f, lower_limit, upper_limit, acceptable_error)
            }
            Integrand::Table { x, y } => self.estimate_from_table(x, y),
            Integrand::Samples(_) => Err(EstimateError::UnsupportedIntegrand(format!(
                "the hit-or-miss method takes a function or a two-row sample table, got a {}",
                integrand.describe()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingRng;
    use std::sync::mpsc::channel;

    #[test]
    fn flat_table_counts_every_draw_as_hit() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 1.0, 1.0];
        let mut est = HitOrMissEstimator::from_seed(1).with_initial_samples(10);
        let area = est
            .estimate(&Integrand::Table { x: &x, y: &y }, 0.0, 1.0, 0.01)
            .unwrap();
        // Every draw in [0, 1] lands under y = 1, so the ratio is exactly 1.
        assert_eq!(area, 2.0);

        let last = est.trajectory().latest().unwrap();
        assert_eq!(last.epsilon, 0.0);
        assert_eq!(last.iterations, 0);
        assert_eq!(last.samples, 30);
        // 30 per-draw updates plus the closing snapshot.
        assert_eq!(est.trajectory().len(), 31);
        assert!(est.trajectory().entries()[0].epsilon.is_nan());
    }

    #[test]
    fn table_mode_ignores_bounds() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 1.0, 1.0];
        let mut est = HitOrMissEstimator::from_seed(1).with_initial_samples(5);
        let area = est
            .estimate(&Integrand::Table { x: &x, y: &y }, 5.0, -5.0, 0.01)
            .unwrap();
        assert_eq!(area, 2.0);
    }

    #[test]
    fn table_rows_must_align() {
        let mut est = HitOrMissEstimator::from_seed(1);
        let x = [0.0, 1.0];
        let y = [1.0];
        let err = est
            .estimate(&Integrand::Table { x: &x, y: &y }, 0.0, 1.0, 0.01)
            .unwrap_err();
        assert!(matches!(err, EstimateError::MalformedSamples(_)));

        let err = est
            .estimate(&Integrand::Table { x: &[], y: &[] }, 0.0, 1.0, 0.01)
            .unwrap_err();
        assert!(matches!(err, EstimateError::MalformedSamples(_)));
    }

    #[test]
    fn negative_table_ceiling_is_rejected() {
        let mut est = HitOrMissEstimator::from_seed(1);
        let x = [0.0, 1.0];
        let y = [-2.0, -1.0];
        let err = est
            .estimate(&Integrand::Table { x: &x, y: &y }, 0.0, 1.0, 0.01)
            .unwrap_err();
        assert!(matches!(err, EstimateError::MalformedSamples(_)));
    }

    #[test]
    fn rejects_flat_sequence_before_sampling() {
        let (rng, draws) = CountingRng::new(3);
        let mut est = HitOrMissEstimator::with_rng(rng);
        let values = [0.0, 1.0, 2.0];
        let err = est
            .estimate(&Integrand::Samples(&values), 0.0, 1.0, 0.01)
            .unwrap_err();
        assert!(matches!(err, EstimateError::UnsupportedIntegrand(_)));
        assert_eq!(draws.count(), 0);
    }

    #[test]
    fn bounds_must_be_ordered_in_function_mode() {
        let f = |x: f64| x.sqrt();
        let mut est = HitOrMissEstimator::from_seed(1);
        let err = est
            .estimate(&Integrand::Function(&f), 1.0, 0.0, 0.01)
            .unwrap_err();
        assert!(matches!(err, EstimateError::InvalidBounds { .. }));
    }

    #[test]
    fn constant_function_converges_after_one_refinement() {
        let f = |_: f64| 2.0;
        let mut est = HitOrMissEstimator::from_seed(9).with_initial_samples(50);
        let area = est
            .estimate(&Integrand::Function(&f), 0.0, 3.0, 0.01)
            .unwrap();
        // Every draw under the ceiling hits, the ratio is 1 and the binomial
        // error collapses to zero on the first refinement iteration.
        assert_eq!(area, 6.0);

        let last = est.trajectory().latest().unwrap();
        assert_eq!(last.iterations, 1);
        assert_eq!(last.samples, 51);
        assert_eq!(last.epsilon, 0.0);
    }

    #[test]
    fn sample_count_grows_one_per_iteration() {
        let f = |x: f64| x.sqrt();
        let mut est = HitOrMissEstimator::from_seed(13);
        est.estimate(&Integrand::Function(&f), 0.0, 1.0, 0.01)
            .unwrap();

        let last = est.trajectory().latest().unwrap();
        assert_eq!(last.samples, DEFAULT_INITIAL_SAMPLES + last.iterations);
    }

    #[test]
    fn never_converging_run_hits_iteration_cap() {
        let f = |x: f64| x.sqrt();
        let mut est = HitOrMissEstimator::from_seed(7)
            .with_initial_samples(10)
            .with_max_iterations(10);
        let err = est
            .estimate(&Integrand::Function(&f), 0.0, 1.0, 0.0)
            .unwrap_err();
        assert!(matches!(err, EstimateError::IterationLimit(10)));
    }

    #[test]
    fn converges_on_sqrt_within_tolerance() {
        let f = |x: f64| x.sqrt();
        let mut within = 0;
        for seed in 1..=20 {
            let mut est = HitOrMissEstimator::from_seed(seed);
            let area = est
                .estimate(&Integrand::Function(&f), 0.0, 1.0, 0.01)
                .unwrap();
            if (area - 2.0 / 3.0).abs() < 0.05 {
                within += 1;
            }
            assert!(est.trajectory().latest().unwrap().epsilon < 0.01);
        }
        assert!(within >= 18, "only {within}/20 runs landed within 0.05 of 2/3");
    }

    #[test]
    fn progress_channel_mirrors_trajectory() {
        let f = |x: f64| x.sqrt();
        let (tx, rx) = channel();
        let mut est = HitOrMissEstimator::from_seed(5).with_progress(tx);
        let area = est
            .estimate(&Integrand::Function(&f), 0.0, 1.0, 0.01)
            .unwrap();

        let received: Vec<Snapshot> = rx.try_iter().collect();
        assert_eq!(received.len(), est.trajectory().len());
        assert_eq!(received.last().unwrap().area, area);
    }
}
