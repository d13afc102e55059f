mod average;
mod estimator;
mod hit_or_miss;
mod moments;

pub use average::AverageEstimator;
pub use estimator::{AreaEstimator, DEFAULT_MAX_ITERATIONS};
pub use hit_or_miss::{DEFAULT_INITIAL_SAMPLES, HitOrMissEstimator};
pub use moments::{HitTally, RunningMoments};
