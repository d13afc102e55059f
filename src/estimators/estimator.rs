use crate::error::EstimateError;
use crate::integrand::Integrand;

/// Iteration cap shared by the estimators' convergence loops.
pub const DEFAULT_MAX_ITERATIONS: u64 = 100_000;

/// Monte Carlo area estimator.
///
/// Implementations consume an [`Integrand`] and refine an area estimate until
/// their own running standard-error estimate drops below `acceptable_error`,
/// or fail with [`EstimateError::IterationLimit`] once the configured
/// iteration cap is reached.
pub trait AreaEstimator {
    /// Estimates the area under `integrand` over `[lower_limit, upper_limit]`.
    fn estimate(
        &mut self,
        integrand: &Integrand<'_>,
        lower_limit: f64,
        upper_limit: f64,
        acceptable_error: f64,
    ) -> Result<f64, EstimateError>;
}
