pub mod error;
pub mod estimators;
pub mod integrand;
pub mod progress;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
