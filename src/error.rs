use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("unsupported integrand: {0}")]
    UnsupportedIntegrand(String),

    #[error("malformed samples: {0}")]
    MalformedSamples(&'static str),

    #[error("invalid bounds: lower limit {lower} is not below upper limit {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("reached maximum number of allowed iterations: {0}")]
    IterationLimit(u64),
}
