/// Integrand accepted by the area estimators, resolved once at call entry.
///
/// The sampled variants stand in for a function that is only known at
/// discrete points: [`Samples`] is a flat run of y-values assumed uniformly
/// spaced across the integration bounds, [`Table`] pairs explicit x and y
/// rows. Each estimator consumes [`Function`] plus the sampled variant that
/// matches its method and rejects the other one before drawing anything.
///
/// [`Function`]: Integrand::Function
/// [`Samples`]: Integrand::Samples
/// [`Table`]: Integrand::Table
pub enum Integrand<'a> {
    /// Function evaluated on demand inside the integration bounds.
    Function(&'a dyn Fn(f64) -> f64),
    /// y-values sampled uniformly between the integration bounds.
    Samples(&'a [f64]),
    /// Paired sample rows: `x[i]` is the abscissa of `y[i]`.
    Table { x: &'a [f64], y: &'a [f64] },
}

impl Integrand<'_> {
    /// Variant name used in error reports.
    pub fn describe(&self) -> &'static str {
        match self {
            Integrand::Function(_) => "function",
            Integrand::Samples(_) => "sample sequence",
            Integrand::Table { .. } => "sample table",
        }
    }
}
