use std::fmt::{Display, Formatter, Result};

/// Point-in-time progress of one estimation run.
#[derive(Copy, Clone)]
pub struct Snapshot {
    pub area: f64,
    pub epsilon: f64,
    pub iterations: u64,
    pub samples: u64,
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "area={:.6}, eps={:.6}, iter={}, n={}",
            self.area, self.epsilon, self.iterations, self.samples
        )
    }
}
