use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Seeded RNG that counts every draw through a shared [`DrawCountHandle`].
///
/// Lets a test hand the generator to an estimator and still observe how many
/// draws were made, e.g. to prove a contract violation was raised before any
/// sampling.
pub struct CountingRng {
    inner: StdRng,
    draws: Arc<AtomicUsize>,
}

pub struct DrawCountHandle(Arc<AtomicUsize>);

impl CountingRng {
    pub fn new(seed: u64) -> (Self, DrawCountHandle) {
        let draws = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner: StdRng::seed_from_u64(seed),
                draws: Arc::clone(&draws),
            },
            DrawCountHandle(draws),
        )
    }
}

impl DrawCountHandle {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws.fetch_add(1, Ordering::Relaxed);
        self.inner.fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn handle_sees_every_draw() {
        let (mut rng, handle) = CountingRng::new(0);
        assert_eq!(handle.count(), 0);
        let _: f64 = rng.random_range(0.0..=1.0);
        assert!(handle.count() > 0);
    }
}
