use std::ops::Range;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG owned by one session so a round can be replayed from its seed.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distr::uniform::SampleUniform,
        R: rand::distr::uniform::SampleRange<T>,
    {
        self.rng.random_range(range)
    }

    /// `true` with the given probability, clamped to `[0, 1]`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    /// Uniform duration in `[range.start, range.end)` at millisecond resolution.
    pub fn random_duration(&mut self, range: Range<Duration>) -> Duration {
        let start = range.start.as_millis() as u64;
        let end = range.end.as_millis() as u64;
        if end <= start {
            return range.start;
        }
        Duration::from_millis(self.rng.random_range(start..end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SessionRng::new(7);
        let mut b = SessionRng::new(7);
        for _ in 0..20 {
            assert_eq!(a.random_range(0..100u32), b.random_range(0..100u32));
        }
    }

    #[test]
    fn test_random_duration_stays_in_range() {
        let mut rng = SessionRng::new(1);
        let range = Duration::from_secs(10)..Duration::from_secs(60);
        for _ in 0..200 {
            let d = rng.random_duration(range.clone());
            assert!(d >= range.start && d < range.end);
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = SessionRng::new(3);
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
    }
}
