//! Uniform random sources.
//!
//! Everything random in the trainer goes through [`RandomSource::next_uniform`],
//! so tests can swap the thread RNG for a seeded generator or a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// A draw from `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// `floor(draw * n)`, kept below `n` for draws that round up to 1.0.
    ///
    /// Returns 0 when `n` is 0.
    fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let index = (self.next_uniform() * n as f64).floor() as usize;
        index.min(n - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// The ambient thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_uniform(&mut self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// A reproducible generator.
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_uniform(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// ```
/// use morsetrain::{RandomSource, SequenceRandom};
///
/// let mut random = SequenceRandom::new(vec![0.0, 0.5]);
/// assert_eq!(random.next_index(4), 0);
/// assert_eq!(random.next_index(4), 2);
/// assert_eq!(random.next_index(4), 0);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    draws: Vec<f64>,
    position: usize,
}

impl SequenceRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, position: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn next_uniform(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.position % self.draws.len()];
        self.position += 1;
        draw
    }
}
