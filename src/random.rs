use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;

/// Source of uniform floats in `[0, 1)` used by every generator.
///
/// Production code hands in a `ThreadRng` (or a seeded `StdRng`), tests hand in
/// a [`ScriptedRandom`] so that distractors, formats and shuffles are exact.
///
/// Only `next_f64` is required so a scripted sequence drives every draw;
/// `below` and [`shuffle`] build on it rather than on `Rng::gen_range` or
/// `SliceRandom`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..n`. Returns 0 when `n` is 0.
    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let idx = (self.next_f64() * n as f64).floor() as usize;
        idx.min(n - 1)
    }

    /// Fair coin.
    fn coin(&mut self) -> bool {
        self.next_f64() < 0.5
    }

    /// Fair coin mapped to +1 / -1.
    fn sign(&mut self) -> i32 {
        if self.coin() {
            1
        } else {
            -1
        }
    }
}

impl RandomSource for ThreadRng {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for StdRng {
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, pos: 0 }
    }

    /// Always yields the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v.clamp(0.0, 0.999_999_999)
    }
}

/// Uniform in-place Fisher-Yates shuffle.
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn below_stays_in_range() {
        let mut rng = ScriptedRandom::new(vec![0.0, 0.5, 0.999_999]);
        assert_eq!(rng.below(12), 0);
        assert_eq!(rng.below(12), 6);
        assert_eq!(rng.below(12), 11);
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn scripted_values_cycle() {
        let mut rng = ScriptedRandom::new(vec![0.1, 0.9]);
        assert!(rng.coin());
        assert!(!rng.coin());
        assert!(rng.coin());
    }

    #[test]
    fn shuffle_reaches_every_ordering_of_four() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let mut items = [1, 2, 3, 4];
            shuffle(&mut rng, &mut items);
            seen.insert(items);
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = rand::thread_rng();
        let mut items: Vec<u32> = (0..10).collect();
        shuffle(&mut rng, &mut items);
        items.sort();
        assert_eq!(items, (0..10).collect::<Vec<_>>());
    }
}
