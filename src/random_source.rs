//! Randomness behind a "pick one of N" seam.
//!
//! The ledger only ever needs a uniform index into a candidate list. Keeping
//! that behind [`RandomSource`] lets tests and simulations inject a seeded or
//! scripted sequence instead of the thread RNG.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform picks
pub trait RandomSource: Send + Sync {
    /// Return an index in `0..n`. Callers never pass `n == 0`.
    fn pick(&self, n: usize) -> usize;
}

/// Pick an index into a collection of `len` items, `None` when empty
pub fn pick_index(source: &dyn RandomSource, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    // Clamp so a misbehaving source cannot index out of bounds.
    Some(source.pick(len).min(len - 1))
}

/// Pick one element of `items` uniformly, `None` for an empty slice
pub fn choose<'a, T>(source: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    pick_index(source, items.len()).and_then(|index| items.get(index))
}

/// Thread-local OS-seeded RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn pick(&self, n: usize) -> usize {
        rand::rng().random_range(0..n)
    }
}

/// Reproducible RNG seeded from a `u64`
#[derive(Debug)]
pub struct SeededRandomSource {
    rng: Mutex<StdRng>,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn pick(&self, n: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..n)
    }
}

/// Replays a fixed list of picks, each reduced modulo `n`.
///
/// Once the script runs out every pick is `0`.
#[derive(Debug, Default)]
pub struct ScriptedRandomSource {
    picks: Mutex<VecDeque<usize>>,
}

impl ScriptedRandomSource {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: Mutex::new(picks.into_iter().collect()),
        }
    }

    /// Picks not consumed yet
    pub fn remaining(&self) -> usize {
        self.picks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

impl RandomSource for ScriptedRandomSource {
    fn pick(&self, n: usize) -> usize {
        let mut picks = self.picks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        picks.pop_front().map(|p| p % n).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_source_stays_in_range() {
        let source = ThreadRandomSource;
        for n in 1..50 {
            assert!(source.pick(n) < n);
        }
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let a = SeededRandomSource::new(42);
        let b = SeededRandomSource::new(42);
        let seq_a: Vec<usize> = (0..20).map(|_| a.pick(10)).collect();
        let seq_b: Vec<usize> = (0..20).map(|_| b.pick(10)).collect();
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.iter().all(|&i| i < 10));
    }

    #[test]
    fn test_scripted_source_wraps_and_drains() {
        let source = ScriptedRandomSource::new([1, 7]);
        assert_eq!(source.pick(3), 1);
        assert_eq!(source.pick(3), 1); // 7 % 3
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.pick(3), 0);
    }

    #[test]
    fn test_choose() {
        let source = ScriptedRandomSource::new([2]);
        assert_eq!(choose(&source, &["a", "b", "c"]), Some(&"c"));
        let empty: [&str; 0] = [];
        assert_eq!(choose(&source, &empty), None);
    }

    #[test]
    fn test_choose_clamps_out_of_range_picks() {
        struct Broken;
        impl RandomSource for Broken {
            fn pick(&self, n: usize) -> usize {
                n + 10
            }
        }
        assert_eq!(choose(&Broken, &["a", "b"]), Some(&"b"));
    }
}
