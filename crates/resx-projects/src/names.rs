//! Random project name generation
//!
//! Names are a color + animal + mood triple ("BlueTigerExcited"). There
//! is no uniqueness guarantee and no collision handling; these are
//! throwaway demo projects. The generator is seedable so mutation
//! workflows are reproducible in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const COLORS: &[&str] = &[
    "Red", "Blue", "Green", "Yellow", "Black", "White", "Orange", "Purple", "Pink", "Brown",
];

const ANIMALS: &[&str] = &[
    "Dog", "Cat", "Bird", "Fish", "Lion", "Tiger", "Bear", "Elephant", "Monkey", "Giraffe",
];

const MOODS: &[&str] = &[
    "Happy", "Sad", "Angry", "Excited", "Bored", "Tired", "Hungry", "Thirsty", "Sick", "Healthy",
];

/// Seedable generator of throwaway project names
pub struct NameGenerator {
    rng: Mutex<StdRng>,
}

impl NameGenerator {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Produce the next color + animal + mood name
    pub fn next_name(&self) -> String {
        let mut rng = self.rng.lock().expect("name rng poisoned");
        format!(
            "{}{}{}",
            COLORS[rng.gen_range(0..COLORS.len())],
            ANIMALS[rng.gen_range(0..ANIMALS.len())],
            MOODS[rng.gen_range(0..MOODS.len())]
        )
    }

    /// Pick `count` distinct indices out of `0..len`
    ///
    /// Used for removal sampling: never returns the same index twice, so
    /// a "remove N projects" pass affects exactly N distinct projects.
    pub fn sample_indices(&self, len: usize, count: usize) -> Vec<usize> {
        let mut rng = self.rng.lock().expect("name rng poisoned");
        let mut pool: Vec<usize> = (0..len).collect();
        let count = count.min(len);
        let mut picked = Vec::with_capacity(count);
        for _ in 0..count {
            let i = rng.gen_range(0..pool.len());
            picked.push(pool.swap_remove(i));
        }
        picked
    }
}
