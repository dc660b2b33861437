//! Random number service used for damage and loot rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform integer source over an inclusive range.
pub trait Dice {
    /// Roll a value in `min..=max`. A range with `max < min` yields `min`.
    fn between(&mut self, min: i32, max: i32) -> i32;
}

/// Dice backed by a seedable standard RNG.
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Dice for RandomDice {
    fn between(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed list of rolls, clamped into the requested range.
/// Once the list runs dry every roll returns the range minimum.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<i32>,
}

impl ScriptedDice {
    pub fn new<I: IntoIterator<Item = i32>>(rolls: I) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Dice for ScriptedDice {
    fn between(&mut self, min: i32, max: i32) -> i32 {
        let hi = max.max(min);
        match self.rolls.pop_front() {
            Some(roll) => roll.clamp(min, hi),
            None => min,
        }
    }
}
