use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::Combo;
use crate::input_buffer::InputBuffer;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Result of the last submitted answer, kept for display only
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub challenge: String,
    pub expected: Combo,
    pub entered: String,
}

impl Verdict {
    pub fn evaluate(challenge: &str, expected: &Combo, buffer: &InputBuffer) -> Self {
        let outcome = if buffer.matches(expected) {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };

        Self {
            outcome,
            challenge: challenge.to_string(),
            expected: *expected,
            entered: buffer.to_string(),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.outcome == Outcome::Correct
    }
}

/// Running counters for one round
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub score: usize,
    pub total_attempts: usize,
    pub correct_answers: usize,
}

impl RoundStats {
    pub fn record(&mut self, outcome: Outcome) {
        self.total_attempts += 1;
        if outcome == Outcome::Correct {
            self.score += 1;
            self.correct_answers += 1;
        }
    }

    /// Percentage of correct attempts; 0.0 before the first attempt
    pub fn accuracy(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        self.correct_answers as f64 / self.total_attempts as f64 * 100.0
    }
}

/// Picks the challenge at `index`, wrapping around the name list
pub fn pick(names: &[String], index: usize) -> Option<&str> {
    if names.is_empty() {
        return None;
    }
    names.get(index % names.len()).map(String::as_str)
}

/// Entropy for challenge selection
pub trait IndexSource {
    /// An index in `0..len`; `len` is never zero
    fn next_index(&mut self, len: usize) -> usize;
}

/// Production source backed by the thread-local rng
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl IndexSource for ThreadRngSource {
    fn next_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Reproducible source for `--seed`
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IndexSource for SeededSource {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of indices, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    indices: Vec<usize>,
    pos: usize,
}

impl ScriptedSource {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, pos: 0 }
    }
}

impl IndexSource for ScriptedSource {
    fn next_index(&mut self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let idx = self.indices[self.pos % self.indices.len()];
        self.pos += 1;
        idx % len
    }
}

impl<S: IndexSource + ?Sized> IndexSource for Box<S> {
    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }
}
