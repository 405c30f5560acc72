use std::fmt;

use crate::catalog::{Combo, Orb, COMBO_LEN};

/// Sliding window over the most recent orbs typed.
///
/// Never rejects input: once full, the oldest orb is evicted to make room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    orbs: Vec<Orb>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            orbs: Vec::with_capacity(COMBO_LEN),
        }
    }

    /// Returns false (and leaves the buffer alone) for characters outside the alphabet
    pub fn push_char(&mut self, c: char) -> bool {
        match Orb::from_char(c) {
            Some(orb) => {
                self.push(orb);
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, orb: Orb) {
        if self.orbs.len() == COMBO_LEN {
            self.orbs.remove(0);
        }
        self.orbs.push(orb);
    }

    pub fn delete_last(&mut self) {
        self.orbs.pop();
    }

    pub fn clear(&mut self) {
        self.orbs.clear();
    }

    pub fn len(&self) -> usize {
        self.orbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbs.is_empty()
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    /// Same length, same orbs, same order
    pub fn matches(&self, combo: &Combo) -> bool {
        self.orbs.as_slice() == combo.orbs()
    }
}

impl fmt::Display for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.orbs
            .iter()
            .try_for_each(|orb| write!(f, "{}", orb.as_char()))
    }
}
