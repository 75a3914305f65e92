//! Memory of recently chosen sniper positions.
//!
//! Ranged attackers avoid the last few positions picked so they spread out.
//! The history can be handed to every attacker (one shared memory across the
//! whole wave) or created per attacker; that choice is made at construction.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec3;
use rand::{Rng, RngCore};

/// Ring buffer of the most recently chosen positions.
#[derive(Debug, Clone, Default)]
pub struct SniperHistory {
    recent: VecDeque<Vec3>,
    capacity: usize,
}

impl SniperHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn contains(&self, position: Vec3) -> bool {
        self.recent.iter().any(|p| *p == position)
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }

    pub fn remember(&mut self, position: Vec3) {
        if self.capacity == 0 {
            return;
        }
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(position);
    }

    /// Pick a random candidate not in the history. If every candidate is
    /// recent, the history is cleared and any candidate may be chosen.
    pub fn choose(&mut self, candidates: &[Vec3], rng: &mut dyn RngCore) -> Option<Vec3> {
        if candidates.is_empty() {
            return None;
        }
        let mut fresh: Vec<Vec3> = candidates
            .iter()
            .copied()
            .filter(|c| !self.contains(*c))
            .collect();
        if fresh.is_empty() {
            self.clear();
            fresh = candidates.to_vec();
        }
        let pick = fresh[rng.gen_range(0..fresh.len())];
        self.remember(pick);
        Some(pick)
    }
}

/// Cloneable handle to a [`SniperHistory`]. Clones share the same memory.
#[derive(Debug, Clone)]
pub struct SharedSniperHistory(Rc<RefCell<SniperHistory>>);

impl SharedSniperHistory {
    pub fn new(capacity: usize) -> Self {
        Self(Rc::new(RefCell::new(SniperHistory::new(capacity))))
    }

    pub fn choose(&self, candidates: &[Vec3], rng: &mut dyn RngCore) -> Option<Vec3> {
        self.0.borrow_mut().choose(candidates, rng)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn contains(&self, position: Vec3) -> bool {
        self.0.borrow().contains(position)
    }

    /// Whether two handles point at the same memory.
    pub fn same_as(&self, other: &SharedSniperHistory) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
