use rand::Rng;
use rand::seq::index;

use crate::error::{Error, Result};
use crate::types::Transition;

/// Fixed-capacity experience store with FIFO eviction.
///
/// Storage is a ring: the backing `Vec` grows until it reaches `capacity`
/// and from then on each push overwrites the slot under the write cursor,
/// which always points at the oldest transition once the buffer is full.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    storage: Vec<Transition>,
    capacity: usize,
    cursor: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config(
                "replay_memory_size".to_string(),
                "capacity must be greater than 0".to_string(),
            ));
        }
        Ok(ReplayBuffer {
            storage: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        })
    }

    /// Insert a transition, evicting the oldest one when the buffer is full.
    pub fn push(&mut self, transition: Transition) {
        if self.storage.len() < self.capacity {
            self.storage.push(transition);
        } else {
            self.storage[self.cursor] = transition;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    /// Draw `batch_size` distinct transitions uniformly at random.
    ///
    /// Asking for more transitions than the buffer holds is an error rather
    /// than a short sample.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Vec<&Transition>> {
        if batch_size > self.storage.len() {
            return Err(Error::InsufficientSamples {
                requested: batch_size,
                available: self.storage.len(),
            });
        }
        Ok(index::sample(rng, self.storage.len(), batch_size)
            .into_iter()
            .map(|i| &self.storage[i])
            .collect())
    }

    /// Iterate from the oldest to the newest retained transition.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        // while filling, cursor == len so the first half is empty
        self.storage[self.cursor..]
            .iter()
            .chain(self.storage[..self.cursor].iter())
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.storage.clear();
        self.cursor = 0;
    }
}
