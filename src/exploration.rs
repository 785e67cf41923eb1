use ndarray::{Array1, ArrayView1};
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::types::Action;

/// Epsilon-greedy action selection with a linear decay schedule.
///
/// With probability `epsilon` a uniformly random action is taken, otherwise
/// the action with the highest estimated value. After every completed episode
/// the trainer calls [`decay`](EpsilonGreedy::decay), which lowers epsilon by a
/// fixed step until it reaches `epsilon_min`.
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f32,
    epsilon_start: f32,
    epsilon_min: f32,
    epsilon_decay: f32,
    action_count: usize,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(
        action_count: usize,
        epsilon_start: f32,
        epsilon_min: f32,
        epsilon_decay: f32,
        rng: StdRng,
    ) -> Result<Self> {
        if action_count == 0 {
            return Err(Error::config("action_count".to_string(), "must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&epsilon_start) {
            return Err(Error::config(
                "epsilon_start".to_string(),
                format!("must lie in [0, 1], got {}", epsilon_start),
            ));
        }
        if !(0.0..=epsilon_start).contains(&epsilon_min) {
            return Err(Error::config(
                "epsilon_min".to_string(),
                format!("must lie in [0, epsilon_start], got {}", epsilon_min),
            ));
        }
        if epsilon_decay.is_nan() || epsilon_decay < 0.0 {
            return Err(Error::config(
                "epsilon_decay".to_string(),
                format!("must be non-negative, got {}", epsilon_decay),
            ));
        }

        Ok(EpsilonGreedy {
            epsilon: epsilon_start,
            epsilon_start,
            epsilon_min,
            epsilon_decay,
            action_count,
            rng,
        })
    }

    /// A policy that always exploits: epsilon is pinned at zero and no
    /// random numbers are drawn.
    pub fn greedy(action_count: usize) -> Self {
        EpsilonGreedy {
            epsilon: 0.0,
            epsilon_start: 0.0,
            epsilon_min: 0.0,
            epsilon_decay: 0.0,
            action_count,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Pick an action for `state`, querying `value_fn` only when exploiting.
    pub fn select_action<F>(&mut self, state: ArrayView1<f32>, value_fn: F) -> Result<Action>
    where
        F: FnOnce(ArrayView1<f32>) -> Array1<f32>,
    {
        if self.epsilon > 0.0 && self.rng.gen::<f32>() <= self.epsilon {
            return Ok(self.rng.gen_range(0..self.action_count));
        }

        let values = value_fn(state);
        if values.len() != self.action_count {
            return Err(Error::dimension_mismatch(
                format!("{} action values", self.action_count),
                format!("{} action values", values.len()),
            ));
        }
        argmax(values.view())
    }

    /// `epsilon <- max(epsilon_min, epsilon - epsilon_decay)`
    pub fn decay(&mut self) {
        self.epsilon = (self.epsilon - self.epsilon_decay).max(self.epsilon_min);
    }

    /// Restore the starting epsilon, used at the beginning of each cycle.
    pub fn reset(&mut self) {
        self.epsilon = self.epsilon_start;
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }
}

/// Index of the largest value; ties go to the lowest index and NaNs are skipped.
pub fn argmax(values: ArrayView1<f32>) -> Result<Action> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, current)| value > current) {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
        .ok_or_else(|| Error::Numerical(format!("no comparable action values in {}", values)))
}
