use ndarray::array;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::types::{Action, State};
use super::{Environment, Step};

/// The classic mountain-car task.
///
/// An under-powered car sits in a valley and must build momentum to reach
/// the flag on the right hill. Actions are `0 = push left`, `1 = no push`,
/// `2 = push right`; the state is `[position, velocity]`. Every step costs a
/// reward of -1 and the episode ends once the car reaches `goal_position`.
#[derive(Debug, Clone)]
pub struct MountainCar {
    pub min_position: f32,
    pub max_position: f32,
    pub max_speed: f32,
    pub goal_position: f32,
    pub force: f32,
    pub gravity: f32,
    position: f32,
    velocity: f32,
    rng: StdRng,
}

impl MountainCar {
    pub const ACTIONS: usize = 3;

    pub fn new() -> Self {
        MountainCar {
            min_position: -1.2,
            max_position: 0.6,
            max_speed: 0.07,
            goal_position: 0.5,
            force: 0.001,
            gravity: 0.0025,
            position: -0.5,
            velocity: 0.0,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}

impl Default for MountainCar {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for MountainCar {
    fn reset(&mut self) -> Result<State> {
        self.position = self.rng.gen_range(-0.6..-0.4);
        self.velocity = 0.0;
        Ok(array![self.position, self.velocity])
    }

    fn step(&mut self, action: Action) -> Result<Step> {
        if action >= Self::ACTIONS {
            return Err(Error::InvalidAction { action, action_count: Self::ACTIONS });
        }

        self.velocity += (action as f32 - 1.0) * self.force - self.gravity * (3.0 * self.position).cos();
        self.velocity = self.velocity.clamp(-self.max_speed, self.max_speed);
        self.position += self.velocity;
        self.position = self.position.clamp(self.min_position, self.max_position);
        if self.position == self.min_position && self.velocity < 0.0 {
            self.velocity = 0.0;
        }

        let terminal = self.position >= self.goal_position;
        Ok(Step {
            next_state: array![self.position, self.velocity],
            reward: -1.0,
            terminal,
        })
    }

    fn action_count(&self) -> usize {
        Self::ACTIONS
    }

    fn state_dimension(&self) -> usize {
        2
    }

    fn goal_reached(&self, state: &State) -> bool {
        state.first().map_or(false, |&position| position >= self.goal_position)
    }
}
