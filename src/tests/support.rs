//! Small deterministic environments and a baseline configuration for tests.

use ndarray::{array, Array1, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activations::Activation;
use crate::approximator::{QNetwork, ValueApproximator};
use crate::config::TrainingConfig;
use crate::environment::{Environment, Step};
use crate::error::{Error, Result};
use crate::optimizer::OptimizerKind;
use crate::types::{Action, State, Transition};

/// Every action ends the episode immediately with reward 1.
pub struct OneStep;

impl Environment for OneStep {
    fn reset(&mut self) -> Result<State> {
        Ok(array![0.0])
    }

    fn step(&mut self, action: Action) -> Result<Step> {
        if action >= 2 {
            return Err(Error::InvalidAction { action, action_count: 2 });
        }
        Ok(Step { next_state: array![1.0], reward: 1.0, terminal: true })
    }

    fn action_count(&self) -> usize {
        2
    }

    fn state_dimension(&self) -> usize {
        1
    }

    fn goal_reached(&self, state: &State) -> bool {
        state[0] == 1.0
    }
}

/// Never terminates; the state counts the steps taken since reset.
pub struct Drift {
    steps: usize,
}

impl Drift {
    pub fn new() -> Self {
        Drift { steps: 0 }
    }
}

impl Environment for Drift {
    fn reset(&mut self) -> Result<State> {
        self.steps = 0;
        Ok(array![0.0])
    }

    fn step(&mut self, _action: Action) -> Result<Step> {
        self.steps += 1;
        Ok(Step { next_state: array![self.steps as f32], reward: -1.0, terminal: false })
    }

    fn action_count(&self) -> usize {
        2
    }

    fn state_dimension(&self) -> usize {
        1
    }

    fn goal_reached(&self, _state: &State) -> bool {
        false
    }
}

pub fn config() -> TrainingConfig {
    TrainingConfig {
        replay_memory_size: 100,
        min_replay_memory_size: 10,
        batch_size: 4,
        update_target_every: 3,
        learning_rate: 0.01,
        hidden_layer_width: 8,
        discount: 0.9,
        epsilon_start: 1.0,
        epsilon_min: 0.1,
        epsilon_decay: 0.3,
        episodes: 7,
        cycles: 1,
        hidden_layers: 1,
        activation: Activation::Relu,
        optimizer: OptimizerKind::Sgd,
        max_episode_steps: 20,
        show_every: None,
        double_q_learning: false,
        seed: Some(42),
    }
}

pub fn q_network(state_dimension: usize, action_count: usize, seed: u64) -> QNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    QNetwork::builder()
        .state_dimension(state_dimension)
        .action_count(action_count)
        .hidden_layer_width(8)
        .hidden_layers(1)
        .optimizer(OptimizerKind::Sgd)
        .learning_rate(0.05)
        .build(&mut rng)
        .unwrap()
}

pub fn transition(reward: f32) -> Transition {
    Transition::new(array![reward], 0, reward, array![reward + 1.0], false)
}

/// Scores the action that moves the player one cell closer to the goal
/// on a [`MoveToGoal`](crate::environment::MoveToGoal) board.
#[derive(Clone)]
pub struct GoalSeeker;

impl ValueApproximator for GoalSeeker {
    fn state_dimension(&self) -> usize {
        4
    }

    fn action_count(&self) -> usize {
        4
    }

    fn evaluate(&self, state: ArrayView1<f32>) -> Array1<f32> {
        let (px, py, gx, gy) = (state[0], state[1], state[2], state[3]);
        let best = if gx > px {
            1
        } else if gy > py {
            0
        } else if gx < px {
            3
        } else {
            2
        };
        let mut values = Array1::zeros(4);
        values[best] = 1.0;
        values
    }

    fn fit(&mut self, _states: ArrayView2<f32>, _targets: ArrayView2<f32>) -> Result<f32> {
        Ok(0.0)
    }
}

/// Misbehaves after reset: either reports a state longer than advertised or
/// a NaN reward.
pub struct Faulty {
    pub long_state: bool,
}

impl Environment for Faulty {
    fn reset(&mut self) -> Result<State> {
        Ok(array![0.0])
    }

    fn step(&mut self, _action: Action) -> Result<Step> {
        if self.long_state {
            Ok(Step { next_state: array![0.0, 1.0], reward: 0.0, terminal: true })
        } else {
            Ok(Step { next_state: array![1.0], reward: f32::NAN, terminal: true })
        }
    }

    fn action_count(&self) -> usize {
        2
    }

    fn state_dimension(&self) -> usize {
        1
    }

    fn goal_reached(&self, _state: &State) -> bool {
        false
    }
}
