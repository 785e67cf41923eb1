//! # Environments
//!
//! The trainer and evaluator consume environments only through the
//! [`Environment`] trait. Concrete environments are plain structs
//! implementing it; pick one by composition, e.g. by boxing it.
//!
//! Two reference environments are provided:
//! - [`MoveToGoal`]: a grid world where the player walks to a goal cell
//! - [`MountainCar`]: the classic under-powered car on a hill

pub mod mountain_car;
pub mod move_to_goal;

pub use mountain_car::MountainCar;
pub use move_to_goal::MoveToGoal;

use crate::approximator::ValueApproximator;
use crate::error::{Error, Result};
use crate::types::{Action, State};

/// Outcome of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub next_state: State,
    pub reward: f32,
    /// The environment's own end-of-episode flag.
    pub terminal: bool,
}

/// A sequential-decision environment with a finite action set.
pub trait Environment {
    /// Start a new episode and return its first state.
    fn reset(&mut self) -> Result<State>;

    /// Apply `action`. Actions outside `0..action_count()` are rejected with
    /// [`Error::InvalidAction`](crate::error::Error::InvalidAction).
    fn step(&mut self, action: Action) -> Result<Step>;

    fn action_count(&self) -> usize;

    fn state_dimension(&self) -> usize;

    /// Whether `state` counts as a win.
    fn goal_reached(&self, state: &State) -> bool;
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn reset(&mut self) -> Result<State> {
        (**self).reset()
    }

    fn step(&mut self, action: Action) -> Result<Step> {
        (**self).step(action)
    }

    fn action_count(&self) -> usize {
        (**self).action_count()
    }

    fn state_dimension(&self) -> usize {
        (**self).state_dimension()
    }

    fn goal_reached(&self, state: &State) -> bool {
        (**self).goal_reached(state)
    }
}

/// Reject an approximator whose input or output size does not fit `environment`.
pub fn check_approximator<E, A>(environment: &E, approximator: &A) -> Result<()>
where
    E: Environment + ?Sized,
    A: ValueApproximator + ?Sized,
{
    if approximator.state_dimension() != environment.state_dimension() {
        return Err(Error::dimension_mismatch(
            format!("state dimension {}", environment.state_dimension()),
            format!("approximator input of {}", approximator.state_dimension()),
        ));
    }
    if approximator.action_count() != environment.action_count() {
        return Err(Error::dimension_mismatch(
            format!("{} actions", environment.action_count()),
            format!("approximator output of {}", approximator.action_count()),
        ));
    }
    Ok(())
}

/// Reject a state whose length differs from `expected`.
pub fn check_state(state: &State, expected: usize) -> Result<()> {
    if state.len() != expected {
        return Err(Error::dimension_mismatch(
            format!("state of length {}", expected),
            format!("state of length {}", state.len()),
        ));
    }
    Ok(())
}

/// Validate what an environment returned from `step`: the next state must
/// have the advertised length and the reward must be finite.
pub fn check_step(step: &Step, expected: usize) -> Result<()> {
    check_state(&step.next_state, expected)?;
    if !step.reward.is_finite() {
        return Err(Error::Environment(format!("non-finite reward {}", step.reward)));
    }
    Ok(())
}
