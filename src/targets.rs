//! Bellman backups for a sampled minibatch.
//!
//! For a transition `(s, a, r, s', terminal)` the backup is `r` when the
//! transition is terminal and `r + discount * max_a' Q_target(s', a')`
//! otherwise. The training row for `s` is the approximator's own current
//! prediction with only component `a` replaced by the backup, so the other
//! actions receive no gradient from that sample.
//!
//! With double Q-learning the next action is chosen by the approximator and
//! valued by the target network: `r + discount * Q_target(s', argmax_a' Q(s', a'))`.

use ndarray::{Array2, ArrayView1};

use crate::approximator::ValueApproximator;
use crate::error::{Error, Result};
use crate::exploration::argmax;
use crate::target::TargetNetwork;
use crate::types::Transition;

/// States and target values ready to be passed to [`ValueApproximator::fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingBatch {
    pub states: Array2<f32>,
    pub targets: Array2<f32>,
}

/// The temporal-difference target for one transition.
pub fn bellman_target(reward: f32, terminal: bool, next_values: ArrayView1<f32>, discount: f32) -> f32 {
    if terminal {
        reward
    } else {
        let max_next = next_values.iter().fold(f32::NEG_INFINITY, |max, &val| max.max(val));
        reward + discount * max_next
    }
}

/// The double Q-learning target: `selector` picks the next action, `next_values` values it.
pub fn double_bellman_target(
    reward: f32,
    terminal: bool,
    selector: ArrayView1<f32>,
    next_values: ArrayView1<f32>,
    discount: f32,
) -> Result<f32> {
    if terminal {
        return Ok(reward);
    }
    let best = argmax(selector)?;
    Ok(reward + discount * next_values[best])
}

/// Build the training batch for `transitions`.
///
/// Next-state values come from `target`; current predictions, which fill
/// every untouched component of the target rows, come from `approximator`.
/// When `double_q_learning` is set the approximator also selects the
/// next-state action that `target` values.
pub fn compute_targets<A: ValueApproximator + Clone>(
    transitions: &[&Transition],
    approximator: &A,
    target: &TargetNetwork<A>,
    discount: f32,
    double_q_learning: bool,
) -> Result<TrainingBatch> {
    if transitions.is_empty() {
        return Err(Error::InsufficientSamples { requested: 1, available: 0 });
    }

    let state_dimension = approximator.state_dimension();
    let action_count = approximator.action_count();
    let batch_size = transitions.len();

    let mut states = Array2::zeros((batch_size, state_dimension));
    let mut next_states = Array2::zeros((batch_size, state_dimension));
    for (i, transition) in transitions.iter().enumerate() {
        if transition.state.len() != state_dimension || transition.next_state.len() != state_dimension {
            return Err(Error::dimension_mismatch(
                format!("states of length {}", state_dimension),
                format!("states of length {} and {}", transition.state.len(), transition.next_state.len()),
            ));
        }
        if transition.action >= action_count {
            return Err(Error::InvalidAction { action: transition.action, action_count });
        }
        states.row_mut(i).assign(&transition.state);
        next_states.row_mut(i).assign(&transition.next_state);
    }

    let mut targets = approximator.evaluate_batch(states.view());
    let next_values = target.evaluate_batch(next_states.view());
    let selectors = if double_q_learning {
        Some(approximator.evaluate_batch(next_states.view()))
    } else {
        None
    };

    for (i, transition) in transitions.iter().enumerate() {
        let backup = match &selectors {
            Some(selectors) => double_bellman_target(
                transition.reward,
                transition.terminal,
                selectors.row(i),
                next_values.row(i),
                discount,
            )?,
            None => bellman_target(transition.reward, transition.terminal, next_values.row(i), discount),
        };
        targets[[i, transition.action]] = backup;
    }

    Ok(TrainingBatch { states, targets })
}
