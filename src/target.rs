use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::approximator::ValueApproximator;

/// A frozen copy of a value approximator used only to produce bootstrap targets.
///
/// The wrapped approximator is never trained: the only way to change its
/// parameters is [`synchronize`](TargetNetwork::synchronize), which replaces
/// them wholesale with the source's. Between synchronizations its output for
/// a given state does not change.
#[derive(Clone, Debug)]
pub struct TargetNetwork<A> {
    frozen: A,
    synchronizations: usize,
}

impl<A: ValueApproximator + Clone> TargetNetwork<A> {
    /// Start as an exact copy of `source`.
    pub fn new(source: &A) -> Self {
        TargetNetwork {
            frozen: source.clone(),
            synchronizations: 0,
        }
    }

    /// Copy every parameter of `source` into the target.
    pub fn synchronize(&mut self, source: &A) {
        self.frozen.clone_from(source);
        self.synchronizations += 1;
    }

    pub fn evaluate(&self, state: ArrayView1<f32>) -> Array1<f32> {
        self.frozen.evaluate(state)
    }

    pub fn evaluate_batch(&self, states: ArrayView2<f32>) -> Array2<f32> {
        self.frozen.evaluate_batch(states)
    }

    /// How many times `synchronize` has been called.
    pub fn synchronizations(&self) -> usize {
        self.synchronizations
    }

    pub fn action_count(&self) -> usize {
        self.frozen.action_count()
    }
}
