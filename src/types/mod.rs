use ndarray::Array1;
use serde::{Serialize, Deserialize};

/// A fixed-length observation vector.
pub type State = Array1<f32>;

/// Index into an environment's finite action set.
pub type Action = usize;

/// One `(state, action, reward, next_state, terminal)` record of interaction
/// with an environment.
///
/// `terminal` is the environment's own end-of-episode flag. An episode cut
/// short by a step cap stores `terminal = false` so its last transition still
/// bootstraps from the next state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: State,
    pub action: Action,
    pub reward: f32,
    pub next_state: State,
    pub terminal: bool,
}

impl Transition {
    pub fn new(state: State, action: Action, reward: f32, next_state: State, terminal: bool) -> Self {
        Transition { state, action, reward, next_state, terminal }
    }
}
