//! # Value Approximators
//!
//! A value approximator maps a state to one estimated return per action.
//! [`ValueApproximator::fit`] is the only operation allowed to change its
//! parameters; everything else reads them.
//!
//! [`QNetwork`] is the neural-network implementation used by the trainer:
//! ReLU hidden layers of equal width and a linear output layer with one unit
//! per action.
//!
//! ```rust
//! use deepq::approximator::{QNetwork, ValueApproximator};
//! use ndarray::array;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let q = QNetwork::builder()
//!     .state_dimension(2)
//!     .action_count(3)
//!     .hidden_layer_width(16)
//!     .build(&mut rng)
//!     .unwrap();
//! assert_eq!(q.evaluate(array![0.1, -0.2].view()).len(), 3);
//! ```

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{Error, Result};
use crate::network::NeuralNetwork;
use crate::optimizer::{OptimizerKind, OptimizerWrapper};

/// A function from states to per-action values that can be trained toward targets.
pub trait ValueApproximator {
    /// Length of the state vectors this approximator accepts.
    fn state_dimension(&self) -> usize;

    /// Number of actions, i.e. the length of every value vector.
    fn action_count(&self) -> usize;

    /// Estimate the value of every action in `state`.
    fn evaluate(&self, state: ArrayView1<f32>) -> Array1<f32>;

    /// Evaluate a batch of states, one per row.
    fn evaluate_batch(&self, states: ArrayView2<f32>) -> Array2<f32> {
        let mut values = Array2::zeros((states.nrows(), self.action_count()));
        for (state, mut row) in states.rows().into_iter().zip(values.rows_mut()) {
            row.assign(&self.evaluate(state));
        }
        values
    }

    /// Take exactly one gradient step minimising the mean squared error between
    /// `evaluate_batch(states)` and `targets`. Returns the loss before the step.
    fn fit(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<f32>;
}

/// Neural-network Q-function.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QNetwork {
    pub network: NeuralNetwork,
    pub learning_rate: f32,
}

impl QNetwork {
    pub fn new(network: NeuralNetwork, learning_rate: f32) -> Self {
        QNetwork { network, learning_rate }
    }

    pub fn builder() -> QNetworkBuilder {
        QNetworkBuilder::new()
    }
}

impl ValueApproximator for QNetwork {
    fn state_dimension(&self) -> usize {
        self.network.input_size()
    }

    fn action_count(&self) -> usize {
        self.network.output_size()
    }

    fn evaluate(&self, state: ArrayView1<f32>) -> Array1<f32> {
        self.network.forward(state)
    }

    fn evaluate_batch(&self, states: ArrayView2<f32>) -> Array2<f32> {
        self.network.forward_batch(states)
    }

    fn fit(&mut self, states: ArrayView2<f32>, targets: ArrayView2<f32>) -> Result<f32> {
        self.network.train_minibatch(states, targets, self.learning_rate)
    }
}

/// Builder pattern for QNetwork
pub struct QNetworkBuilder {
    state_dimension: usize,
    action_count: usize,
    hidden_layer_width: usize,
    hidden_layers: usize,
    activation: Activation,
    optimizer: OptimizerKind,
    learning_rate: f32,
}

impl QNetworkBuilder {
    pub fn new() -> Self {
        QNetworkBuilder {
            state_dimension: 0,
            action_count: 0,
            hidden_layer_width: 32,
            hidden_layers: 2,
            activation: Activation::Relu,
            optimizer: OptimizerKind::Adam,
            learning_rate: 0.001,
        }
    }

    pub fn state_dimension(mut self, dimension: usize) -> Self {
        self.state_dimension = dimension;
        self
    }

    pub fn action_count(mut self, count: usize) -> Self {
        self.action_count = count;
        self
    }

    pub fn hidden_layer_width(mut self, width: usize) -> Self {
        self.hidden_layer_width = width;
        self
    }

    pub fn hidden_layers(mut self, count: usize) -> Self {
        self.hidden_layers = count;
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<QNetwork> {
        if self.state_dimension == 0 || self.action_count == 0 {
            return Err(Error::config(
                "state_dimension/action_count".to_string(),
                "both must be greater than 0".to_string(),
            ));
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(Error::config(
                "learning_rate".to_string(),
                format!("must be positive, got {}", self.learning_rate),
            ));
        }

        let mut layer_sizes = vec![self.state_dimension];
        layer_sizes.extend(std::iter::repeat(self.hidden_layer_width).take(self.hidden_layers));
        layer_sizes.push(self.action_count);

        let mut activations = vec![self.activation; self.hidden_layers];
        activations.push(Activation::Linear);

        let optimizer: OptimizerWrapper = self.optimizer.build();
        let network = NeuralNetwork::new(&layer_sizes, &activations, optimizer, rng)?;

        Ok(QNetwork::new(network, self.learning_rate))
    }
}

impl Default for QNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
