//! Gradient-descent optimizers used by [`NeuralNetwork::train_minibatch`](crate::network::NeuralNetwork::train_minibatch).
//!
//! Optimizers receive the index of the layer being updated so that stateful
//! optimizers (Adam) keep one set of moment estimates per parameter tensor.

use ndarray::{Array1, Array2, Zip};
use serde::{Serialize, Deserialize};

pub trait Optimizer {
    /// Called once per gradient step, before any layer is updated.
    fn begin_step(&mut self) {}
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
}

/// Which optimizer a Q-network is trained with.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd,
    #[default]
    Adam,
}

impl OptimizerKind {
    /// Build a fresh optimizer with default hyper-parameters.
    pub fn build(self) -> OptimizerWrapper {
        match self {
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
            OptimizerKind::Adam => OptimizerWrapper::Adam(Adam::default()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
        }
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }
}

/// Plain stochastic gradient descent.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Adam with bias-corrected first and second moment estimates.
///
/// Moment tensors are allocated lazily the first time a layer is updated.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    weight_moments: Vec<(Array2<f32>, Array2<f32>)>,
    bias_moments: Vec<(Array1<f32>, Array1<f32>)>,
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            weight_moments: Vec::new(),
            bias_moments: Vec::new(),
            t: 0,
        }
    }

    fn bias_corrections(&self) -> (f32, f32) {
        // begin_step may not have been called when used standalone
        let t = self.t.max(1);
        (1.0 - self.beta1.powi(t), 1.0 - self.beta2.powi(t))
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-7)
    }
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let (correction1, correction2) = self.bias_corrections();

        while self.weight_moments.len() <= layer {
            self.weight_moments.push((Array2::zeros((0, 0)), Array2::zeros((0, 0))));
        }
        let slot = &mut self.weight_moments[layer];
        if slot.0.dim() != weights.dim() {
            *slot = (Array2::zeros(weights.dim()), Array2::zeros(weights.dim()));
        }
        let (m, v) = (&mut slot.0, &mut slot.1);

        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        Zip::from(weights).and(&*m).and(&*v).for_each(|w, &m, &v| {
            *w -= learning_rate * (m / correction1) / ((v / correction2).sqrt() + epsilon);
        });
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let (correction1, correction2) = self.bias_corrections();

        while self.bias_moments.len() <= layer {
            self.bias_moments.push((Array1::zeros(0), Array1::zeros(0)));
        }
        let slot = &mut self.bias_moments[layer];
        if slot.0.dim() != biases.dim() {
            *slot = (Array1::zeros(biases.dim()), Array1::zeros(biases.dim()));
        }
        let (m, v) = (&mut slot.0, &mut slot.1);

        m.zip_mut_with(gradients, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);

        Zip::from(biases).and(&*m).and(&*v).for_each(|b, &m, &v| {
            *b -= learning_rate * (m / correction1) / ((v / correction2).sqrt() + epsilon);
        });
    }
}
