use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::Result;
use super::initialization::WeightInit;

/// A fully connected (dense) layer in a neural network.
///
/// The layer keeps no per-call state: the forward pass returns the
/// pre-activations alongside the output so that evaluation stays a pure
/// function of the parameters, and the caller hands them back for the
/// backward pass.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    /// Create a new dense layer with weights drawn according to `init`.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Self> {
        let weights = init.initialize_weights((input_size, output_size), rng)?;
        let biases = init.initialize_biases(output_size);
        Ok(DenseLayer { weights, biases, activation })
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Self {
        assert_eq!(weights.dim(), self.weights.dim());
        self.weights = weights;
        self
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Self {
        assert_eq!(biases.dim(), self.biases.dim());
        self.biases = biases;
        self
    }

    /// Forward pass for a batch of inputs, one row per sample.
    /// Returns `(pre_activations, outputs)`.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> (Array2<f32>, Array2<f32>) {
        let pre_activations = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        let mut outputs = pre_activations.clone();
        self.activation.apply_batch(&mut outputs);
        (pre_activations, outputs)
    }

    /// Backward pass for a batch.
    ///
    /// `inputs` and `pre_activations` must come from the matching
    /// `forward_batch` call. Returns `(adjusted_error, weight_gradients, bias_gradients)`
    /// where `adjusted_error` is the error with the activation derivative applied.
    pub fn backward_batch(
        &self,
        inputs: ArrayView2<f32>,
        pre_activations: ArrayView2<f32>,
        output_errors: ArrayView2<f32>,
    ) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
        let activation_deriv = self.activation.derivative_batch(pre_activations);
        let adjusted_error = output_errors.to_owned() * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));

        (adjusted_error, weight_gradients, bias_gradients)
    }

    pub fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }

    pub fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }
}
