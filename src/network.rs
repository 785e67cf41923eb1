use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{Error, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::loss::{Loss, MSE};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A feed-forward neural network made of dense layers, trained with an
/// optimizer on mean squared error.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Create a new neural network with the given layer sizes, activations, and optimizer.
    ///
    /// `layer_sizes` includes the input and output sizes, so it must hold exactly
    /// one more entry than `activations`. Weights are initialised from `rng`
    /// with the scheme recommended for each layer's activation.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(Error::config(
                "layer_sizes".to_string(),
                "network needs at least an input and an output layer".to_string(),
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(Error::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{} activations", activations.len()),
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(Error::config(
                "layer_sizes".to_string(),
                format!("every layer needs at least one unit, got {:?}", layer_sizes),
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| {
                let init = WeightInit::for_activation(&activation);
                DenseLayer::new(window[0], window[1], activation, init, rng)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NeuralNetwork { layers, optimizer })
    }

    pub fn with_layers(mut self, layers: Vec<DenseLayer>) -> Self {
        self.layers = layers;
        self
    }

    /// Size of the input vector.
    pub fn input_size(&self) -> usize {
        self.layers.first().map(DenseLayer::input_size).unwrap_or(0)
    }

    /// Size of the output vector.
    pub fn output_size(&self) -> usize {
        self.layers.last().map(DenseLayer::output_size).unwrap_or(0)
    }

    /// Perform a forward pass for a single input vector.
    pub fn forward(&self, input: ArrayView1<f32>) -> Array1<f32> {
        let output = self.forward_batch(input.insert_axis(Axis(0)));
        output.row(0).to_owned()
    }

    /// Perform a forward pass for a batch of input vectors, one per row.
    pub fn forward_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            current = layer.forward_batch(current.view()).1;
        }
        current
    }

    /// Perform one gradient step on a batch of inputs and target outputs.
    ///
    /// Returns the mean squared error measured before the update.
    pub fn train_minibatch(
        &mut self,
        inputs: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        if inputs.ncols() != self.input_size() {
            return Err(Error::dimension_mismatch(
                format!("{} input columns", self.input_size()),
                format!("{} input columns", inputs.ncols()),
            ));
        }
        if targets.dim() != (inputs.nrows(), self.output_size()) {
            return Err(Error::dimension_mismatch(
                format!("targets of shape {:?}", (inputs.nrows(), self.output_size())),
                format!("targets of shape {:?}", targets.dim()),
            ));
        }

        // activations[i] is the input of layer i
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        activations.push(inputs.to_owned());
        for layer in &self.layers {
            let (pre, out) = layer.forward_batch(activations[activations.len() - 1].view());
            pre_activations.push(pre);
            activations.push(out);
        }

        let outputs = activations[self.layers.len()].view();
        let loss = MSE.compute_batch(outputs, targets);
        let mut error = MSE.gradient_batch(outputs, targets);

        self.optimizer.begin_step();
        for i in (0..self.layers.len()).rev() {
            let (adjusted_error, weight_gradients, bias_gradients) = self.layers[i].backward_batch(
                activations[i].view(),
                pre_activations[i].view(),
                error.view(),
            );
            if i != 0 {
                // propagate through the weights as they were before this step
                error = adjusted_error.dot(&self.layers[i].weights.t());
            }
            let layer = &mut self.layers[i];
            self.optimizer.update_weights(i, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(i, &mut layer.biases, &bias_gradients, learning_rate);
        }

        Ok(loss)
    }
}
