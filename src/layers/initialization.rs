use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::{Normal, Uniform};
use serde::{Serialize, Deserialize};

use crate::activations::Activation;
use crate::error::{Error, Result};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization
    XavierUniform,

    /// He/Kaiming normal initialization (for ReLU)
    HeNormal,

    /// All zeros
    Zeros,
}

impl WeightInit {
    /// Initialize weights for a layer, drawing from `rng`.
    pub fn initialize_weights<R: Rng + ?Sized>(&self, shape: (usize, usize), rng: &mut R) -> Result<Array2<f32>> {
        let (fan_in, fan_out) = shape;

        let weights = match self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Array2::random_using(shape, Uniform::new(-limit, limit), rng)
            }

            WeightInit::HeNormal => {
                let std = (2.0 / fan_in as f32).sqrt();
                let normal = Normal::new(0.0, std)
                    .map_err(|e| Error::config("weight_init".to_string(), e.to_string()))?;
                Array2::random_using(shape, normal, rng)
            }

            WeightInit::Zeros => Array2::zeros(shape),
        };

        Ok(weights)
    }

    /// Biases always start at zero.
    pub fn initialize_biases(&self, size: usize) -> Array1<f32> {
        Array1::zeros(size)
    }

    /// Get the recommended initialization for an activation function
    pub fn for_activation(activation: &Activation) -> Self {
        match activation {
            Activation::Relu | Activation::LeakyRelu { .. } => WeightInit::HeNormal,
            Activation::Sigmoid | Activation::Tanh | Activation::Linear => WeightInit::XavierUniform,
        }
    }
}
