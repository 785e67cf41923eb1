//! # Activation Functions Module
//!
//! Element-wise non-linearities applied by each dense layer of a Q-network.
//! Hidden layers default to ReLU; the output layer of a value approximator is
//! always linear so that action-values are unbounded.
//!
//! ## Available Activations
//!
//! - **ReLU**: `max(0, x)`
//! - **Linear**: identity
//! - **Sigmoid**: `1 / (1 + e^(-x))`
//! - **Tanh**: hyperbolic tangent
//! - **LeakyReLU**: ReLU with a small negative slope
//!
//! ```rust
//! use deepq::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![[1.0, -0.5, 0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut data);
//! assert_eq!(data, array![[1.0, 0.0, 0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
