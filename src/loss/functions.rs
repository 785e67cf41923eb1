use ndarray::{Array2, ArrayView2};

/// Trait defining the interface for loss functions
pub trait Loss: Send + Sync {
    /// Compute the loss for a batch of predictions and targets
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32;

    /// Compute the gradient of the loss with respect to the predictions
    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32>;
}

/// Mean Squared Error loss, averaged over every element of the batch.
///
/// Components where the prediction already equals the target contribute
/// neither loss nor gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSE;

impl Loss for MSE {
    fn compute_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> f32 {
        let diff = &predictions - &targets;
        (&diff * &diff).sum() / predictions.len().max(1) as f32
    }

    fn gradient_batch(&self, predictions: ArrayView2<f32>, targets: ArrayView2<f32>) -> Array2<f32> {
        (&predictions - &targets) * (2.0 / predictions.len().max(1) as f32)
    }
}
