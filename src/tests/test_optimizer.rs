use ndarray::{array, Array, Dimension};

use crate::optimizer::{Adam, Optimizer, OptimizerKind, OptimizerWrapper, SGD};

fn assert_close<D: Dimension>(actual: &Array<f32, D>, expected: &Array<f32, D>, tolerance: f32) {
    assert_eq!(actual.shape(), expected.shape());
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < tolerance, "{} differs from {}", actual, expected);
    }
}

#[test]
fn test_sgd_update_weights() {
    let mut sgd = SGD::new();
    let mut weights = array![[1.0, 1.0], [1.0, 1.0]];
    let gradients = array![[0.1, 0.2], [0.3, 0.4]];

    sgd.update_weights(0, &mut weights, &gradients, 0.01);

    let expected = array![[0.999, 0.998], [0.997, 0.996]];
    assert_close(&weights, &expected, 1e-6);
}

#[test]
fn test_sgd_update_biases() {
    let mut sgd = SGD::new();
    let mut biases = array![1.0, 1.0];
    let gradients = array![0.1, 0.2];

    sgd.update_biases(0, &mut biases, &gradients, 0.01);

    assert_close(&biases, &array![0.999, 0.998], 1e-6);
}

#[test]
fn test_adam_new() {
    let adam = Adam::new(0.9, 0.999, 1e-8);
    assert_eq!(adam.beta1, 0.9);
    assert_eq!(adam.beta2, 0.999);
    assert_eq!(adam.epsilon, 1e-8);
    assert_eq!(adam.t, 0);
}

#[test]
fn test_adam_first_step_moves_by_learning_rate() {
    let mut adam = Adam::new(0.9, 0.999, 1e-8);
    let mut weights = array![[1.0, 1.0], [1.0, 1.0]];
    let gradients = array![[0.1, 0.2], [-0.3, 0.4]];

    adam.begin_step();
    adam.update_weights(0, &mut weights, &gradients, 0.01);

    assert_eq!(adam.t, 1);
    assert_close(&weights, &array![[0.99, 0.99], [1.01, 0.99]], 1e-4);
}

#[test]
fn test_adam_keeps_moments_per_layer() {
    let mut adam = Adam::default();
    let mut first = array![[1.0, 1.0]];
    let mut second = array![[1.0], [1.0], [1.0]];

    adam.begin_step();
    adam.update_weights(0, &mut first, &array![[1.0, 1.0]], 0.1);
    adam.update_weights(1, &mut second, &array![[-1.0], [-1.0], [-1.0]], 0.1);
    adam.begin_step();
    adam.update_weights(0, &mut first, &array![[1.0, 1.0]], 0.1);
    adam.update_weights(1, &mut second, &array![[-1.0], [-1.0], [-1.0]], 0.1);

    assert!(first.iter().all(|&w| w < 1.0));
    assert!(second.iter().all(|&w| w > 1.0));
}

#[test]
fn test_kind_builds_wrapper() {
    assert!(matches!(OptimizerKind::Sgd.build(), OptimizerWrapper::SGD(_)));
    assert!(matches!(OptimizerKind::default().build(), OptimizerWrapper::Adam(_)));
}
