use approx::assert_abs_diff_eq;
use ndarray::{array, Array1};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Error;
use crate::exploration::{argmax, EpsilonGreedy};

fn policy(start: f32, min: f32, decay: f32) -> EpsilonGreedy {
    EpsilonGreedy::new(3, start, min, decay, StdRng::seed_from_u64(5)).unwrap()
}

#[test]
fn test_linear_decay_is_floored() {
    let mut policy = policy(1.0, 0.1, 0.3);
    let mut observed = vec![policy.epsilon()];
    for _ in 0..4 {
        policy.decay();
        observed.push(policy.epsilon());
    }

    let expected: [f32; 5] = [1.0, 0.7, 0.4, 0.1, 0.1];
    for (value, expected) in observed.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*value, *expected, epsilon = 1e-6);
    }
}

#[test]
fn test_reset_restores_start() {
    let mut policy = policy(0.8, 0.0, 0.25);
    policy.decay();
    policy.decay();
    policy.reset();
    assert_eq!(policy.epsilon(), 0.8);
}

#[test]
fn test_zero_epsilon_is_greedy() {
    let mut policy = policy(0.0, 0.0, 0.0);
    let state = array![0.0, 0.0];
    for _ in 0..20 {
        let action = policy.select_action(state.view(), |_| array![0.5, 2.0, -1.0]).unwrap();
        assert_eq!(action, 1);
    }
}

#[test]
fn test_full_epsilon_never_queries_values() {
    let mut policy = policy(1.0, 1.0, 0.0);
    let state = array![0.0];
    for _ in 0..50 {
        let action = policy
            .select_action(state.view(), |_| -> Array1<f32> { panic!("values requested while exploring") })
            .unwrap();
        assert!(action < 3);
    }
}

#[test]
fn test_random_actions_cover_action_set() {
    let mut policy = policy(1.0, 1.0, 0.0);
    let state = array![0.0];
    let mut seen = [false; 3];
    for _ in 0..200 {
        let action = policy.select_action(state.view(), |_| array![0.0, 0.0, 0.0]).unwrap();
        seen[action] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_value_length_is_checked() {
    let mut policy = EpsilonGreedy::greedy(3);
    let state = array![0.0];
    let result = policy.select_action(state.view(), |_| array![1.0, 2.0]);
    assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
}

#[test]
fn test_argmax_ties_and_nan() {
    assert_eq!(argmax(array![1.0, 3.0, 3.0].view()).unwrap(), 1);
    assert_eq!(argmax(array![f32::NAN, 1.0, 0.5].view()).unwrap(), 1);
    assert_eq!(argmax(array![-2.0, -1.0].view()).unwrap(), 1);
    assert!(matches!(argmax(array![f32::NAN].view()), Err(Error::Numerical(_))));
}

#[test]
fn test_invalid_schedule_is_rejected() {
    let rng = || StdRng::seed_from_u64(0);
    assert!(EpsilonGreedy::new(0, 1.0, 0.1, 0.1, rng()).is_err());
    assert!(EpsilonGreedy::new(2, 1.5, 0.1, 0.1, rng()).is_err());
    assert!(EpsilonGreedy::new(2, 0.5, 0.6, 0.1, rng()).is_err());
    assert!(EpsilonGreedy::new(2, 0.5, 0.1, -0.1, rng()).is_err());
}
